//! The simple line-based playlist text format.

use std::path::Path;

use crate::Playlist;

/// Format signature carried by `.m3u`-style files.
const SIGNATURE: &str = "#EXTM3U";

/// File extensions recognized as simple list playlists.
const EXTENSIONS: &[&str] = &["m3u", "m3u8"];

/// Whether a path looks like a simple list playlist, by extension.
pub fn is_playlist_path(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Whether the text carries the `#EXTM3U` format signature on its first line.
pub fn has_signature(text: &str) -> bool {
    text.lines()
        .next()
        .map(|line| line.trim_end().eq(SIGNATURE))
        .unwrap_or(false)
}

/// Parse the simple list format: one path per line, `#` lines and blank
/// lines ignored.
pub(crate) fn parse(text: &str) -> Playlist {
    let mut playlist = Playlist::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        playlist.push(line);
    }
    playlist
}
