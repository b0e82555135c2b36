//! # medley-playlist
//!
//! Playlist descriptors for the medley virtual concat source.
//!
//! A [`Playlist`] is an ordered, append-only list of member paths. Indices
//! are stable for the playlist's lifetime: members are never reordered or
//! removed. Playlists can be built three ways:
//!
//! - programmatically from an ordered list of paths ([`Playlist::from_paths`])
//! - from a single delimiter-separated string ([`Playlist::from_encoded`])
//! - from the simple line-based text format ([`Playlist::parse`] /
//!   [`Playlist::load`])
//!
//! Relative members are resolved against the playlist's base directory once,
//! before any member is opened ([`Playlist::resolve_paths`]).

pub mod error;

mod text;

pub use error::{PlaylistError, Result};
pub use text::{has_signature, is_playlist_path};

use std::path::{Path, PathBuf};

/// Ordered, append-only list of playlist members.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Playlist {
    paths: Vec<PathBuf>,
    /// Directory relative members are resolved against.
    base_dir: Option<PathBuf>,
}

impl Playlist {
    /// Create an empty playlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a playlist from an ordered list of paths.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            base_dir: None,
        }
    }

    /// Build a playlist by splitting `encoded` on a single separator.
    ///
    /// There is no escaping; consecutive separators produce empty members.
    /// A split producing one member or fewer is refused: a one-member
    /// concatenation is degenerate.
    pub fn from_encoded(encoded: &str, separator: char) -> Result<Self> {
        let tokens = split_encoded(encoded, separator);
        if tokens.len() <= 1 {
            return Err(PlaylistError::invalid(format!(
                "concatenation of {} member(s); at least 2 required",
                tokens.len()
            )));
        }
        Ok(Self::from_paths(tokens))
    }

    /// Parse the simple line-based playlist text format.
    ///
    /// One path per line. Lines starting with `#` are comments or
    /// directives and are ignored; blank lines are ignored. A leading
    /// `#EXTM3U` marker is a recognized format signature, nothing more.
    pub fn parse(text: &str) -> Self {
        text::parse(text)
    }

    /// Read and parse a playlist file.
    ///
    /// The file's parent directory becomes the base directory for
    /// relative-path resolution.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut playlist = text::parse(&text);
        playlist.base_dir = path.parent().map(Path::to_path_buf);
        Ok(playlist)
    }

    /// Set the base directory for relative-path resolution.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Append one member path.
    pub fn push(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the playlist has no members.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Member path at `index`.
    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    /// Iterate over member paths in order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    /// The base directory, if one is known.
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Resolve relative members against the base directory.
    ///
    /// For every member that does not already exist, the candidate
    /// `base_dir/member` is checked; the member is replaced only if the
    /// candidate exists. Members are left untouched otherwise. Runs over
    /// the whole list at once; call before opening any member.
    pub fn resolve_paths(&mut self) {
        let Some(base) = self.base_dir.clone() else {
            return;
        };
        for path in &mut self.paths {
            if path.exists() {
                continue;
            }
            let candidate = base.join(&*path);
            if candidate.exists() {
                *path = candidate;
            }
        }
    }
}

/// Split a delimiter-separated member string.
///
/// Plain single-character split with no escaping: `"a|b|"` yields
/// `["a", "b", ""]` and an input with no separator yields one token.
pub fn split_encoded(encoded: &str, separator: char) -> Vec<String> {
    encoded.split(separator).map(String::from).collect()
}
