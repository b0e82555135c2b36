//! Integration tests for medley-concat.
//!
//! A scripted in-memory demuxer stands in for real container parsing, so
//! every test drives the concat layer exactly the way a host pipeline
//! would: open, pull packets, seek.

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use assert_matches::assert_matches;
use bytes::Bytes;
use medley_concat::{ConcatError, CursorState, VirtualSource};
use medley_demux::{DemuxError, Demuxer, DemuxerOpener, Packet, StreamInfo};
use medley_playlist::Playlist;

/// Scripted description of one fake media file.
#[derive(Clone)]
struct Media {
    streams: Vec<StreamInfo>,
    duration_ms: u64,
    /// Packets in decode order, with local stream indices and local pts.
    packets: Vec<Packet>,
}

impl Media {
    /// Single audio stream with `count` packets spaced `spacing_ms` apart.
    fn audio(duration_ms: u64, count: usize, spacing_ms: i64) -> Self {
        let packets = (0..count)
            .map(|i| Packet::new(0, i as i64 * spacing_ms, Bytes::from_static(b"pkt")))
            .collect();
        Self {
            streams: vec![StreamInfo::audio("AAC", 48000, 2)],
            duration_ms,
            packets,
        }
    }
}

struct FakeDemuxer {
    media: Media,
    position: usize,
}

impl Demuxer for FakeDemuxer {
    fn streams(&self) -> &[StreamInfo] {
        &self.media.streams
    }

    fn duration(&self) -> Duration {
        Duration::from_millis(self.media.duration_ms)
    }

    fn read_packet(&mut self) -> medley_demux::Result<Option<Packet>> {
        match self.media.packets.get(self.position) {
            Some(packet) => {
                self.position += 1;
                Ok(Some(packet.clone()))
            }
            None => Ok(None),
        }
    }

    fn seek(&mut self, position: Duration) -> medley_demux::Result<()> {
        let target_ms = position.as_millis() as i64;
        self.position = self
            .media
            .packets
            .iter()
            .position(|p| p.pts_ms >= target_ms)
            .unwrap_or(self.media.packets.len());
        Ok(())
    }
}

#[derive(Default)]
struct FakeOpener {
    files: HashMap<PathBuf, Media>,
    /// Codecs the host pretends it cannot decode.
    undecodable: HashSet<String>,
}

impl FakeOpener {
    fn with(mut self, path: impl Into<PathBuf>, media: Media) -> Self {
        self.files.insert(path.into(), media);
        self
    }

    fn without_decoder_for(mut self, codec: &str) -> Self {
        self.undecodable.insert(codec.to_string());
        self
    }
}

impl DemuxerOpener for FakeOpener {
    fn open(&self, path: &Path) -> medley_demux::Result<Box<dyn Demuxer>> {
        match self.files.get(path) {
            Some(media) => Ok(Box::new(FakeDemuxer {
                media: media.clone(),
                position: 0,
            })),
            None => Err(DemuxError::malformed(format!(
                "cannot probe {}",
                path.display()
            ))),
        }
    }

    fn supports(&self, stream: &StreamInfo) -> bool {
        !self.undecodable.contains(&stream.codec)
    }
}

/// Serves each path at most once, as if members are deleted right after
/// they have been played.
struct OneShotOpener {
    inner: FakeOpener,
    served: RefCell<HashSet<PathBuf>>,
}

impl OneShotOpener {
    fn new(inner: FakeOpener) -> Self {
        Self {
            inner,
            served: RefCell::new(HashSet::new()),
        }
    }
}

impl DemuxerOpener for OneShotOpener {
    fn open(&self, path: &Path) -> medley_demux::Result<Box<dyn Demuxer>> {
        if !self.served.borrow_mut().insert(path.to_path_buf()) {
            return Err(DemuxError::malformed(format!(
                "{} is gone",
                path.display()
            )));
        }
        self.inner.open(path)
    }
}

fn drain<O: DemuxerOpener>(source: &mut VirtualSource<O>) -> Vec<Packet> {
    let mut packets = Vec::new();
    while let Some(packet) = source.read_packet().unwrap() {
        packets.push(packet);
    }
    packets
}

#[test]
fn test_two_members_play_back_to_back() {
    let opener = FakeOpener::default()
        .with("a.mp4", Media::audio(1000, 5, 200))
        .with("b.mp4", Media::audio(600, 3, 200));
    let playlist = Playlist::from_paths(["a.mp4", "b.mp4"]);
    let mut source = VirtualSource::open(playlist, opener).unwrap();

    let packets = drain(&mut source);
    assert_eq!(packets.len(), 8);

    // The sixth packet comes from the second member: its stream index is
    // offset by the first member's stream count.
    assert_eq!(packets[5].stream_index, 1);
    assert_eq!(packets[4].stream_index, 0);

    // Reads past the end keep reporting end-of-stream.
    assert_eq!(source.read_packet().unwrap(), None);
    assert!(source.cursor().is_exhausted());
}

#[test]
fn test_timestamps_are_continuous_across_members() {
    let opener = FakeOpener::default()
        .with("a.mp4", Media::audio(1000, 5, 200))
        .with("b.mp4", Media::audio(600, 3, 200));
    let playlist = Playlist::from_paths(["a.mp4", "b.mp4"]);
    let mut source = VirtualSource::open(playlist, opener).unwrap();

    let packets = drain(&mut source);
    let timestamps: Vec<i64> = packets.iter().map(|p| p.pts_ms).collect();
    assert_eq!(timestamps, vec![0, 200, 400, 600, 800, 1000, 1200, 1400]);
}

#[test]
fn test_stream_table_and_duration_grow_lazily() {
    let opener = FakeOpener::default()
        .with("a.mp4", Media::audio(1000, 2, 200))
        .with("b.mp4", Media::audio(2000, 2, 200));
    let playlist = Playlist::from_paths(["a.mp4", "b.mp4"]);
    let mut source = VirtualSource::open(playlist, opener).unwrap();

    // Only the first member has been bound at open time.
    assert_eq!(source.streams().len(), 1);
    assert_eq!(source.duration_ms(), 1000);

    drain(&mut source);
    assert_eq!(source.streams().len(), 2);
    assert_eq!(source.duration_ms(), 3000);
}

#[test]
fn test_failed_member_is_skipped() {
    // "b.mp4" is not present in the opener: it fails to probe.
    let opener = FakeOpener::default()
        .with("a.mp4", Media::audio(1000, 2, 200))
        .with("c.mp4", Media::audio(500, 2, 200));
    let playlist = Playlist::from_paths(["a.mp4", "b.mp4", "c.mp4"]);
    let mut source = VirtualSource::open(playlist, opener).unwrap();

    let packets = drain(&mut source);
    assert_eq!(packets.len(), 4);

    // The skipped member contributes no streams: the third member's stream
    // sits right after the first member's.
    assert_eq!(packets[2].stream_index, 1);
    // And no duration: the third member starts at 1000 on the timeline.
    assert_eq!(packets[2].pts_ms, 1000);
    assert_eq!(source.duration_ms(), 1500);
    assert!(source.entry(1).unwrap().is_failed());
}

#[test]
fn test_failed_first_member_is_skipped_at_open() {
    let opener = FakeOpener::default().with("b.mp4", Media::audio(500, 2, 100));
    let playlist = Playlist::from_paths(["missing.mp4", "b.mp4"]);
    let mut source = VirtualSource::open(playlist, opener).unwrap();

    let packets = drain(&mut source);
    assert_eq!(packets.len(), 2);
    // The failed first member published no streams.
    assert_eq!(packets[0].stream_index, 0);
    assert_eq!(packets[0].pts_ms, 0);
}

#[test]
fn test_open_fails_when_all_members_fail() {
    let opener = FakeOpener::default();
    let playlist = Playlist::from_paths(["a.mp4", "b.mp4"]);
    let err = VirtualSource::open(playlist, opener).unwrap_err();
    assert_matches!(err, ConcatError::OpenFailure { .. });
}

#[test]
fn test_seek_into_later_member() {
    let opener = FakeOpener::default()
        .with("a.mp4", Media::audio(1000, 5, 200))
        .with("b.mp4", Media::audio(2000, 4, 500));
    let playlist = Playlist::from_paths(["a.mp4", "b.mp4"]);
    let mut source = VirtualSource::open(playlist, opener).unwrap();

    // 2500 on the merged timeline is 1500 into the second member.
    source.seek(2500).unwrap();
    assert_eq!(source.cursor(), CursorState::Active(1));

    let packet = source.read_packet().unwrap().unwrap();
    assert_eq!(packet.stream_index, 1);
    assert_eq!(packet.pts_ms, 2500);
}

#[test]
fn test_seek_binds_forward_for_durations() {
    let opener = FakeOpener::default()
        .with("a.mp4", Media::audio(1000, 2, 200))
        .with("b.mp4", Media::audio(2000, 2, 200));
    let playlist = Playlist::from_paths(["a.mp4", "b.mp4"]);
    let mut source = VirtualSource::open(playlist, opener).unwrap();

    assert_eq!(source.duration_ms(), 1000);
    source.seek(1500).unwrap();
    // The seek had to bind the second member to learn its duration.
    assert_eq!(source.duration_ms(), 3000);
}

#[test]
fn test_seek_to_member_boundary_lands_in_next_member() {
    let opener = FakeOpener::default()
        .with("a.mp4", Media::audio(1000, 2, 500))
        .with("b.mp4", Media::audio(1000, 2, 500));
    let playlist = Playlist::from_paths(["a.mp4", "b.mp4"]);
    let mut source = VirtualSource::open(playlist, opener).unwrap();

    source.seek(1000).unwrap();
    assert_eq!(source.cursor(), CursorState::Active(1));
    let packet = source.read_packet().unwrap().unwrap();
    assert_eq!(packet.pts_ms, 1000);
    assert_eq!(packet.stream_index, 1);
}

#[test]
fn test_seek_past_end_clamps_to_end_of_stream() {
    let opener = FakeOpener::default()
        .with("a.mp4", Media::audio(1000, 2, 200))
        .with("b.mp4", Media::audio(2000, 2, 200));
    let playlist = Playlist::from_paths(["a.mp4", "b.mp4"]);
    let mut source = VirtualSource::open(playlist, opener).unwrap();

    let err = source.seek(10_000).unwrap_err();
    assert_matches!(
        err,
        ConcatError::SeekOutOfRange {
            requested_ms: 10_000,
            duration_ms: 3000,
        }
    );
    assert_eq!(source.read_packet().unwrap(), None);
}

#[test]
fn test_seek_back_after_exhaustion() {
    let opener = FakeOpener::default()
        .with("a.mp4", Media::audio(1000, 2, 500))
        .with("b.mp4", Media::audio(1000, 2, 500));
    let playlist = Playlist::from_paths(["a.mp4", "b.mp4"]);
    let mut source = VirtualSource::open(playlist, opener).unwrap();

    drain(&mut source);
    assert!(source.cursor().is_exhausted());

    source.seek(500).unwrap();
    let packet = source.read_packet().unwrap().unwrap();
    assert_eq!(packet.stream_index, 0);
    assert_eq!(packet.pts_ms, 500);
}

#[test]
fn test_member_handles_are_released_when_drained() {
    let opener = FakeOpener::default()
        .with("a.mp4", Media::audio(1000, 1, 200))
        .with("b.mp4", Media::audio(1000, 1, 200));
    let playlist = Playlist::from_paths(["a.mp4", "b.mp4"]);
    let mut source = VirtualSource::open(playlist, opener).unwrap();

    assert!(source.entry(0).unwrap().is_bound());
    drain(&mut source);
    assert!(!source.entry(0).unwrap().is_bound());
    assert!(!source.entry(1).unwrap().is_bound());
}

#[test]
fn test_undecodable_stream_packets_are_withheld() {
    let mut media = Media::audio(1000, 2, 200);
    media.streams.push(StreamInfo::video("AVC", 1280, 720));
    media
        .packets
        .push(Packet::new(1, 100, Bytes::from_static(b"frame")));

    let opener = FakeOpener::default()
        .with("a.mp4", media.clone())
        .with("b.mp4", media)
        .without_decoder_for("AAC");
    let playlist = Playlist::from_paths(["a.mp4", "b.mp4"]);
    let mut source = VirtualSource::open(playlist, opener).unwrap();

    // The undecodable stream keeps its slot in the table.
    assert_eq!(source.streams().len(), 2);

    let packets = drain(&mut source);
    // Only the video packets survive, one per member.
    assert_eq!(packets.len(), 2);
    assert_eq!(packets[0].stream_index, 1);
    assert_eq!(packets[1].stream_index, 3);
}

#[test]
fn test_single_member_playlist_plays() {
    // A one-member playlist is degenerate for the encoded-string form but
    // fine when built programmatically.
    let opener = FakeOpener::default().with("a.mp4", Media::audio(1000, 3, 200));
    let playlist = Playlist::from_paths(["a.mp4"]);
    let mut source = VirtualSource::open(playlist, opener).unwrap();

    assert_eq!(drain(&mut source).len(), 3);
    assert!(source.cursor().is_exhausted());
}

#[test]
fn test_encoded_string_playlist_round_trip() {
    let opener = FakeOpener::default()
        .with("a.mp4", Media::audio(500, 1, 100))
        .with("b.mp4", Media::audio(500, 1, 100))
        .with("c.mp4", Media::audio(500, 1, 100));
    let playlist = Playlist::from_encoded("a.mp4|b.mp4|c.mp4", '|').unwrap();
    let mut source = VirtualSource::open(playlist, opener).unwrap();

    let packets = drain(&mut source);
    assert_eq!(packets.len(), 3);
    assert_eq!(
        packets.iter().map(|p| p.stream_index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert_eq!(
        packets.iter().map(|p| p.pts_ms).collect::<Vec<_>>(),
        vec![0, 500, 1000]
    );
}

#[test]
fn test_playlist_file_round_trip() {
    // A playlist file on disk, with members relative to its directory,
    // driven end to end through the source.
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("list.m3u"), "#EXTM3U\na.mp4\nb.mp4\n").unwrap();
    std::fs::write(dir.path().join("a.mp4"), b"x").unwrap();
    std::fs::write(dir.path().join("b.mp4"), b"x").unwrap();

    let opener = FakeOpener::default()
        .with(dir.path().join("a.mp4"), Media::audio(1000, 2, 200))
        .with(dir.path().join("b.mp4"), Media::audio(500, 1, 100));
    let playlist = Playlist::load(dir.path().join("list.m3u")).unwrap();
    let mut source = VirtualSource::open(playlist, opener).unwrap();

    let packets = drain(&mut source);
    assert_eq!(packets.len(), 3);
    assert_eq!(packets[2].stream_index, 1);
    assert_eq!(packets[2].pts_ms, 1000);
}

#[test]
fn test_seek_to_vanished_member_fails() {
    let opener = OneShotOpener::new(
        FakeOpener::default()
            .with("a.mp4", Media::audio(1000, 2, 500))
            .with("b.mp4", Media::audio(1000, 2, 500)),
    );
    let playlist = Playlist::from_paths(["a.mp4", "b.mp4"]);
    let mut source = VirtualSource::open(playlist, opener).unwrap();

    drain(&mut source);
    assert!(source.cursor().is_exhausted());

    // The first member can no longer be reopened; the jump reports the
    // failure instead of silently skipping, and the cursor is untouched.
    let err = source.seek(500).unwrap_err();
    assert_matches!(err, ConcatError::OpenFailure { path } if path == Path::new("a.mp4"));
    assert!(source.cursor().is_exhausted());
    assert_eq!(source.read_packet().unwrap(), None);
}
