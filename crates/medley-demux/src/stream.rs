//! Stream descriptors published by demuxers.

/// Broad media category of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum MediaKind {
    /// Video stream.
    Video,
    /// Audio stream.
    Audio,
    /// Subtitle stream.
    Subtitle,
    /// Anything else (metadata, timecode, attachments).
    Data,
}

impl MediaKind {
    /// Whether this is a video stream.
    pub fn is_video(&self) -> bool {
        matches!(self, MediaKind::Video)
    }

    /// Whether this is an audio stream.
    pub fn is_audio(&self) -> bool {
        matches!(self, MediaKind::Audio)
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Subtitle => write!(f, "subtitle"),
            MediaKind::Data => write!(f, "data"),
        }
    }
}

/// Per-stream format descriptor.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamInfo {
    /// Media category.
    pub kind: MediaKind,
    /// Codec identifier (e.g., "AVC", "HEVC", "AAC").
    pub codec: String,
    /// Video width in pixels.
    pub width: Option<u32>,
    /// Video height in pixels.
    pub height: Option<u32>,
    /// Audio sample rate in Hz.
    pub sample_rate: Option<u32>,
    /// Audio channel count.
    pub channels: Option<u16>,
    /// Codec-specific private data (e.g., avcC or esds contents).
    pub codec_data: Option<Vec<u8>>,
}

impl StreamInfo {
    /// Create a video stream descriptor.
    pub fn video(codec: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            kind: MediaKind::Video,
            codec: codec.into(),
            width: Some(width),
            height: Some(height),
            sample_rate: None,
            channels: None,
            codec_data: None,
        }
    }

    /// Create an audio stream descriptor.
    pub fn audio(codec: impl Into<String>, sample_rate: u32, channels: u16) -> Self {
        Self {
            kind: MediaKind::Audio,
            codec: codec.into(),
            width: None,
            height: None,
            sample_rate: Some(sample_rate),
            channels: Some(channels),
            codec_data: None,
        }
    }
}
