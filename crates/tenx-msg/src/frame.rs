//! Media frames.
//!
//! Frames are delivered to extensions without a reply. The buffer is
//! opaque to this crate; `Display` summarizes a frame for log lines
//! without dumping the samples.

use serde::{Deserialize, Serialize};

/// A block of PCM audio.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioFrame {
    pub name: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub bytes_per_sample: u16,
    pub samples_per_channel: u32,
    /// Capture timestamp in milliseconds.
    pub timestamp_ms: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buf: Vec<u8>,
}

impl AudioFrame {
    /// Expected buffer length for the declared layout.
    #[must_use]
    pub fn expected_len(&self) -> usize {
        self.samples_per_channel as usize * self.channels as usize * self.bytes_per_sample as usize
    }
}

impl std::fmt::Display for AudioFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "audio[{} {}Hz x{} {}B/sample {} samples ts={} len={}]",
            self.name,
            self.sample_rate,
            self.channels,
            self.bytes_per_sample,
            self.samples_per_channel,
            self.timestamp_ms,
            self.buf.len()
        )
    }
}

/// Pixel layout of a [`VideoFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    #[default]
    Rgba,
    Rgb24,
    Bgr24,
    I420,
    Nv12,
}

/// A single video picture.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoFrame {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
    /// Capture timestamp in milliseconds.
    pub timestamp_ms: i64,
    pub is_eof: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buf: Vec<u8>,
}

impl std::fmt::Display for VideoFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "video[{} {}x{} {:?} ts={} eof={} len={}]",
            self.name,
            self.width,
            self.height,
            self.pixel_format,
            self.timestamp_ms,
            self.is_eof,
            self.buf.len()
        )
    }
}
