//! MP4 encoding through an external `ffmpeg` process.
//!
//! [`ffmpeg`] turns a captured image sequence into a clip; [`sink`] streams raw RGBA frames
//! into an encoder as they are recorded.

/// Encoder discovery and image-sequence encoding.
pub mod ffmpeg;
/// Streaming frame sinks.
pub mod sink;
