//! Clip metadata.
//!
//! [`ClipMetadata`] is read once when a clip is opened and cached for the
//! lifetime of the decoded handle.

use std::time::Duration;

/// Stream and container information for an opened video clip.
///
/// # Example
///
/// ```no_run
/// use clipgif::{DecodedClip, FfmpegBackend, VideoBackend};
///
/// let clip = FfmpegBackend::new().open("Input/Clips/clip1.mp4".as_ref())?;
/// let metadata = clip.metadata();
/// println!("{:.2}s at {:.2} fps", metadata.duration.as_secs_f64(), metadata.frames_per_second);
/// # Ok::<(), clipgif::ClipGifError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct ClipMetadata {
    /// Total duration of the clip. `Duration::ZERO` when unknown.
    pub duration: Duration,
    /// Average frames per second (may be approximate for variable-frame-rate
    /// content).
    pub frames_per_second: f64,
    /// Source frame width in pixels.
    pub width: u32,
    /// Source frame height in pixels.
    pub height: u32,
    /// Codec name (e.g. `"h264"`, `"vp9"`).
    pub codec: String,
    /// Container format name (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`, `"matroska,webm"`).
    pub format: String,
}

impl ClipMetadata {
    /// Estimated number of source frames, from duration and frame rate.
    pub fn estimated_frame_count(&self) -> u64 {
        if self.frames_per_second > 0.0 {
            (self.duration.as_secs_f64() * self.frames_per_second) as u64
        } else {
            0
        }
    }
}
