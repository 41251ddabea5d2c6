//! The video library seam.
//!
//! The batch converter never talks to FFmpeg directly. It opens clips
//! through a [`VideoBackend`] and drives the returned [`DecodedClip`]:
//! read its metadata, optionally resize it, then write a GIF. Dropping the
//! clip releases every decode resource it holds.
//!
//! [`FfmpegBackend`](crate::FfmpegBackend) is the production implementation.

use std::path::Path;

use crate::{error::ClipGifError, metadata::ClipMetadata, preset::GifWriteOptions};

/// Opens video files for conversion.
pub trait VideoBackend {
    /// Open and probe the video at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or holds no video.
    fn open(&self, path: &Path) -> Result<Box<dyn DecodedClip>, ClipGifError>;
}

/// An opened video, ready to be written as a GIF.
///
/// Implementations release their decoder state in [`Drop`].
pub trait DecodedClip {
    /// Metadata read when the clip was opened.
    fn metadata(&self) -> &ClipMetadata;

    /// Scale output frames to `width` pixels, preserving aspect ratio.
    fn resize(&mut self, width: u32);

    /// Decode the clip and write it to `output` as an animated GIF.
    ///
    /// Returns the number of frames written.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding or encoding fails. No file is left at
    /// `output` when the clip produced no frames.
    fn write_gif(&mut self, output: &Path, options: &GifWriteOptions) -> Result<u64, ClipGifError>;
}
