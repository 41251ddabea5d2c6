//! Native animated GIF writer.
//!
//! [`NativeGifWriter`] streams RGBA frames into the `gif` crate, quantising
//! each one to a 256-colour palette with NeuQuant. With an
//! [`Optimization`] other than `None`, pixels that have not visibly changed
//! since the previously displayed frame are written as transparent, and with
//! [`Optimization::TransparencyCrop`] each frame is further cut down to the
//! rectangle that did change.
//!
//! # Example
//!
//! ```
//! use clipgif::{GifWriteOptions, NativeGifWriter, Optimization};
//! use image::{Rgba, RgbaImage};
//!
//! let options = GifWriteOptions {
//!     optimization: Optimization::TransparencyCrop,
//!     ..GifWriteOptions::default()
//! };
//! let mut bytes = Vec::new();
//! {
//!     let mut writer = NativeGifWriter::new(&mut bytes, 16, 16, &options)?;
//!     writer.write_frame(&RgbaImage::from_pixel(16, 16, Rgba([255, 0, 0, 255])), 10)?;
//!     writer.write_frame(&RgbaImage::from_pixel(16, 16, Rgba([0, 0, 255, 255])), 10)?;
//!     writer.finish()?;
//! }
//! assert!(bytes.starts_with(b"GIF89a"));
//! # Ok::<(), clipgif::ClipGifError>(())
//! ```

use std::io::Write;

use gif::{DisposalMethod, Encoder, Frame, Repeat};
use image::RgbaImage;

use crate::error::ClipGifError;
use crate::preset::{GifWriteOptions, Optimization};

/// Destination for the frames of one GIF.
///
/// Implemented by the native writer and by the FFmpeg encoder.
pub(crate) trait GifSink {
    /// Append a frame starting at `start_centiseconds` and shown for
    /// `delay_centiseconds`.
    fn push_frame(
        &mut self,
        image: &RgbaImage,
        start_centiseconds: u64,
        delay_centiseconds: u16,
    ) -> Result<(), ClipGifError>;

    /// Flush buffered data and write the trailer.
    fn close(&mut self) -> Result<(), ClipGifError>;
}

/// Rectangle of a frame that is actually written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameRegion {
    pub(crate) left: u32,
    pub(crate) top: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

/// Tracks the displayed canvas and rewrites frames against it.
#[derive(Debug)]
pub(crate) struct FrameOptimizer {
    optimization: Optimization,
    fuzz: u8,
    canvas: Option<Vec<u8>>,
}

impl FrameOptimizer {
    pub(crate) fn new(optimization: Optimization, fuzz: u8) -> Self {
        Self {
            optimization,
            fuzz: fuzz.min(100),
            canvas: None,
        }
    }

    /// Colour distance test scaled so `fuzz` is a percentage of the RGB
    /// cube diagonal.
    fn is_unchanged(&self, previous: &[u8], current: &[u8]) -> bool {
        let distance_squared: u64 = previous[..3]
            .iter()
            .zip(&current[..3])
            .map(|(a, b)| {
                let delta = (*a as i64 - *b as i64).unsigned_abs();
                delta * delta
            })
            .sum();
        let fuzz = self.fuzz as u64;
        distance_squared * 10_000 <= fuzz * fuzz * 3 * 255 * 255
    }

    /// Rewrite `pixels` (RGBA, `width * height * 4` bytes) in place and
    /// return the region that must be encoded.
    pub(crate) fn apply(&mut self, pixels: &mut [u8], width: u32, height: u32) -> FrameRegion {
        let full = FrameRegion {
            left: 0,
            top: 0,
            width,
            height,
        };

        if self.optimization == Optimization::None {
            return full;
        }

        let Some(mut canvas) = self.canvas.take() else {
            self.canvas = Some(pixels.to_vec());
            return full;
        };

        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (index, (shown, current)) in canvas
            .chunks_exact_mut(4)
            .zip(pixels.chunks_exact_mut(4))
            .enumerate()
        {
            if self.is_unchanged(shown, current) {
                current.copy_from_slice(&[0, 0, 0, 0]);
                continue;
            }

            shown.copy_from_slice(current);
            let x = index as u32 % width;
            let y = index as u32 / width;
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((min_x, min_y, max_x, max_y)) => {
                    (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
                }
            });
        }
        self.canvas = Some(canvas);

        if self.optimization != Optimization::TransparencyCrop {
            return full;
        }

        match bounds {
            Some((min_x, min_y, max_x, max_y)) => FrameRegion {
                left: min_x,
                top: min_y,
                width: max_x - min_x + 1,
                height: max_y - min_y + 1,
            },
            None => FrameRegion {
                left: 0,
                top: 0,
                width: 1,
                height: 1,
            },
        }
    }
}

/// Copy `region` out of a full RGBA frame.
fn crop_pixels(pixels: &[u8], frame_width: u32, region: FrameRegion) -> Vec<u8> {
    let row_length = region.width as usize * 4;
    let mut cropped = Vec::with_capacity(row_length * region.height as usize);
    for row in region.top..region.top + region.height {
        let start = (row as usize * frame_width as usize + region.left as usize) * 4;
        cropped.extend_from_slice(&pixels[start..start + row_length]);
    }
    cropped
}

/// Streams frames into an animated GIF that loops forever.
pub struct NativeGifWriter<W: Write> {
    encoder: Option<Encoder<W>>,
    width: u32,
    height: u32,
    quantizer_speed: i32,
    optimizer: FrameOptimizer,
    frames_written: u64,
}

impl<W: Write> NativeGifWriter<W> {
    /// Start a GIF of `width` x `height` pixels on `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`ClipGifError::FrameTooLarge`] if either dimension exceeds
    /// 65535, or [`ClipGifError::GifEncodeError`] if the header cannot be
    /// written.
    pub fn new(
        writer: W,
        width: u32,
        height: u32,
        options: &GifWriteOptions,
    ) -> Result<Self, ClipGifError> {
        let (Ok(screen_width), Ok(screen_height)) = (u16::try_from(width), u16::try_from(height))
        else {
            return Err(ClipGifError::FrameTooLarge { width, height });
        };

        log::debug!(
            "Starting native GIF {}x{} (optimization={}, fuzz={}, speed={})",
            width,
            height,
            options.optimization,
            options.fuzz,
            options.quantizer_speed,
        );

        let mut encoder = Encoder::new(writer, screen_width, screen_height, &[]).map_err(|e| {
            ClipGifError::GifEncodeError(format!("Failed to create GIF encoder: {e}"))
        })?;
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| ClipGifError::GifEncodeError(format!("Failed to set GIF repeat: {e}")))?;

        Ok(Self {
            encoder: Some(encoder),
            width,
            height,
            quantizer_speed: options.quantizer_speed.clamp(1, 30),
            optimizer: FrameOptimizer::new(options.optimization, options.fuzz),
            frames_written: 0,
        })
    }

    /// Append a frame shown for `delay` hundredths of a second.
    ///
    /// # Errors
    ///
    /// Returns [`ClipGifError::GifEncodeError`] if the frame size does not
    /// match the GIF or the frame cannot be written.
    pub fn write_frame(&mut self, image: &RgbaImage, delay: u16) -> Result<(), ClipGifError> {
        if image.width() != self.width || image.height() != self.height {
            return Err(ClipGifError::GifEncodeError(format!(
                "Frame is {}x{} but the GIF is {}x{}",
                image.width(),
                image.height(),
                self.width,
                self.height,
            )));
        }
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| ClipGifError::GifEncodeError("GIF writer already finished".into()))?;

        let mut pixels = image.as_raw().clone();
        let region = self.optimizer.apply(&mut pixels, self.width, self.height);
        let mut region_pixels = if region.width == self.width && region.height == self.height {
            pixels
        } else {
            crop_pixels(&pixels, self.width, region)
        };

        let mut frame = Frame::from_rgba_speed(
            region.width as u16,
            region.height as u16,
            &mut region_pixels,
            self.quantizer_speed,
        );
        frame.left = region.left as u16;
        frame.top = region.top as u16;
        frame.delay = delay;
        frame.dispose = DisposalMethod::Keep;

        encoder
            .write_frame(&frame)
            .map_err(|e| ClipGifError::GifEncodeError(format!("Failed to write GIF frame: {e}")))?;
        self.frames_written += 1;
        Ok(())
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Write the trailer and flush the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns [`ClipGifError::GifEncodeError`] if the trailer cannot be
    /// written or the writer fails to flush. Calling it again after success
    /// is a no-op.
    pub fn finish(&mut self) -> Result<(), ClipGifError> {
        let Some(encoder) = self.encoder.take() else {
            return Ok(());
        };
        let mut writer = encoder
            .into_inner()
            .map_err(|e| ClipGifError::GifEncodeError(format!("Failed to write GIF trailer: {e}")))?;
        writer
            .flush()
            .map_err(|e| ClipGifError::GifEncodeError(format!("Failed to flush GIF output: {e}")))
    }
}

impl<W: Write> GifSink for NativeGifWriter<W> {
    fn push_frame(
        &mut self,
        image: &RgbaImage,
        _start_centiseconds: u64,
        delay_centiseconds: u16,
    ) -> Result<(), ClipGifError> {
        self.write_frame(image, delay_centiseconds)
    }

    fn close(&mut self) -> Result<(), ClipGifError> {
        self.finish()
    }
}
