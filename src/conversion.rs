//! Internal utility functions.
//!
//! Helpers for pixel-data copying, timestamp conversion and output sizing
//! shared by the decode and encode paths.

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// Copy pixel data from an FFmpeg video frame into a tightly-packed buffer.
///
/// `bytes_per_pixel` is 4 for the RGBA frames produced by the decoder.
pub fn frame_to_buffer(
    video_frame: &VideoFrame,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let row_length = (width as usize) * bytes_per_pixel;
    let data = video_frame.data(0);

    if stride == row_length {
        data[..row_length * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(row_length * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + row_length]);
        }
        buffer
    }
}

/// Copy a tightly-packed buffer into an FFmpeg frame, honouring its stride.
pub fn buffer_to_frame(buffer: &[u8], video_frame: &mut VideoFrame, bytes_per_pixel: usize) {
    let width = video_frame.width() as usize;
    let height = video_frame.height() as usize;
    let stride = video_frame.stride(0);
    let row_length = width * bytes_per_pixel;
    let data = video_frame.data_mut(0);

    for row in 0..height {
        let source = &buffer[row * row_length..(row + 1) * row_length];
        data[row * stride..row * stride + row_length].copy_from_slice(source);
    }
}

/// Rescale a PTS value from stream time base to seconds.
pub fn pts_to_seconds(pts: i64, time_base: Rational) -> f64 {
    if time_base.denominator() == 0 {
        return 0.0;
    }
    pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64
}

/// Convert a rational frame rate to frames per second, `0.0` if undefined.
pub fn rational_to_fps(rate: Rational) -> f64 {
    if rate.numerator() > 0 && rate.denominator() > 0 {
        rate.numerator() as f64 / rate.denominator() as f64
    } else {
        0.0
    }
}

/// Output dimensions for an optional target width, preserving aspect ratio.
///
/// Returns `(width, height)`; both are at least 1.
pub fn scaled_dimensions(
    target_width: Option<u32>,
    source_width: u32,
    source_height: u32,
) -> (u32, u32) {
    match target_width {
        Some(width) if source_width > 0 => {
            let ratio = width as f64 / source_width as f64;
            let height = (source_height as f64 * ratio).round() as u32;
            (width.max(1), height.max(1))
        }
        Some(width) => (width.max(1), source_height.max(1)),
        None => (source_width.max(1), source_height.max(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_dimensions_preserve_aspect_ratio() {
        assert_eq!(scaled_dimensions(Some(1080), 1920, 1080), (1080, 608));
        assert_eq!(scaled_dimensions(Some(640), 1280, 720), (640, 360));
        assert_eq!(scaled_dimensions(None, 320, 240), (320, 240));
    }

    #[test]
    fn scaled_dimensions_never_collapse_to_zero() {
        assert_eq!(scaled_dimensions(Some(1), 4000, 10), (1, 1));
    }

    #[test]
    fn undefined_rates_are_zero() {
        assert_eq!(rational_to_fps(Rational::new(0, 1)), 0.0);
        assert_eq!(rational_to_fps(Rational::new(30, 0)), 0.0);
        assert_eq!(rational_to_fps(Rational::new(30000, 1001)), 30000.0 / 1001.0);
    }
}
