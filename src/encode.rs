//! GIF output through libavcodec's GIF encoder.
//!
//! [`FfmpegGifWriter`] is the [`EncoderBackend::Ffmpeg`](crate::EncoderBackend)
//! path. Frames are converted to FFmpeg's fixed `RGB8` palette format and
//! muxed by the `gif` muxer. Presentation timestamps are in centiseconds and
//! the muxer derives each frame's delay from the gap to the next one, so the
//! timing matches the native writer.

use std::path::Path;

use ffmpeg_next::codec::Id;
use ffmpeg_next::codec::context::Context as CodecContext;
use ffmpeg_next::codec::encoder::video::Encoder as VideoEncoder;
use ffmpeg_next::format::context::Output;
use ffmpeg_next::format::{Flags as FormatFlags, Pixel};
use ffmpeg_next::frame::Video as VideoFrame;
use ffmpeg_next::software::scaling::{Context as ScalingContext, Flags as ScalingFlags};
use ffmpeg_next::{Packet, Rational};
use image::RgbaImage;

use crate::error::ClipGifError;
use crate::gif::GifSink;

/// Encoder time base: one tick per GIF delay unit.
const CENTISECOND: Rational = Rational(1, 100);

/// Writes a GIF file with FFmpeg's encoder and muxer.
pub(crate) struct FfmpegGifWriter {
    output: Output,
    encoder: VideoEncoder,
    scaler: ScalingContext,
    stream_index: usize,
    stream_time_base: Rational,
    width: u32,
    height: u32,
    frames_written: u64,
    finished: bool,
}

impl FfmpegGifWriter {
    /// Open `path` and write the GIF header.
    pub(crate) fn create(path: &Path, width: u32, height: u32) -> Result<Self, ClipGifError> {
        if width > u16::MAX as u32 || height > u16::MAX as u32 {
            return Err(ClipGifError::FrameTooLarge { width, height });
        }

        log::debug!("Starting FFmpeg GIF {}x{} at {:?}", width, height, path);

        let mut output = ffmpeg_next::format::output_as(&path, "gif")
            .map_err(|e| ClipGifError::GifEncodeError(format!("cannot open output: {e}")))?;

        let needs_global_header = output.format().flags().contains(FormatFlags::GLOBAL_HEADER);

        let encoder_codec = ffmpeg_next::encoder::find(Id::GIF).ok_or_else(|| {
            ClipGifError::GifEncodeError("FFmpeg was built without a GIF encoder".to_string())
        })?;

        let mut stream = output
            .add_stream(encoder_codec)
            .map_err(|e| ClipGifError::GifEncodeError(format!("cannot add stream: {e}")))?;
        let stream_index = stream.index();

        let mut encoder = CodecContext::from_parameters(stream.parameters())
            .map_err(|e| ClipGifError::GifEncodeError(format!("cannot create codec context: {e}")))?
            .encoder()
            .video()
            .map_err(|e| ClipGifError::GifEncodeError(format!("cannot open video encoder: {e}")))?;

        encoder.set_width(width);
        encoder.set_height(height);
        encoder.set_format(Pixel::RGB8);
        encoder.set_time_base(CENTISECOND);

        if needs_global_header {
            unsafe {
                (*encoder.as_mut_ptr()).flags |=
                    ffmpeg_sys_next::AV_CODEC_FLAG_GLOBAL_HEADER as i32;
            }
        }

        let encoder = encoder
            .open_as(encoder_codec)
            .map_err(|e| ClipGifError::GifEncodeError(format!("cannot open encoder: {e}")))?;

        stream.set_parameters(&encoder);
        stream.set_time_base(CENTISECOND);

        output
            .write_header()
            .map_err(|e| ClipGifError::GifEncodeError(format!("cannot write header: {e}")))?;

        // The muxer may pick its own time base while writing the header.
        let stream_time_base = output
            .stream(stream_index)
            .map(|stream| stream.time_base())
            .unwrap_or(CENTISECOND);

        let scaler = ScalingContext::get(
            Pixel::RGBA,
            width,
            height,
            Pixel::RGB8,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|e| ClipGifError::GifEncodeError(format!("cannot create scaler: {e}")))?;

        Ok(Self {
            output,
            encoder,
            scaler,
            stream_index,
            stream_time_base,
            width,
            height,
            frames_written: 0,
            finished: false,
        })
    }

    /// Move every packet the encoder has ready into the muxer.
    fn drain_packets(&mut self) -> Result<(), ClipGifError> {
        let mut packet = Packet::empty();
        while self.encoder.receive_packet(&mut packet).is_ok() {
            packet.set_stream(self.stream_index);
            packet.rescale_ts(CENTISECOND, self.stream_time_base);
            packet
                .write_interleaved(&mut self.output)
                .map_err(|e| ClipGifError::GifEncodeError(format!("write packet failed: {e}")))?;
        }
        Ok(())
    }
}

impl GifSink for FfmpegGifWriter {
    fn push_frame(
        &mut self,
        image: &RgbaImage,
        start_centiseconds: u64,
        _delay_centiseconds: u16,
    ) -> Result<(), ClipGifError> {
        if image.width() != self.width || image.height() != self.height {
            return Err(ClipGifError::GifEncodeError(format!(
                "Frame is {}x{} but the GIF is {}x{}",
                image.width(),
                image.height(),
                self.width,
                self.height,
            )));
        }

        let mut rgba_frame = VideoFrame::new(Pixel::RGBA, self.width, self.height);
        crate::conversion::buffer_to_frame(image.as_raw(), &mut rgba_frame, 4);

        let mut palette_frame = VideoFrame::empty();
        self.scaler
            .run(&rgba_frame, &mut palette_frame)
            .map_err(|e| ClipGifError::GifEncodeError(format!("scaling failed: {e}")))?;
        palette_frame.set_pts(Some(start_centiseconds as i64));

        self.encoder
            .send_frame(&palette_frame)
            .map_err(|e| ClipGifError::GifEncodeError(format!("send_frame failed: {e}")))?;
        self.frames_written += 1;
        self.drain_packets()
    }

    fn close(&mut self) -> Result<(), ClipGifError> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        self.encoder
            .send_eof()
            .map_err(|e| ClipGifError::GifEncodeError(format!("send_eof failed: {e}")))?;
        self.drain_packets()?;

        self.output
            .write_trailer()
            .map_err(|e| ClipGifError::GifEncodeError(format!("cannot write trailer: {e}")))?;

        log::debug!("FFmpeg GIF finished after {} frames", self.frames_written);
        Ok(())
    }
}
