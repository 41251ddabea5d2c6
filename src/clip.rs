//! FFmpeg-backed clips.
//!
//! [`FfmpegBackend`] opens files with `ffmpeg-next` and hands out
//! [`VideoClip`] handles. A clip owns the demuxer context for its file; the
//! decoder, scaler and GIF writer live only for the duration of a
//! [`write_gif`](DecodedClip::write_gif) call, and everything is released
//! when the clip is dropped.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
    Rational,
};
use image::RgbaImage;

use crate::{
    backend::{DecodedClip, VideoBackend},
    encode::FfmpegGifWriter,
    error::ClipGifError,
    ffmpeg::FfmpegLogLevel,
    gif::{GifSink, NativeGifWriter},
    metadata::ClipMetadata,
    preset::{EncoderBackend, GifWriteOptions, Optimization},
    sampling::FrameSampler,
};

/// Opens clips with FFmpeg.
#[derive(Debug, Clone, Default)]
pub struct FfmpegBackend {
    log_level: Option<FfmpegLogLevel>,
}

impl FfmpegBackend {
    /// Backend that leaves FFmpeg's console verbosity alone.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that applies `level` to FFmpeg's console output on each open.
    pub fn with_log_level(level: FfmpegLogLevel) -> Self {
        Self {
            log_level: Some(level),
        }
    }
}

impl VideoBackend for FfmpegBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn DecodedClip>, ClipGifError> {
        if let Some(level) = self.log_level {
            crate::ffmpeg::set_ffmpeg_log_level(level);
        }
        Ok(Box::new(VideoClip::open(path)?))
    }
}

/// An opened video file.
pub struct VideoClip {
    /// The opened FFmpeg input (demuxer) context.
    input_context: Input,
    /// Index of the best video stream.
    video_stream_index: usize,
    /// Metadata read at open time.
    metadata: ClipMetadata,
    /// Output width requested through [`DecodedClip::resize`].
    target_width: Option<u32>,
    /// Set once the demuxer has been read through, so a second write seeks
    /// back to the start.
    consumed: bool,
    /// Path to the opened file (kept for error messages).
    file_path: PathBuf,
}

impl Debug for VideoClip {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoClip")
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("target_width", &self.target_width)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

impl VideoClip {
    /// Open a video file and read its metadata.
    ///
    /// Initializes FFmpeg (idempotent), opens the file, locates the best
    /// video stream, and caches its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ClipGifError::FileOpen`] if the file cannot be opened, or
    /// [`ClipGifError::NoVideoStream`] if it carries no video.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ClipGifError> {
        let path = path.as_ref();
        let file_path = path.to_path_buf();

        log::debug!("Opening video file: {}", file_path.display());

        ffmpeg_next::init().map_err(|error| ClipGifError::FileOpen {
            path: file_path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| ClipGifError::FileOpen {
                path: file_path.clone(),
                reason: error.to_string(),
            })?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or(ClipGifError::NoVideoStream)?;
        let video_stream_index = stream.index();

        let decoder = CodecContext::from_parameters(stream.parameters())
            .and_then(|context| context.decoder().video())
            .map_err(|error| ClipGifError::FileOpen {
                path: file_path.clone(),
                reason: format!("Failed to create video decoder: {error}"),
            })?;

        let frames_per_second = {
            let average = crate::conversion::rational_to_fps(stream.avg_frame_rate());
            if average > 0.0 {
                average
            } else {
                crate::conversion::rational_to_fps(stream.rate())
            }
        };

        // Container duration is in AV_TIME_BASE (microseconds); fall back to
        // the stream's own duration when the container does not report one.
        let duration = {
            let container_microseconds = input_context.duration();
            if container_microseconds > 0 {
                Duration::from_micros(container_microseconds as u64)
            } else if stream.duration() > 0 {
                let seconds =
                    crate::conversion::pts_to_seconds(stream.duration(), stream.time_base());
                Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
            } else {
                Duration::ZERO
            }
        };

        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = ClipMetadata {
            duration,
            frames_per_second,
            width: decoder.width(),
            height: decoder.height(),
            codec,
            format: input_context.format().name().to_string(),
        };

        log::debug!(
            "Opened video file: {} (format={}, duration={:.2}s, {}x{}, {:.2} fps, codec={})",
            file_path.display(),
            metadata.format,
            metadata.duration.as_secs_f64(),
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.codec,
        );

        Ok(Self {
            input_context,
            video_stream_index,
            metadata,
            target_width: None,
            consumed: false,
            file_path,
        })
    }

    /// Output dimensions after any requested resize.
    pub fn output_dimensions(&self) -> (u32, u32) {
        crate::conversion::scaled_dimensions(
            self.target_width,
            self.metadata.width,
            self.metadata.height,
        )
    }

    /// Decode every frame and feed the sampled ones to `sink`.
    fn encode_into(
        &mut self,
        sink: &mut dyn GifSink,
        options: &GifWriteOptions,
    ) -> Result<u64, ClipGifError> {
        if self.consumed {
            self.input_context.seek(0, ..0)?;
        }
        self.consumed = true;

        let stream = self
            .input_context
            .stream(self.video_stream_index)
            .ok_or(ClipGifError::NoVideoStream)?;
        let time_base = stream.time_base();
        let decoder_context = CodecContext::from_parameters(stream.parameters())?;
        let mut decoder = decoder_context.decoder().video()?;

        let (width, height) = self.output_dimensions();
        let scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGBA,
            width,
            height,
            ScalingFlags::BILINEAR,
        )?;

        let mut pipeline = FramePipeline {
            scaler,
            sampler: FrameSampler::new(options.frames_per_second),
            sink,
            time_base,
            width,
            height,
            pending: None,
            frames_written: 0,
        };

        let rate = match pipeline.sampler.frames_per_second() {
            Some(rate) => format!("{rate:.2} fps"),
            None => "every frame".to_string(),
        };
        log::debug!(
            "Encoding {} at {}x{}, {} ({})",
            self.file_path.display(),
            width,
            height,
            rate,
            options.backend,
        );

        for (stream, packet) in self.input_context.packets() {
            if stream.index() != self.video_stream_index {
                continue;
            }
            decoder.send_packet(&packet)?;
            pipeline.receive_frames(&mut decoder)?;
        }

        decoder.send_eof()?;
        pipeline.receive_frames(&mut decoder)?;
        pipeline.finish()
    }
}

impl DecodedClip for VideoClip {
    fn metadata(&self) -> &ClipMetadata {
        &self.metadata
    }

    fn resize(&mut self, width: u32) {
        self.target_width = Some(width.max(1));
    }

    fn write_gif(&mut self, output: &Path, options: &GifWriteOptions) -> Result<u64, ClipGifError> {
        let (width, height) = self.output_dimensions();

        let result = match options.backend {
            EncoderBackend::Native => File::create(output)
                .map_err(ClipGifError::from)
                .and_then(|file| {
                    let mut writer =
                        NativeGifWriter::new(BufWriter::new(file), width, height, options)?;
                    self.encode_into(&mut writer, options)
                }),
            EncoderBackend::Ffmpeg => {
                if options.optimization != Optimization::None || options.fuzz > 0 {
                    log::debug!("FFmpeg GIF encoder ignores optimization and fuzz settings");
                }
                FfmpegGifWriter::create(output, width, height)
                    .and_then(|mut writer| self.encode_into(&mut writer, options))
            }
        };

        match result {
            Ok(0) => {
                remove_partial_output(output);
                Err(ClipGifError::EmptyClip(self.file_path.clone()))
            }
            Ok(frames) => Ok(frames),
            Err(error) => {
                remove_partial_output(output);
                Err(error)
            }
        }
    }
}

/// Best-effort removal of a GIF left behind by a failed write.
fn remove_partial_output(output: &Path) {
    if let Err(error) = std::fs::remove_file(output) {
        if error.kind() != std::io::ErrorKind::NotFound {
            log::warn!("Could not remove partial output {}: {error}", output.display());
        }
    }
}

/// Decoded frames → scaled RGBA → sampled → sink.
///
/// Holds back one frame so its delay can run until the next kept frame.
struct FramePipeline<'a> {
    scaler: ScalingContext,
    sampler: FrameSampler,
    sink: &'a mut dyn GifSink,
    time_base: Rational,
    width: u32,
    height: u32,
    pending: Option<(RgbaImage, u64)>,
    frames_written: u64,
}

impl FramePipeline<'_> {
    fn receive_frames(&mut self, decoder: &mut VideoDecoder) -> Result<(), ClipGifError> {
        let mut decoded_frame = VideoFrame::empty();
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            let seconds = decoded_frame
                .timestamp()
                .or_else(|| decoded_frame.pts())
                .map(|pts| crate::conversion::pts_to_seconds(pts, self.time_base));

            let Some(start) = self.sampler.select(seconds) else {
                continue;
            };

            let mut rgba_frame = VideoFrame::empty();
            self.scaler.run(&decoded_frame, &mut rgba_frame)?;
            let buffer =
                crate::conversion::frame_to_buffer(&rgba_frame, self.width, self.height, 4);
            let image = RgbaImage::from_raw(self.width, self.height, buffer).ok_or_else(|| {
                ClipGifError::VideoDecodeError(
                    "Failed to construct RGBA image from decoded frame data".to_string(),
                )
            })?;

            if let Some((previous, previous_start)) = self.pending.replace((image, start)) {
                self.emit(&previous, previous_start, start)?;
            }
        }
        Ok(())
    }

    fn emit(&mut self, image: &RgbaImage, start: u64, next_start: u64) -> Result<(), ClipGifError> {
        let delay = self.sampler.delay(start, next_start);
        self.sink.push_frame(image, start, delay)?;
        self.frames_written += 1;
        Ok(())
    }

    fn finish(mut self) -> Result<u64, ClipGifError> {
        if let Some((image, start)) = self.pending.take() {
            let end = self.sampler.closing_centiseconds();
            self.emit(&image, start, end)?;
        }
        self.sink.close()?;
        Ok(self.frames_written)
    }
}
