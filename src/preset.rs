//! Encode presets.
//!
//! An [`EncodePreset`] bundles every parameter that shapes the GIF written
//! for a clip: resize width, frame-rate cap, encoder backend, optimisation
//! mode, colour fuzz, and whether zero-duration clips are rejected up front.
//!
//! Two named presets are provided through [`PresetName`]:
//!
//! | Preset            | Width | FPS cap | Backend | Optimisation       | Fuzz | Duration check |
//! |-------------------|-------|---------|---------|--------------------|------|----------------|
//! | `default`         | source| none    | FFmpeg  | none               | 0    | yes            |
//! | `sized-optimized` | 1080  | 60      | native  | transparency + crop| 10   | no             |
//!
//! # Example
//!
//! ```
//! use clipgif::{EncodePreset, EncoderBackend, PresetName};
//!
//! let preset = EncodePreset::named(PresetName::SizedOptimized)
//!     .with_width(720)
//!     .with_backend(EncoderBackend::Native);
//! assert_eq!(preset.target_width, Some(720));
//! assert_eq!(preset.frame_rate_cap, Some(60.0));
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::ClipGifError;

/// Highest frame rate a GIF can express; frame delays are whole centiseconds.
pub const GIF_MAX_FRAMES_PER_SECOND: f64 = 100.0;

/// Which encoder writes the GIF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncoderBackend {
    /// The `gif` crate with NeuQuant palette quantisation. Honours
    /// [`Optimization`] and fuzz.
    #[default]
    Native,
    /// libavcodec's own GIF encoder through `ffmpeg-next`. Uses a fixed
    /// RGB8 palette and performs its own inter-frame cropping, so
    /// [`Optimization`] and fuzz are ignored.
    Ffmpeg,
}

impl Display for EncoderBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            EncoderBackend::Native => f.write_str("native"),
            EncoderBackend::Ffmpeg => f.write_str("ffmpeg"),
        }
    }
}

impl FromStr for EncoderBackend {
    type Err = ClipGifError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "native" | "gif" | "neuquant" => Ok(EncoderBackend::Native),
            "ffmpeg" | "libav" => Ok(EncoderBackend::Ffmpeg),
            other => Err(ClipGifError::InvalidOption(format!(
                "unknown encoder backend: {other}"
            ))),
        }
    }
}

/// Inter-frame size optimisation applied by the native backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Optimization {
    /// Every frame is written in full.
    #[default]
    None,
    /// Pixels within the fuzz distance of the previously displayed frame are
    /// written as transparent, which compresses far better.
    Transparency,
    /// [`Transparency`](Optimization::Transparency), plus each frame is
    /// cropped to the bounding box of the pixels that actually changed.
    TransparencyCrop,
}

impl Display for Optimization {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Optimization::None => f.write_str("none"),
            Optimization::Transparency => f.write_str("optimize"),
            Optimization::TransparencyCrop => f.write_str("optimizeplus"),
        }
    }
}

impl FromStr for Optimization {
    type Err = ClipGifError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Optimization::None),
            "optimize" | "transparency" => Ok(Optimization::Transparency),
            "optimizeplus" | "optimize-plus" | "crop" => Ok(Optimization::TransparencyCrop),
            other => Err(ClipGifError::InvalidOption(format!(
                "unknown optimization: {other}"
            ))),
        }
    }
}

/// The built-in presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresetName {
    /// Library defaults: source size and frame rate, FFmpeg encoder.
    #[default]
    Default,
    /// 1080 px wide, capped at 60 fps, transparency-optimised with fuzz 10.
    ///
    /// Encodes with [`EncoderBackend::Native`] rather than FFmpeg: the
    /// FFmpeg GIF encoder cannot apply the optimisation or fuzz settings
    /// this preset is defined by.
    SizedOptimized,
}

impl Display for PresetName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PresetName::Default => f.write_str("default"),
            PresetName::SizedOptimized => f.write_str("sized-optimized"),
        }
    }
}

impl FromStr for PresetName {
    type Err = ClipGifError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().replace('_', "-").as_str() {
            "default" | "defaults" => Ok(PresetName::Default),
            "sized-optimized" | "sized" | "optimized" => Ok(PresetName::SizedOptimized),
            other => Err(ClipGifError::InvalidOption(format!("unknown preset: {other}"))),
        }
    }
}

/// Parameters applied when writing a GIF for one clip.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodePreset {
    /// Target width in pixels. Height follows the source aspect ratio.
    /// `None` keeps the source width.
    pub target_width: Option<u32>,
    /// Upper bound on the output frame rate. `None` keeps the source rate
    /// (still bounded by [`GIF_MAX_FRAMES_PER_SECOND`]).
    pub frame_rate_cap: Option<f64>,
    /// Encoder that produces the file.
    pub backend: EncoderBackend,
    /// Inter-frame optimisation (native backend only).
    pub optimization: Optimization,
    /// Colour distance, in percent, under which a pixel counts as unchanged.
    pub fuzz: u8,
    /// NeuQuant speed from 1 (best quality) to 30 (fastest).
    pub quantizer_speed: i32,
    /// Fail a job before encoding when the clip reports zero duration.
    pub reject_zero_duration: bool,
}

impl Default for EncodePreset {
    fn default() -> Self {
        Self::named(PresetName::Default)
    }
}

impl EncodePreset {
    /// Build one of the named presets.
    pub fn named(name: PresetName) -> Self {
        match name {
            PresetName::Default => Self {
                target_width: None,
                frame_rate_cap: None,
                backend: EncoderBackend::Ffmpeg,
                optimization: Optimization::None,
                fuzz: 0,
                quantizer_speed: 10,
                reject_zero_duration: true,
            },
            PresetName::SizedOptimized => Self {
                target_width: Some(1080),
                frame_rate_cap: Some(60.0),
                backend: EncoderBackend::Native,
                optimization: Optimization::TransparencyCrop,
                fuzz: 10,
                quantizer_speed: 10,
                reject_zero_duration: false,
            },
        }
    }

    /// Set the target width.
    #[must_use]
    pub fn with_width(mut self, width: u32) -> Self {
        self.target_width = Some(width.max(1));
        self
    }

    /// Set the frame-rate cap. Non-positive values remove the cap.
    #[must_use]
    pub fn with_frame_rate_cap(mut self, cap: f64) -> Self {
        self.frame_rate_cap = (cap > 0.0).then_some(cap);
        self
    }

    /// Set the encoder backend.
    #[must_use]
    pub fn with_backend(mut self, backend: EncoderBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the optimisation mode.
    #[must_use]
    pub fn with_optimization(mut self, optimization: Optimization) -> Self {
        self.optimization = optimization;
        self
    }

    /// Set the colour fuzz percentage. Clamped to 100.
    #[must_use]
    pub fn with_fuzz(mut self, fuzz: u8) -> Self {
        self.fuzz = fuzz.min(100);
        self
    }

    /// Set the NeuQuant speed. Clamped to `1..=30`.
    #[must_use]
    pub fn with_quantizer_speed(mut self, speed: i32) -> Self {
        self.quantizer_speed = speed.clamp(1, 30);
        self
    }

    /// Toggle the zero-duration check.
    #[must_use]
    pub fn with_reject_zero_duration(mut self, reject: bool) -> Self {
        self.reject_zero_duration = reject;
        self
    }

    /// Output frame rate for a clip whose source runs at `source_fps`.
    ///
    /// `min(source, cap)`, bounded by what a GIF can express. Returns `None`
    /// when the source rate is unknown and no cap is set.
    pub fn output_frame_rate(&self, source_fps: f64) -> Option<f64> {
        let rate = match (source_fps > 0.0, self.frame_rate_cap) {
            (true, Some(cap)) => source_fps.min(cap),
            (true, None) => source_fps,
            (false, Some(cap)) => cap,
            (false, None) => return None,
        };
        Some(rate.min(GIF_MAX_FRAMES_PER_SECOND))
    }

    /// Write options for a clip whose source runs at `source_fps`.
    pub fn write_options(&self, source_fps: f64) -> GifWriteOptions {
        GifWriteOptions {
            frames_per_second: self.output_frame_rate(source_fps),
            backend: self.backend,
            optimization: self.optimization,
            fuzz: self.fuzz,
            quantizer_speed: self.quantizer_speed,
        }
    }
}

/// Arguments of a single write call on a [`DecodedClip`](crate::DecodedClip).
#[derive(Debug, Clone, PartialEq)]
pub struct GifWriteOptions {
    /// Output frame rate. `None` keeps one output frame per decoded frame,
    /// timed by its presentation timestamp.
    pub frames_per_second: Option<f64>,
    /// Encoder that produces the file.
    pub backend: EncoderBackend,
    /// Inter-frame optimisation (native backend only).
    pub optimization: Optimization,
    /// Colour distance, in percent, under which a pixel counts as unchanged.
    pub fuzz: u8,
    /// NeuQuant speed from 1 to 30.
    pub quantizer_speed: i32,
}

impl Default for GifWriteOptions {
    fn default() -> Self {
        EncodePreset::default().write_options(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_rate_is_min_of_source_and_cap() {
        let preset = EncodePreset::named(PresetName::SizedOptimized);
        assert_eq!(preset.output_frame_rate(30.0), Some(30.0));
        assert_eq!(preset.output_frame_rate(120.0), Some(60.0));
    }

    #[test]
    fn output_rate_never_exceeds_gif_limit() {
        let preset = EncodePreset::named(PresetName::Default);
        assert_eq!(preset.output_frame_rate(240.0), Some(100.0));
        assert_eq!(preset.output_frame_rate(0.0), None);
    }

    #[test]
    fn non_positive_cap_removes_cap() {
        let preset = EncodePreset::named(PresetName::SizedOptimized).with_frame_rate_cap(0.0);
        assert_eq!(preset.frame_rate_cap, None);
    }

    #[test]
    fn parse_names_and_aliases() {
        assert_eq!("sized_optimized".parse::<PresetName>().unwrap(), PresetName::SizedOptimized);
        assert_eq!("DEFAULT".parse::<PresetName>().unwrap(), PresetName::Default);
        assert!("fancy".parse::<PresetName>().is_err());
        assert_eq!("optimizeplus".parse::<Optimization>().unwrap(), Optimization::TransparencyCrop);
        assert_eq!("ffmpeg".parse::<EncoderBackend>().unwrap(), EncoderBackend::Ffmpeg);
    }
}
