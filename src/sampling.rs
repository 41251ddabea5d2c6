//! Frame-rate capping and GIF timing.
//!
//! GIF frame delays are whole centiseconds. With a target rate, decoded
//! frames are mapped onto an output timeline of fixed-length slots
//! (`1 / fps` seconds each); the first frame landing in a slot is kept and
//! later ones are dropped. Slot start times are rounded to centiseconds from
//! the timeline origin, so per-frame rounding never accumulates into drift.
//!
//! Without a target rate every decoded frame is kept and placed at its own
//! timestamp, so delays follow the gaps between presentation times.

/// Frame spacing assumed when a frame has no timestamp and no target rate
/// is set, and for the last frame of a clip whose spacing is unknown.
pub const FALLBACK_FRAMES_PER_SECOND: f64 = 10.0;

/// Tolerance for timestamps that sit a hair below a slot boundary.
const SLOT_EPSILON: f64 = 1e-6;

/// Selects which decoded frames appear in the GIF and when they start.
#[derive(Debug, Clone)]
pub(crate) struct FrameSampler {
    frames_per_second: Option<f64>,
    origin: Option<f64>,
    next_slot: u64,
    decoded: u64,
    last_slot: Option<u64>,
    last_start: Option<u64>,
    last_gap: Option<u64>,
}

impl FrameSampler {
    /// `None` (or a non-finite or non-positive rate) keeps every frame.
    pub(crate) fn new(frames_per_second: Option<f64>) -> Self {
        Self {
            frames_per_second: frames_per_second.filter(|rate| *rate > 0.0 && rate.is_finite()),
            origin: None,
            next_slot: 0,
            decoded: 0,
            last_slot: None,
            last_start: None,
            last_gap: None,
        }
    }

    /// Target rate, or `None` when every frame is kept.
    pub(crate) fn frames_per_second(&self) -> Option<f64> {
        self.frames_per_second
    }

    /// Offer a decoded frame presented at `seconds` (stream time).
    ///
    /// Frames without a timestamp are placed one frame interval after the
    /// previous decoded frame. Returns the frame's start time in centiseconds
    /// from the origin if the frame is kept.
    pub(crate) fn select(&mut self, seconds: Option<f64>) -> Option<u64> {
        let interval_rate = self
            .frames_per_second
            .unwrap_or(FALLBACK_FRAMES_PER_SECOND);
        let position = match seconds {
            Some(seconds) => {
                let origin = *self.origin.get_or_insert(seconds);
                (seconds - origin).max(0.0)
            }
            None => self.decoded as f64 / interval_rate,
        };
        self.decoded += 1;

        let start = match self.frames_per_second {
            Some(rate) => {
                let slot = (position * rate + SLOT_EPSILON).floor() as u64;
                if slot < self.next_slot {
                    return None;
                }
                self.next_slot = slot + 1;
                self.last_slot = Some(slot);
                slot_start(slot, rate)
            }
            None => {
                let start = (position * 100.0).round() as u64;
                // Keep starts strictly increasing so no frame collapses.
                match self.last_start {
                    Some(previous) => start.max(previous + 1),
                    None => start,
                }
            }
        };

        if let Some(previous) = self.last_start {
            self.last_gap = Some(start - previous);
        }
        self.last_start = Some(start);
        Some(start)
    }

    /// End of the most recently kept frame, in centiseconds from the origin.
    ///
    /// With a target rate this is the start of the slot after it; otherwise
    /// the last observed gap is repeated.
    pub(crate) fn closing_centiseconds(&self) -> u64 {
        let last_start = self.last_start.unwrap_or(0);
        match (self.frames_per_second, self.last_slot) {
            (Some(rate), Some(slot)) => slot_start(slot + 1, rate),
            _ => {
                let fallback = (100.0 / FALLBACK_FRAMES_PER_SECOND).round() as u64;
                last_start + self.last_gap.unwrap_or(fallback)
            }
        }
    }

    /// Delay of a frame shown from `start` until `next_start`, in
    /// centiseconds. At least 1, so a frame is never collapsed away.
    pub(crate) fn delay(&self, start: u64, next_start: u64) -> u16 {
        next_start
            .saturating_sub(start)
            .clamp(1, u16::MAX as u64) as u16
    }
}

/// Start of `slot` in centiseconds from the origin.
fn slot_start(slot: u64, frames_per_second: f64) -> u64 {
    (slot as f64 * 100.0 / frames_per_second).round() as u64
}
