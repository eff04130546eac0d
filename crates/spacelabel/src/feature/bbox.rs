use nalgebra::Vector2;

use super::FeatureError;
use crate::calendar::CalendarTime;
use crate::crs::Crs;
use crate::geom2::Rect2;

/// Axis-aligned window on the time-frequency plane, e.g. a plotting view.
///
/// Invariants: `time_min <= time_max`, `freq_min <= freq_max`, frequencies finite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeFrequencyBox {
    pub(super) time_min: CalendarTime,
    pub(super) freq_min: f64,
    pub(super) time_max: CalendarTime,
    pub(super) freq_max: f64,
}

impl TimeFrequencyBox {
    /// Argument order follows the `(time_start, freq_min, time_end, freq_max)` tuple.
    pub fn new(
        time_min: CalendarTime,
        freq_min: f64,
        time_max: CalendarTime,
        freq_max: f64,
    ) -> Result<Self, FeatureError> {
        if !(freq_min.is_finite() && freq_max.is_finite()) {
            return Err(FeatureError::InvalidBox(format!(
                "frequency bounds must be finite, got [{freq_min}, {freq_max}]"
            )));
        }
        if time_min > time_max {
            return Err(FeatureError::InvalidBox(format!(
                "time_min {time_min} is after time_max {time_max}"
            )));
        }
        if freq_min > freq_max {
            return Err(FeatureError::InvalidBox(format!(
                "freq_min {freq_min} exceeds freq_max {freq_max}"
            )));
        }
        Ok(Self {
            time_min,
            freq_min,
            time_max,
            freq_max,
        })
    }

    /// Box from pre-converted numeric time bounds (Unix seconds).
    pub fn from_numeric(
        crs: &Crs,
        time_min: f64,
        freq_min: f64,
        time_max: f64,
        freq_max: f64,
    ) -> Result<Self, FeatureError> {
        let t = crs.to_calendar_time(&[time_min, time_max])?;
        Self::new(t[0], freq_min, t[1], freq_max)
    }

    #[inline]
    pub fn time_min(&self) -> CalendarTime {
        self.time_min
    }
    #[inline]
    pub fn time_max(&self) -> CalendarTime {
        self.time_max
    }
    #[inline]
    pub fn freq_min(&self) -> f64 {
        self.freq_min
    }
    #[inline]
    pub fn freq_max(&self) -> f64 {
        self.freq_max
    }

    /// The box in numeric (Unix seconds, frequency) space.
    pub fn to_rect(&self) -> Rect2 {
        Rect2::new(
            Vector2::new(self.time_min.unix_seconds(), self.freq_min),
            Vector2::new(self.time_max.unix_seconds(), self.freq_max),
        )
    }
}
