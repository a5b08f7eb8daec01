use core::fmt;

/// Errors raised by style configuration and layout entry points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinyinTextError {
    /// A font size fell below its allowed minimum.
    InvalidMetric {
        /// Which metric was rejected (`"text_size"` or `"pinyin_text_size"`).
        metric: &'static str,
        /// Rejected value in pixels.
        value: i32,
        /// Smallest accepted value in pixels.
        min: i32,
    },
}

impl PinyinTextError {
    pub(crate) fn check_min(metric: &'static str, value: i32, min: i32) -> Result<(), Self> {
        if value < min {
            log::warn!(
                "rejecting {} of {}px (minimum {}px); keeping previous value",
                metric,
                value,
                min
            );
            return Err(Self::InvalidMetric { metric, value, min });
        }
        Ok(())
    }
}

impl fmt::Display for PinyinTextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMetric { metric, value, min } => write!(
                f,
                "invalid {}: {}px (must be at least {}px)",
                metric, value, min
            ),
        }
    }
}

impl std::error::Error for PinyinTextError {}
