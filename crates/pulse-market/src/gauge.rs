//! Sentiment gauge
//!
//! Maps a 0..=100 score to a colour band, a qualitative label, and a
//! half-filled text meter.

use comfy_table::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scores below this are bearish
pub const BEARISH_BELOW: u8 = 40;
/// Scores at or above this are bullish
pub const BULLISH_FROM: u8 = 60;

/// Default meter width in cells
pub const DEFAULT_METER_WIDTH: usize = 20;

const FILLED: char = '█';
const EMPTY: char = '░';

/// Qualitative sentiment band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    Bearish,
    Neutral,
    Bullish,
}

impl Band {
    pub fn from_score(score: u8) -> Self {
        if score < BEARISH_BELOW {
            Band::Bearish
        } else if score < BULLISH_FROM {
            Band::Neutral
        } else {
            Band::Bullish
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Band::Bearish => "Bearish",
            Band::Neutral => "Neutral",
            Band::Bullish => "Bullish",
        }
    }

    /// Terminal colour for the band (red / yellow / green)
    pub fn color(&self) -> Color {
        match self {
            Band::Bearish => Color::Red,
            Band::Neutral => Color::Yellow,
            Band::Bullish => Color::Green,
        }
    }

    /// Indicator shown whether or not the terminal supports colour
    pub fn indicator(&self) -> &'static str {
        match self {
            Band::Bearish => "🔴",
            Band::Neutral => "🟡",
            Band::Bullish => "🟢",
        }
    }

    /// Trend icon for the confidence badge; neutral has none
    pub fn trend_icon(&self) -> Option<&'static str> {
        match self {
            Band::Bearish => Some("📉"),
            Band::Neutral => None,
            Band::Bullish => Some("📈"),
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One sector's gauge
#[derive(Debug, Clone, PartialEq)]
pub struct Gauge {
    label: String,
    score: u8,
}

impl Gauge {
    /// Scores above 100 are clamped
    pub fn new(label: impl Into<String>, score: u8) -> Self {
        Self {
            label: label.into(),
            score: score.min(100),
        }
    }

    pub fn band(&self) -> Band {
        Band::from_score(self.score)
    }

    /// Filled proportion of the gauge, `score / 100`
    pub fn fill_ratio(&self) -> f64 {
        f64::from(self.score) / 100.0
    }

    /// Text meter of `width` cells, filled proportionally to the score
    pub fn meter(&self, width: usize) -> String {
        let filled = (self.fill_ratio() * width as f64).round() as usize;
        let filled = filled.min(width);
        let mut meter = String::with_capacity(width * 3);
        meter.extend(std::iter::repeat_n(FILLED, filled));
        meter.extend(std::iter::repeat_n(EMPTY, width - filled));
        meter
    }

    /// Multi-line rendering: label, meter, readout
    pub fn render(&self, width: usize) -> String {
        let band = self.band();
        format!(
            "{}\n{}\n{} {} {}",
            self.label.to_uppercase(),
            self.meter(width),
            band.indicator(),
            self.score,
            band.label().to_uppercase()
        )
    }
}
