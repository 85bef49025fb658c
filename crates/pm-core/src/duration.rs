//! Human-readable duration formatting.
//!
//! Formatting is cosmetic and swappable: the pipeline only needs a
//! [`DurationFormatter`] that is pure and deterministic. Two styles are
//! provided, a full week/day/hour/minute/second breakdown and a single
//! figure in days.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::options::TimeUnit;

/// Token returned for a duration of exactly zero.
pub const ZERO_DURATION: &str = "0s";

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_DAY: u64 = 86_400;
const SECS_PER_WEEK: u64 = 604_800;

/// Formats seconds for tooltips and names time units for edge labels.
pub trait DurationFormatter: Send + Sync {
    /// Formats a duration in seconds.
    ///
    /// `None` and NaN yield the empty string; zero yields [`ZERO_DURATION`].
    fn format(&self, seconds: Option<f64>) -> String;

    /// Display label appended to mean-time edge weights.
    fn unit_label(&self, unit: TimeUnit) -> &'static str;
}

/// Language of unit labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    /// Persian.
    Fa,
}

impl Locale {
    const fn label(self, unit: TimeUnit) -> &'static str {
        match (self, unit) {
            (Self::En, TimeUnit::Second) => "s",
            (Self::En, TimeUnit::Minute) => "m",
            (Self::En, TimeUnit::Hour) => "h",
            (Self::En, TimeUnit::Day) => "d",
            (Self::En, TimeUnit::Week) => "w",
            (Self::Fa, TimeUnit::Second) => "ثانیه",
            (Self::Fa, TimeUnit::Minute) => "دقیقه",
            (Self::Fa, TimeUnit::Hour) => "ساعت",
            (Self::Fa, TimeUnit::Day) => "روز",
            (Self::Fa, TimeUnit::Week) => "هفته",
        }
    }

    /// Joins a number and its unit label.
    fn quantity(self, value: impl fmt::Display, unit: TimeUnit) -> String {
        match self {
            Self::En => format!("{value}{}", self.label(unit)),
            Self::Fa => format!("{value} {}", self.label(unit)),
        }
    }

    const fn separator(self) -> &'static str {
        match self {
            Self::En => " ",
            Self::Fa => "، ",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "fa" => Ok(Self::Fa),
            _ => Err(format!("unknown locale: {s} (expected en or fa)")),
        }
    }
}

/// Whole seconds of a finite, non-negative duration.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_seconds(seconds: f64) -> u64 {
    seconds.max(0.0).trunc() as u64
}

/// Full breakdown into weeks, days, hours, minutes and seconds.
///
/// Fractional seconds are truncated. Hours, minutes and seconds are
/// zero-padded; zero-valued components are omitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreakdownFormatter {
    pub locale: Locale,
}

impl BreakdownFormatter {
    pub const fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl DurationFormatter for BreakdownFormatter {
    fn format(&self, seconds: Option<f64>) -> String {
        let Some(seconds) = seconds.filter(|s| !s.is_nan()) else {
            return String::new();
        };
        let mut remaining = whole_seconds(seconds);
        if remaining == 0 {
            return ZERO_DURATION.to_string();
        }

        let mut parts = Vec::new();
        let weeks = remaining / SECS_PER_WEEK;
        if weeks > 0 {
            parts.push(self.locale.quantity(weeks, TimeUnit::Week));
            remaining %= SECS_PER_WEEK;
        }
        let days = remaining / SECS_PER_DAY;
        if days > 0 {
            parts.push(self.locale.quantity(days, TimeUnit::Day));
            remaining %= SECS_PER_DAY;
        }
        let hours = remaining / SECS_PER_HOUR;
        if hours > 0 {
            parts.push(self.locale.quantity(format!("{hours:02}"), TimeUnit::Hour));
            remaining %= SECS_PER_HOUR;
        }
        let minutes = remaining / SECS_PER_MINUTE;
        if minutes > 0 {
            parts.push(self.locale.quantity(format!("{minutes:02}"), TimeUnit::Minute));
            remaining %= SECS_PER_MINUTE;
        }
        if remaining > 0 || parts.is_empty() {
            parts.push(self.locale.quantity(format!("{remaining:02}"), TimeUnit::Second));
        }

        parts.join(self.locale.separator())
    }

    fn unit_label(&self, unit: TimeUnit) -> &'static str {
        self.locale.label(unit)
    }
}

/// A single figure in days with two decimals.
#[derive(Debug, Clone, Copy, Default)]
pub struct DaysFormatter {
    pub locale: Locale,
}

impl DaysFormatter {
    pub const fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl DurationFormatter for DaysFormatter {
    fn format(&self, seconds: Option<f64>) -> String {
        let Some(seconds) = seconds.filter(|s| !s.is_nan()) else {
            return String::new();
        };
        if seconds <= 0.0 {
            return ZERO_DURATION.to_string();
        }
        let days = seconds / TimeUnit::Day.seconds();
        let label = self.locale.label(TimeUnit::Day);
        format!("{days:.2} {label}")
    }

    fn unit_label(&self, unit: TimeUnit) -> &'static str {
        self.locale.label(unit)
    }
}

/// Selects one of the built-in formatter styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationStyle {
    #[default]
    Breakdown,
    Days,
}

impl DurationStyle {
    /// Builds the formatter for this style.
    pub fn formatter(self, locale: Locale) -> Box<dyn DurationFormatter> {
        match self {
            Self::Breakdown => Box::new(BreakdownFormatter::new(locale)),
            Self::Days => Box::new(DaysFormatter::new(locale)),
        }
    }
}

impl FromStr for DurationStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakdown" => Ok(Self::Breakdown),
            "days" => Ok(Self::Days),
            _ => Err(format!("unknown duration style: {s} (expected breakdown or days)")),
        }
    }
}
