//! Unit conversion utilities.
//!
//! Handles conversion between metric (mm) and imperial (inch) systems.
//! All internal geometry is stored in millimeters; this module converts at
//! the boundary — config parsing and G-code header emission.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Measurement system selected by `CNConfig::units`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm).
    Metric,
    /// Imperial system (inches).
    Imperial,
}

impl Default for MeasurementSystem {
    fn default() -> Self {
        Self::Metric
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "mm"),
            Self::Imperial => write!(f, "in"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("unknown measurement system: {s}")),
        }
    }
}

/// Convert a length in millimeters to the given system's native unit.
pub fn mm_to_native(value_mm: f64, system: MeasurementSystem) -> f64 {
    match system {
        MeasurementSystem::Metric => value_mm,
        MeasurementSystem::Imperial => value_mm / 25.4,
    }
}

/// Convert a length from the given system's native unit to millimeters.
pub fn native_to_mm(value: f64, system: MeasurementSystem) -> f64 {
    match system {
        MeasurementSystem::Metric => value,
        MeasurementSystem::Imperial => value * 25.4,
    }
}

/// Parse a length string (decimal or fractional inches, e.g. `"1 1/2"`) in
/// the given measurement system, returning millimeters.
pub fn parse_length(input: &str, system: MeasurementSystem) -> Result<f64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(0.0);
    }

    match system {
        MeasurementSystem::Metric => input.parse::<f64>().map_err(|e| e.to_string()),
        MeasurementSystem::Imperial => {
            if input.contains('/') {
                let mut total_inches = 0.0;
                for part in input.split_whitespace() {
                    if let Some((num, den)) = part.split_once('/') {
                        let num: f64 = num.parse().map_err(|_| "invalid numerator".to_string())?;
                        let den: f64 = den.parse().map_err(|_| "invalid denominator".to_string())?;
                        if den == 0.0 {
                            return Err("division by zero".to_string());
                        }
                        total_inches += num / den;
                    } else {
                        total_inches += part.parse::<f64>().map_err(|e| e.to_string())?;
                    }
                }
                Ok(total_inches * 25.4)
            } else {
                input.parse::<f64>().map(|v| v * 25.4).map_err(|e| e.to_string())
            }
        }
    }
}

/// Unit label for G-code header comments ("mm" or "in").
pub fn unit_label(system: MeasurementSystem) -> &'static str {
    match system {
        MeasurementSystem::Metric => "mm",
        MeasurementSystem::Imperial => "in",
    }
}

/// Display/input units for feed and plunge rates. `CNConfig::feed_rate`
/// and `plunge_rate` are always stored canonically in mm/min; this enum
/// only governs how a rate is formatted for display or parsed from user
/// input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedRateUnits {
    MmPerMin,
    MmPerSec,
    InPerMin,
    InPerSec,
}

impl Default for FeedRateUnits {
    fn default() -> Self {
        Self::MmPerMin
    }
}

impl fmt::Display for FeedRateUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MmPerMin => write!(f, "mm/min"),
            Self::MmPerSec => write!(f, "mm/sec"),
            Self::InPerMin => write!(f, "in/min"),
            Self::InPerSec => write!(f, "in/sec"),
        }
    }
}

impl FromStr for FeedRateUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(' ', "").as_str() {
            "mm/min" | "mmpermin" | "mm_per_min" => Ok(Self::MmPerMin),
            "mm/sec" | "mmpersec" | "mm_per_sec" | "mm/s" => Ok(Self::MmPerSec),
            "in/min" | "inpermin" | "in_per_min" => Ok(Self::InPerMin),
            "in/sec" | "inpersec" | "in_per_sec" | "in/s" => Ok(Self::InPerSec),
            _ => Err(format!("unknown feed rate units: {s}")),
        }
    }
}

fn feed_rate_to_mm_per_min(value: f64, units: FeedRateUnits) -> f64 {
    match units {
        FeedRateUnits::MmPerMin => value,
        FeedRateUnits::MmPerSec => value * 60.0,
        FeedRateUnits::InPerMin => value * 25.4,
        FeedRateUnits::InPerSec => value * 25.4 * 60.0,
    }
}

fn mm_per_min_to_feed_rate(value_mm_per_min: f64, units: FeedRateUnits) -> f64 {
    match units {
        FeedRateUnits::MmPerMin => value_mm_per_min,
        FeedRateUnits::MmPerSec => value_mm_per_min / 60.0,
        FeedRateUnits::InPerMin => value_mm_per_min / 25.4,
        FeedRateUnits::InPerSec => value_mm_per_min / 25.4 / 60.0,
    }
}

/// Parse a feed rate given in `units`, returning the canonical mm/min
/// value `CNConfig` stores.
pub fn parse_feed_rate(input: &str, units: FeedRateUnits) -> Result<f64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(0.0);
    }
    let native: f64 = input.parse().map_err(|e: std::num::ParseFloatError| e.to_string())?;
    Ok(feed_rate_to_mm_per_min(native, units))
}

/// Format a canonical mm/min feed rate for display in `units`, e.g.
/// `"800.00 mm/min"`.
pub fn format_feed_rate(value_mm_per_min: f64, units: FeedRateUnits) -> String {
    let native = mm_per_min_to_feed_rate(value_mm_per_min, units);
    format!("{native:.2} {units}")
}
