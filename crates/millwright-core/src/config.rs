//! Machine/material/cutting configuration, G-code emission options, the
//! validation report, and the 3D toolpath point record.

use crate::error::{InputError, Result};
use crate::geom::Point3D;
use crate::units::MeasurementSystem;
use serde::{Deserialize, Serialize};

/// Machine bed, material stock, and default cut parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CNConfig {
    pub bed_width: f64,
    pub bed_height: f64,
    pub units: MeasurementSystem,
    pub material_width: f64,
    pub material_height: f64,
    pub material_thickness: f64,
    pub feed_rate: f64,
    pub plunge_rate: f64,
    pub spindle_speed: f64,
    pub cut_depth_per_pass: f64,
    pub pass_count: u32,
    pub safe_height: f64,
}

impl Default for CNConfig {
    fn default() -> Self {
        Self {
            bed_width: 300.0,
            bed_height: 300.0,
            units: MeasurementSystem::Metric,
            material_width: 200.0,
            material_height: 200.0,
            material_thickness: 12.0,
            feed_rate: 800.0,
            plunge_rate: 200.0,
            spindle_speed: 12000.0,
            cut_depth_per_pass: 2.0,
            pass_count: 3,
            safe_height: 5.0,
        }
    }
}

impl CNConfig {
    /// Parse the INI-like `[machine]`/`[material]`/`[cutting]` text format
    /// from spec §6. `#` and `;` start comments; keys are snake_case.
    pub fn from_ini_str(text: &str) -> Result<Self> {
        let mut cfg = CNConfig::default();
        let mut section = String::new();
        for raw_line in text.lines() {
            let line = strip_comment(raw_line).trim();
            if line.is_empty() {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                section = name.trim().to_lowercase();
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            apply_ini_field(&mut cfg, &section, key, value)?;
        }
        Ok(cfg)
    }

    /// Format as the INI-like text format from spec §6.
    pub fn to_ini_string(&self) -> String {
        format!(
            "[machine]\nbed_width={}\nbed_height={}\nunits={}\n\n[material]\nwidth={}\nheight={}\nthickness={}\n\n[cutting]\nfeed_rate={}\nplunge_rate={}\nspindle_speed={}\ncut_depth={}\npass_count={}\nsafe_height={}\n",
            self.bed_width,
            self.bed_height,
            self.units,
            self.material_width,
            self.material_height,
            self.material_thickness,
            self.feed_rate,
            self.plunge_rate,
            self.spindle_speed,
            self.cut_depth_per_pass,
            self.pass_count,
            self.safe_height,
        )
    }
}

fn strip_comment(line: &str) -> &str {
    let cut_at = line
        .find('#')
        .into_iter()
        .chain(line.find(';'))
        .min();
    match cut_at {
        Some(i) => &line[..i],
        None => line,
    }
}

fn apply_ini_field(cfg: &mut CNConfig, section: &str, key: &str, value: &str) -> Result<()> {
    let parse = |v: &str| -> Result<f64> {
        v.parse::<f64>().map_err(|e| {
            InputError::InvalidValue {
                field: key.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    };
    match (section, key) {
        ("machine", "bed_width") => cfg.bed_width = parse(value)?,
        ("machine", "bed_height") => cfg.bed_height = parse(value)?,
        ("machine", "units") => {
            cfg.units = value
                .parse()
                .map_err(|reason| InputError::InvalidValue {
                    field: "units".to_string(),
                    reason,
                })?
        }
        ("material", "width") => cfg.material_width = parse(value)?,
        ("material", "height") => cfg.material_height = parse(value)?,
        ("material", "thickness") => cfg.material_thickness = parse(value)?,
        ("cutting", "feed_rate") => cfg.feed_rate = parse(value)?,
        ("cutting", "plunge_rate") => cfg.plunge_rate = parse(value)?,
        ("cutting", "spindle_speed") => cfg.spindle_speed = parse(value)?,
        ("cutting", "cut_depth") => cfg.cut_depth_per_pass = parse(value)?,
        ("cutting", "pass_count") => {
            cfg.pass_count = value
                .parse::<u32>()
                .map_err(|e| InputError::InvalidValue {
                    field: "pass_count".to_string(),
                    reason: e.to_string(),
                })?
        }
        ("cutting", "safe_height") => cfg.safe_height = parse(value)?,
        _ => {}
    }
    Ok(())
}

/// CAM strategy mode for area-clearing operations (C8 mode mapping).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CutoutMode {
    Perimeter,
    Punchout,
    Pocket,
    Engrave,
}

/// Area-clearing strategy parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutoutParams {
    pub mode: CutoutMode,
    /// Stepover as a fraction of tool diameter.
    pub stepover: f64,
    pub overlap: f64,
    pub spiral_in: bool,
    pub max_stepover: f64,
}

impl Default for CutoutParams {
    fn default() -> Self {
        Self {
            mode: CutoutMode::Perimeter,
            stepover: 0.5,
            overlap: 0.1,
            spiral_in: true,
            max_stepover: 2.0,
        }
    }
}

/// Direction of tool-radius offsetting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OffsetDirection {
    Inside,
    Outside,
    OnPath,
    Auto,
}

/// Emission flags for the G-code generator (C11).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GCodeOptions {
    pub include_header: bool,
    pub include_comments: bool,
    pub return_to_origin: bool,
    pub optimize_paths: bool,
    pub close_loops: bool,
    pub separate_retract: bool,
    pub linearize_paths: bool,
    pub linearize_tolerance: f64,
    pub selected_tool_id: Option<u32>,
    pub offset_direction: OffsetDirection,
    pub enable_tool_offsets: bool,
    pub validate_feature_sizes: bool,
    pub material_type: String,
    pub comments: String,
    pub cutout: CutoutParams,
}

impl Default for GCodeOptions {
    fn default() -> Self {
        Self {
            include_header: true,
            include_comments: true,
            return_to_origin: true,
            optimize_paths: false,
            close_loops: false,
            separate_retract: true,
            linearize_paths: true,
            linearize_tolerance: 0.01,
            selected_tool_id: None,
            offset_direction: OffsetDirection::Auto,
            enable_tool_offsets: false,
            validate_feature_sizes: true,
            material_type: String::new(),
            comments: String::new(),
            cutout: CutoutParams::default(),
        }
    }
}

/// A single point of a 3D (advisory) toolpath.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolpathPoint {
    pub position: Point3D,
    pub feedrate: f64,
    pub is_rapid: bool,
}

/// Aggregated warnings/errors from across the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub ok: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.ok = false;
        self.errors.push(message.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.ok &= other.ok;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Group warnings by a caller-supplied "kind" key when the count
    /// exceeds 3, per spec §7: "group by kind, show top kinds, append
    /// 'N more' counter". `kind_of` extracts the grouping key (e.g. the
    /// first word) from each warning message.
    pub fn summarize_warnings(&self, kind_of: impl Fn(&str) -> String) -> Vec<String> {
        if self.warnings.len() <= 3 {
            return self.warnings.clone();
        }
        let mut counts: std::collections::BTreeMap<String, u32> = std::collections::BTreeMap::new();
        for w in &self.warnings {
            *counts.entry(kind_of(w)).or_insert(0) += 1;
        }
        let mut lines: Vec<String> = counts
            .iter()
            .map(|(kind, count)| format!("{kind} ({count})"))
            .collect();
        let shown: usize = counts.values().sum::<u32>() as usize;
        if shown < self.warnings.len() {
            lines.push(format!("{} more", self.warnings.len() - shown));
        }
        lines
    }
}
