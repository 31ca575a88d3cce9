//! G-code emitter (C11): RS-274 subset (G20/G21, G90, M03/M05, G00/G01),
//! multi-pass Z-depth programs, and deterministic, byte-identical output.

use millwright_core::geom::Path2D;
use millwright_core::units::MeasurementSystem;
use millwright_core::{CNConfig, GCodeOptions, Tool};

/// A named toolpath with the Z depths it should be cut at.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolpathJob {
    pub path: Path2D,
    pub safe_height: f64,
    pub cut_depth: f64,
    pub feed_rate: f64,
    pub plunge_rate: f64,
}

/// Estimated machine time and travel distance for a program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeEstimate {
    pub cut_distance_mm: f64,
    pub rapid_distance_mm: f64,
    pub estimated_seconds: f64,
}

/// Format a coordinate to 4 decimal places, the fixed precision every
/// emitted G-code line uses so output is byte-identical across runs.
fn fmt_coord(v: f64) -> String {
    format!("{v:.4}")
}

fn emit_header(out: &mut String, config: &CNConfig, options: &GCodeOptions) {
    if !options.include_header {
        return;
    }
    if options.include_comments {
        out.push_str("; Generated toolpath program\n");
        if !options.comments.is_empty() {
            out.push_str(&format!("; {}\n", options.comments));
        }
    }
    match config.units {
        MeasurementSystem::Metric => out.push_str("G21 ; millimeters\n"),
        MeasurementSystem::Imperial => out.push_str("G20 ; inches\n"),
    }
    out.push_str("G90 ; absolute positioning\n");
    out.push_str(&format!("M03 S{} ; spindle on\n", config.spindle_speed as i64));
}

fn emit_footer(out: &mut String, options: &GCodeOptions) {
    out.push_str("M05 ; spindle off\n");
    if options.return_to_origin {
        out.push_str(&format!("G00 X{} Y{}\n", fmt_coord(0.0), fmt_coord(0.0)));
    }
}

/// Multi-pass Z program for one job: retract to `safe_height`, rapid to
/// the path start, then step down through each pass depth cutting the
/// full path at every depth.
fn emit_job(out: &mut String, job: &ToolpathJob, config: &CNConfig, options: &GCodeOptions) {
    let points = job.path.points();
    let Some(first) = points.first() else {
        return;
    };

    out.push_str(&format!("G00 Z{}\n", fmt_coord(job.safe_height)));
    out.push_str(&format!(
        "G00 X{} Y{}\n",
        fmt_coord(first.x),
        fmt_coord(first.y)
    ));

    let pass_count = config.pass_count.max(1);
    for pass in 1..=pass_count {
        let depth = -(job.cut_depth * pass as f64 / pass_count as f64);
        out.push_str(&format!(
            "G01 Z{} F{}\n",
            fmt_coord(depth),
            fmt_coord(job.plunge_rate)
        ));
        for p in &points[1..] {
            out.push_str(&format!(
                "G01 X{} Y{} F{}\n",
                fmt_coord(p.x),
                fmt_coord(p.y),
                fmt_coord(job.feed_rate)
            ));
        }
        if options.separate_retract && pass < pass_count {
            out.push_str(&format!("G00 Z{}\n", fmt_coord(job.safe_height)));
            out.push_str(&format!(
                "G00 X{} Y{}\n",
                fmt_coord(first.x),
                fmt_coord(first.y)
            ));
        }
    }
    out.push_str(&format!("G00 Z{}\n", fmt_coord(job.safe_height)));
}

/// Emit a full program for a sequence of jobs, in order.
pub fn emit_program(jobs: &[ToolpathJob], config: &CNConfig, options: &GCodeOptions, _tool: Option<&Tool>) -> String {
    let mut out = String::new();
    emit_header(&mut out, config, options);
    for job in jobs {
        emit_job(&mut out, job, config, options);
    }
    emit_footer(&mut out, options);
    out
}

/// Estimate total cut distance, rapid-travel distance, and machine time
/// for a set of jobs at their configured feed/plunge rates.
pub fn estimate_time(jobs: &[ToolpathJob]) -> TimeEstimate {
    let mut cut_distance = 0.0;
    let mut rapid_distance = 0.0;
    let mut seconds = 0.0;

    for job in jobs {
        let points = job.path.points();
        if points.is_empty() {
            continue;
        }
        rapid_distance += job.safe_height;
        seconds += job.safe_height / (job.plunge_rate.max(1.0) / 60.0);

        let path_length = job.path.length();
        cut_distance += path_length;
        let feed_mm_per_s = (job.feed_rate.max(1.0)) / 60.0;
        seconds += path_length / feed_mm_per_s;
    }

    TimeEstimate {
        cut_distance_mm: cut_distance,
        rapid_distance_mm: rapid_distance,
        estimated_seconds: seconds,
    }
}
