//! Fit transform (C4): scales and centers discretized artwork onto the
//! material, applying the Y-flip from screen space to machine space
//! last so it composes correctly with scaling and centering.

use millwright_core::geom::{BoundingBox2D, Path2D, Point2D};

/// Record of the scale/translate/flip decisions made by [`fit_to_bed`], so
/// callers can report what happened (and whether material or bed limits
/// were exceeded).
#[derive(Debug, Clone, PartialEq)]
pub struct TransformInfo {
    pub original_bounds: Option<BoundingBox2D>,
    pub new_bounds: Option<BoundingBox2D>,
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub flip_y: bool,
    /// `false` when the design already fit the material and step 2's
    /// no-scale branch fired; `true` otherwise, even if the computed scale
    /// happened to be 1.0.
    pub was_scaled: bool,
    /// `true` when the fitted design's bounds exceed the machine bed — a
    /// dimension distinct from the material size used for scaling.
    pub was_cropped: bool,
    pub success: bool,
    pub message: String,
}

impl TransformInfo {
    fn identity() -> Self {
        Self {
            original_bounds: None,
            new_bounds: None,
            scale_x: 1.0,
            scale_y: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            flip_y: true,
            was_scaled: false,
            was_cropped: false,
            success: true,
            message: "no paths to fit".to_string(),
        }
    }
}

/// Whether non-uniform scaling is permitted when fitting to the material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMode {
    PreserveAspect,
    Independent,
}

/// Scale and translate `paths` to fit within a `material_width` x
/// `material_height` stock, flipping Y last (source artwork is in screen
/// space, Y down; machine space is Y up). `bed_width`/`bed_height` are the
/// machine's physical travel limits, checked separately from the material
/// size used for scaling — a design can be scaled to fit its material and
/// still overhang the bed.
pub fn fit_to_bed(
    paths: &[Path2D],
    material_width: f64,
    material_height: f64,
    bed_width: f64,
    bed_height: f64,
    mode: FitMode,
) -> (Vec<Path2D>, TransformInfo) {
    let Some(bounds) = combined_bounds(paths) else {
        return (Vec::new(), TransformInfo::identity());
    };

    let width = bounds.width().max(1e-9);
    let height = bounds.height().max(1e-9);

    // Spec step 2: a design that already fits the material is translated
    // to the origin, never scaled.
    let fits_already = width <= material_width + 1e-9 && height <= material_height + 1e-9;
    let (scale_x, scale_y) = if fits_already {
        (1.0, 1.0)
    } else {
        match mode {
            FitMode::Independent => (material_width / width, material_height / height),
            FitMode::PreserveAspect => {
                let s = (material_width / width).min(material_height / height);
                (s, s)
            }
        }
    };

    let scaled_width = width * scale_x;
    let scaled_height = height * scale_y;
    let translate_x = (material_width - scaled_width) / 2.0;
    let translate_y = (material_height - scaled_height) / 2.0;

    let was_cropped = scaled_width > bed_width + 1e-6 || scaled_height > bed_height + 1e-6;

    let mut info = TransformInfo {
        original_bounds: Some(bounds),
        new_bounds: None,
        scale_x,
        scale_y,
        translate_x,
        translate_y,
        flip_y: true,
        was_scaled: !fits_already,
        was_cropped,
        success: !was_cropped,
        message: if was_cropped {
            "fitted design exceeds bed limits".to_string()
        } else if fits_already {
            "design already fit the material; translated to origin".to_string()
        } else {
            "design scaled to fit the material".to_string()
        },
    };

    let transformed: Vec<Path2D> = paths
        .iter()
        .map(|path| {
            let points: Vec<Point2D> = path
                .points()
                .iter()
                .map(|p| apply_transform(*p, &bounds, &info, material_height))
                .collect();
            Path2D::from_points(points)
        })
        .collect();

    info.new_bounds = combined_bounds(&transformed);

    (transformed, info)
}

fn apply_transform(p: Point2D, bounds: &BoundingBox2D, info: &TransformInfo, material_height: f64) -> Point2D {
    let local_x = (p.x - bounds.min.x) * info.scale_x + info.translate_x;
    let local_y = (p.y - bounds.min.y) * info.scale_y + info.translate_y;
    if info.flip_y {
        Point2D::new(local_x, material_height - local_y)
    } else {
        Point2D::new(local_x, local_y)
    }
}

fn combined_bounds(paths: &[Path2D]) -> Option<BoundingBox2D> {
    let mut bounds: Option<BoundingBox2D> = None;
    for path in paths {
        if let Some(b) = path.bounds() {
            bounds = Some(match bounds {
                Some(mut acc) => {
                    acc.update(b.min);
                    acc.update(b.max);
                    acc
                }
                None => b,
            });
        }
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Path2D {
        Path2D::from_points(vec![
            Point2D::new(x0, y0),
            Point2D::new(x1, y0),
            Point2D::new(x1, y1),
            Point2D::new(x0, y1),
        ])
    }

    #[test]
    fn preserve_aspect_keeps_uniform_scale() {
        let paths = vec![square(0.0, 0.0, 10.0, 5.0)];
        let (_, info) = fit_to_bed(&paths, 100.0, 100.0, 300.0, 300.0, FitMode::PreserveAspect);
        assert_eq!(info.scale_x, info.scale_y);
        assert!(!info.was_cropped);
        assert!(info.was_scaled);
    }

    #[test]
    fn independent_mode_stretches_each_axis() {
        let paths = vec![square(0.0, 0.0, 10.0, 5.0)];
        let (_, info) = fit_to_bed(&paths, 100.0, 100.0, 300.0, 300.0, FitMode::Independent);
        assert_ne!(info.scale_x, info.scale_y);
    }

    #[test]
    fn result_fits_within_material_bounds() {
        let paths = vec![square(0.0, 0.0, 10.0, 20.0)];
        let (transformed, _) = fit_to_bed(&paths, 50.0, 50.0, 300.0, 300.0, FitMode::PreserveAspect);
        let bounds = transformed[0].bounds().unwrap();
        assert!(bounds.min.x >= -1e-6 && bounds.max.x <= 50.0 + 1e-6);
        assert!(bounds.min.y >= -1e-6 && bounds.max.y <= 50.0 + 1e-6);
    }

    #[test]
    fn empty_input_yields_identity_info() {
        let (transformed, info) = fit_to_bed(&[], 100.0, 100.0, 300.0, 300.0, FitMode::PreserveAspect);
        assert!(transformed.is_empty());
        assert_eq!(info.scale_x, 1.0);
        assert!(!info.was_scaled);
    }

    /// A design that already fits the material is translated, not scaled,
    /// per spec step 2 — even though the bed itself is large enough that
    /// the old unconditional-scale code would have produced the same
    /// visual result, `was_scaled` must still say "no scaling happened".
    #[test]
    fn design_that_already_fits_is_not_scaled() {
        let paths = vec![square(0.0, 0.0, 10.0, 10.0)];
        let (_, info) = fit_to_bed(&paths, 100.0, 100.0, 300.0, 300.0, FitMode::PreserveAspect);
        assert_eq!(info.scale_x, 1.0);
        assert_eq!(info.scale_y, 1.0);
        assert!(!info.was_scaled);
    }

    /// Material is big enough to hold the scaled design but the bed is
    /// smaller than the material — `was_cropped` must be judged against
    /// the bed, not the material dimensions used for scaling.
    #[test]
    fn was_cropped_is_judged_against_bed_not_material() {
        let paths = vec![square(0.0, 0.0, 200.0, 200.0)];
        let (_, info) = fit_to_bed(&paths, 200.0, 200.0, 150.0, 150.0, FitMode::PreserveAspect);
        assert!(!info.was_scaled);
        assert!(info.was_cropped);
    }
}
