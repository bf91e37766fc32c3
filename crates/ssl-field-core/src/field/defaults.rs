//! Default markings derived from the field dimensions.

use std::f64::consts::TAU;

use crate::arc::{DEFAULT_ARC_THICKNESS, FieldCircularArc};
use crate::division::FieldDimensions;
use crate::line::FieldLine;

/// The standard line set. The origin is the field center, x runs along the
/// field length. `CenterLine` is appended when `center_line` is set.
pub fn default_field_lines(dims: &FieldDimensions, center_line: bool) -> Vec<FieldLine> {
    let half_length = dims.field_length / 2.0;
    let half_width = dims.field_width / 2.0;
    let pen_x = half_length - dims.penalty_area_depth;
    let pen_y = dims.penalty_area_width / 2.0;

    let mut specs = vec![
        ("TopTouchLine", [-half_length, half_width], [half_length, half_width]),
        ("BottomTouchLine", [-half_length, -half_width], [half_length, -half_width]),
        ("LeftGoalLine", [-half_length, -half_width], [-half_length, half_width]),
        ("RightGoalLine", [half_length, -half_width], [half_length, half_width]),
        ("HalfwayLine", [0.0, -half_width], [0.0, half_width]),
        ("LeftPenaltyStretch", [-pen_x, -pen_y], [-pen_x, pen_y]),
        ("RightPenaltyStretch", [pen_x, -pen_y], [pen_x, pen_y]),
        ("LeftFieldLeftPenaltyStretch", [-half_length, -pen_y], [-pen_x, -pen_y]),
        ("LeftFieldRightPenaltyStretch", [-half_length, pen_y], [-pen_x, pen_y]),
        ("RightFieldRightPenaltyStretch", [half_length, -pen_y], [pen_x, -pen_y]),
        ("RightFieldLeftPenaltyStretch", [half_length, pen_y], [pen_x, pen_y]),
    ];
    if center_line {
        specs.push(("CenterLine", [-half_length, 0.0], [half_length, 0.0]));
    }

    specs
        .into_iter()
        .map(|(name, p1, p2)| FieldLine::with_geometry(name, p1, p2, dims.line_thickness))
        .collect()
}

/// The center circle, a full turn around the origin.
pub fn default_field_arcs(dims: &FieldDimensions) -> Vec<FieldCircularArc> {
    vec![FieldCircularArc::with_geometry(
        "CenterCircle",
        [0.0, 0.0],
        dims.center_circle_radius,
        0.0,
        TAU,
        DEFAULT_ARC_THICKNESS,
    )]
}
