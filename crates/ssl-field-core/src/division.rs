//! Field dimensions and the per-division presets.
//!
//! All lengths are in millimetres.

use serde::{Deserialize, Serialize};

/// The scalar field parameters a division preset overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDimensions {
    pub field_length: f64,
    pub field_width: f64,
    pub goal_width: f64,
    pub goal_depth: f64,
    pub goal_height: f64,
    pub boundary_width: f64,
    pub line_thickness: f64,
    pub penalty_area_depth: f64,
    pub penalty_area_width: f64,
    pub goal_center_to_penalty_mark: f64,
    pub center_circle_radius: f64,
    pub ball_radius: f64,
    pub max_robot_radius: f64,
    pub num_cameras_total: i64,
    pub num_cameras_local: i64,
}

/// Startup values, matching the default test images rather than a division.
impl Default for FieldDimensions {
    fn default() -> Self {
        Self {
            field_length: 12040.0,
            field_width: 9020.0,
            goal_width: 1200.0,
            goal_depth: 180.0,
            goal_height: 155.0,
            boundary_width: 300.0,
            line_thickness: 10.0,
            penalty_area_depth: 1220.0,
            penalty_area_width: 2410.0,
            goal_center_to_penalty_mark: 8000.0,
            center_circle_radius: 500.0,
            ball_radius: 21.5,
            max_robot_radius: 90.0,
            num_cameras_total: 2,
            num_cameras_local: 2,
        }
    }
}

const DIVISION_A: FieldDimensions = FieldDimensions {
    field_length: 12000.0,
    field_width: 9000.0,
    goal_width: 1200.0,
    goal_depth: 180.0,
    goal_height: 155.0,
    boundary_width: 300.0,
    line_thickness: 10.0,
    penalty_area_depth: 1200.0,
    penalty_area_width: 2400.0,
    goal_center_to_penalty_mark: 8000.0,
    center_circle_radius: 500.0,
    ball_radius: 21.5,
    max_robot_radius: 90.0,
    num_cameras_total: 8,
    num_cameras_local: 8,
};

const DIVISION_B: FieldDimensions = FieldDimensions {
    field_length: 9000.0,
    field_width: 6000.0,
    goal_width: 1000.0,
    goal_depth: 180.0,
    goal_height: 155.0,
    boundary_width: 300.0,
    line_thickness: 10.0,
    penalty_area_depth: 1000.0,
    penalty_area_width: 2000.0,
    goal_center_to_penalty_mark: 6000.0,
    center_circle_radius: 500.0,
    ball_radius: 21.5,
    max_robot_radius: 90.0,
    num_cameras_total: 4,
    num_cameras_local: 4,
};

// Entry level field.
const DIVISION_C: FieldDimensions = FieldDimensions {
    field_length: 4500.0,
    field_width: 3000.0,
    goal_width: 800.0,
    goal_depth: 180.0,
    goal_height: 155.0,
    boundary_width: 250.0,
    line_thickness: 10.0,
    penalty_area_depth: 500.0,
    penalty_area_width: 1350.0,
    goal_center_to_penalty_mark: 3000.0,
    center_circle_radius: 500.0,
    ball_radius: 21.5,
    max_robot_radius: 90.0,
    num_cameras_total: 1,
    num_cameras_local: 1,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Division {
    A,
    B,
    C,
}

impl Division {
    pub const ALL: [Division; 3] = [Division::A, Division::B, Division::C];

    pub const fn dimensions(self) -> FieldDimensions {
        match self {
            Self::A => DIVISION_A,
            Self::B => DIVISION_B,
            Self::C => DIVISION_C,
        }
    }

    /// Name of the trigger leaf applying this preset.
    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "Division A",
            Self::B => "Division B",
            Self::C => "Division C",
        }
    }
}
