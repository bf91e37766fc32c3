//! Protobuf rendering of the field geometry.

use prost::Message;
use ssl_field_proto::{
    SslFieldCircularArc, SslFieldLineSegment, SslGeometryFieldSize, SslGeometryModels, Vector2f,
};

use super::RoboCupField;
use crate::arc::FieldCircularArc;
use crate::line::FieldLine;
use crate::record::parse_shape_type;

impl RoboCupField {
    /// Clears `buffer` and writes the current geometry into it.
    ///
    /// Integer fields are truncated from the stored doubles; the wire format
    /// counts whole millimetres.
    #[allow(clippy::cast_possible_truncation)]
    pub fn fill_geometry(&self, buffer: &mut SslGeometryFieldSize) {
        let markings = self.markings.read();
        let p = &self.params;

        buffer.clear();
        buffer.field_length = p.field_length.get() as i32;
        buffer.field_width = p.field_width.get() as i32;
        buffer.goal_width = p.goal_width.get() as i32;
        buffer.goal_depth = p.goal_depth.get() as i32;
        buffer.boundary_width = p.boundary_width.get() as i32;
        buffer.penalty_area_depth = Some(p.penalty_area_depth.get() as i32);
        buffer.penalty_area_width = Some(p.penalty_area_width.get() as i32);
        buffer.center_circle_radius = Some(p.center_circle_radius.get() as i32);
        buffer.line_thickness = Some(p.line_thickness.get() as i32);
        buffer.goal_center_to_penalty_mark = Some(p.goal_center_to_penalty_mark.get() as i32);
        buffer.goal_height = Some(p.goal_height.get() as i32);
        buffer.ball_radius = Some(p.ball_radius.get() as f32);
        buffer.max_robot_radius = Some(p.max_robot_radius.get() as f32);

        buffer.field_lines = markings.lines.iter().map(line_segment).collect();
        buffer.field_arcs = markings.arcs.iter().map(circular_arc).collect();
    }

    pub fn geometry(&self) -> SslGeometryFieldSize {
        let mut buffer = SslGeometryFieldSize::default();
        self.fill_geometry(&mut buffer);
        buffer
    }

    /// The current geometry in protobuf wire format.
    pub fn encode_geometry(&self) -> Vec<u8> {
        self.geometry().encode_to_vec()
    }

    /// Writes the ball model parameters into `buffer`.
    pub fn fill_models(&self, buffer: &mut SslGeometryModels) {
        let _markings = self.markings.read();
        self.models.fill(buffer);
    }

    pub fn geometry_models(&self) -> SslGeometryModels {
        let mut buffer = SslGeometryModels::default();
        self.fill_models(&mut buffer);
        buffer
    }
}

#[allow(clippy::cast_possible_truncation)]
fn vector(xy: [f64; 2]) -> Vector2f {
    Vector2f::new(xy[0] as f32, xy[1] as f32)
}

#[allow(clippy::cast_possible_truncation)]
fn line_segment(line: &FieldLine) -> SslFieldLineSegment {
    let mut segment = SslFieldLineSegment {
        name: line.name(),
        p1: vector(line.p1()),
        p2: vector(line.p2()),
        thickness: line.thickness() as f32,
        r#type: None,
    };
    segment.set_type(parse_shape_type(line.shape_type()));
    segment
}

#[allow(clippy::cast_possible_truncation)]
fn circular_arc(arc: &FieldCircularArc) -> SslFieldCircularArc {
    let mut proto = SslFieldCircularArc {
        name: arc.name(),
        center: vector(arc.center()),
        radius: arc.radius() as f32,
        a1: arc.start_angle() as f32,
        a2: arc.end_angle() as f32,
        thickness: arc.thickness() as f32,
        r#type: None,
    };
    proto.set_type(parse_shape_type(arc.shape_type()));
    proto
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use ssl_field_proto::SslFieldShapeType;

    use super::*;

    #[test]
    fn test_render_default_geometry() {
        let field = RoboCupField::new();
        let geometry = field.geometry();

        assert_eq!(geometry.field_length, 12040);
        assert_eq!(geometry.field_width, 9020);
        assert_eq!(geometry.goal_width, 1200);
        assert_eq!(geometry.penalty_area_depth, Some(1220));
        assert_eq!(geometry.center_circle_radius, Some(500));
        assert_eq!(geometry.ball_radius, Some(21.5));
        assert_eq!(geometry.field_lines.len(), 12);
        assert_eq!(geometry.field_arcs.len(), 1);

        let top = &geometry.field_lines[0];
        assert_eq!(top.name, "TopTouchLine");
        assert_eq!(top.r#type(), SslFieldShapeType::TopTouchLine);
        assert_eq!(top.p1, Vector2f::new(-6020.0, 4510.0));

        let circle = &geometry.field_arcs[0];
        assert_eq!(circle.r#type(), SslFieldShapeType::CenterCircle);
        assert!((circle.a2 - std::f32::consts::TAU).abs() < 1e-6);
    }

    #[test]
    fn test_render_without_center_line() {
        let field = RoboCupField::new();
        field.params().center_line.set(false);
        field.update_field_lines_and_arcs();
        assert_eq!(field.geometry().field_lines.len(), 11);
    }

    #[test]
    fn test_render_truncates_integer_fields() {
        let field = RoboCupField::new();
        field.params().field_length.set(9000.9);
        field.params().goal_depth.set(179.5);
        field.params().max_robot_radius.set(89.75);

        let geometry = field.geometry();
        assert_eq!(geometry.field_length, 9000);
        assert_eq!(geometry.goal_depth, 179);
        assert_eq!(geometry.max_robot_radius, Some(89.75));
    }

    #[test]
    fn test_unknown_shape_type_renders_undefined() {
        let field = RoboCupField::new();
        field.num_lines().edit(13);
        field.lines()[0].shape_type().set("touch line");

        let geometry = field.geometry();
        assert_eq!(geometry.field_lines[0].r#type(), SslFieldShapeType::Undefined);
        assert_eq!(geometry.field_lines[12].name, "Line 12");
        assert_eq!(geometry.field_lines[12].r#type(), SslFieldShapeType::Undefined);
    }

    #[test]
    fn test_fill_geometry_clears_buffer() {
        let field = RoboCupField::new();
        let mut buffer = field.geometry();
        field.num_lines().edit(2);
        field.fill_geometry(&mut buffer);
        assert_eq!(buffer.field_lines.len(), 2);
    }

    #[test]
    fn test_encoded_geometry_decodes() {
        let field = RoboCupField::with_dimensions(&crate::division::Division::B.dimensions());
        let bytes = field.encode_geometry();
        let decoded = SslGeometryFieldSize::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded, field.geometry());
        assert_eq!(decoded.field_length, 9000);
        assert_eq!(decoded.field_lines[0].p1, Vector2f::new(-4500.0, 3000.0));
    }

    #[test]
    fn test_render_models() {
        let field = RoboCupField::new();
        field.models().chip_fixed_loss.damping_z.set(0.5);

        let models = field.geometry_models();
        let chip = models.chip_fixed_loss.unwrap();
        assert!((chip.damping_z - 0.5).abs() < f64::EPSILON);
        let straight = models.straight_two_phase.unwrap();
        assert!((straight.acc_slide + 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_render_while_resizing() {
        let field = RoboCupField::new();
        let reader = {
            let field = Arc::clone(&field);
            thread::spawn(move || {
                for _ in 0..200 {
                    let geometry = field.geometry();
                    let lines = geometry.field_lines.len();
                    assert!(lines == 4 || lines == 12 || lines == 30, "partial render: {lines}");
                }
            })
        };
        for i in 0..50 {
            field.num_lines().edit(if i % 2 == 0 { 30 } else { 4 });
        }
        field.update_field_lines_and_arcs();
        reader.join().unwrap();
        field.check_consistency().unwrap();
    }
}
