//! Straight field markings.

use std::sync::Arc;

use ssl_field_proto::SslFieldShapeType;

use crate::error::SchemaMismatch;
use crate::record::{FieldMarking, FieldSpec, connect_rename, fill_type_enum, match_schema};
use crate::var::{Var, VarDouble, VarNode, VarString, VarStringEnum, VarType};

/// Shape types offered by the `Type` leaf of a line.
pub const LINE_SHAPE_TYPES: [SslFieldShapeType; 13] = [
    SslFieldShapeType::Undefined,
    SslFieldShapeType::TopTouchLine,
    SslFieldShapeType::BottomTouchLine,
    SslFieldShapeType::LeftGoalLine,
    SslFieldShapeType::RightGoalLine,
    SslFieldShapeType::HalfwayLine,
    SslFieldShapeType::CenterLine,
    SslFieldShapeType::LeftPenaltyStretch,
    SslFieldShapeType::RightPenaltyStretch,
    SslFieldShapeType::LeftFieldLeftPenaltyStretch,
    SslFieldShapeType::LeftFieldRightPenaltyStretch,
    SslFieldShapeType::RightFieldLeftPenaltyStretch,
    SslFieldShapeType::RightFieldRightPenaltyStretch,
];

/// Children of a line node, in canonical order.
pub const LINE_SCHEMA: [FieldSpec; 7] = [
    FieldSpec::new("Name", VarType::String),
    FieldSpec::new("Type", VarType::StringEnum),
    FieldSpec::new("P1.x", VarType::Double),
    FieldSpec::new("P1.y", VarType::Double),
    FieldSpec::new("P2.x", VarType::Double),
    FieldSpec::new("P2.y", VarType::Double),
    FieldSpec::new("Line thickness", VarType::Double),
];

/// Default thickness of a line created without explicit geometry.
pub const DEFAULT_LINE_THICKNESS: f64 = 10.0;

/// A line segment marking bound to its own tree node.
///
/// Dropping the record detaches its leaves from the node. Cloning builds a
/// fully independent record with fresh leaves and a fresh node.
#[derive(Debug)]
pub struct FieldLine {
    name: VarString,
    shape_type: VarStringEnum,
    p1_x: VarDouble,
    p1_y: VarDouble,
    p2_x: VarDouble,
    p2_y: VarDouble,
    thickness: VarDouble,
    node: Var,
    detached: bool,
}

impl FieldLine {
    /// Creates an `Undefined` line with zeroed endpoints.
    pub fn new(name: &str) -> Self {
        Self::build(name, "Undefined", [0.0, 0.0], [0.0, 0.0], DEFAULT_LINE_THICKNESS)
    }

    /// Creates a line with explicit geometry. The type is set to `name`.
    pub fn with_geometry(name: &str, p1: [f64; 2], p2: [f64; 2], thickness: f64) -> Self {
        Self::build(name, name, p1, p2, thickness)
    }

    fn build(name: &str, shape_type: &str, p1: [f64; 2], p2: [f64; 2], thickness: f64) -> Self {
        let line = Self {
            name: VarString::new("Name", name),
            shape_type: VarStringEnum::new("Type", shape_type),
            p1_x: VarDouble::new("P1.x", p1[0]),
            p1_y: VarDouble::new("P1.y", p1[1]),
            p2_x: VarDouble::new("P2.x", p2[0]),
            p2_y: VarDouble::new("P2.y", p2[1]),
            thickness: VarDouble::new("Line thickness", thickness),
            node: VarNode::list(name),
            detached: false,
        };
        for leaf in line.leaves() {
            line.node.add_child(Arc::clone(leaf));
        }
        line.bind();
        line
    }

    /// Adopts the leaves of an existing node, e.g. one read from a settings
    /// file. The node keeps its identity; its children are put into
    /// canonical order.
    pub fn from_var_list(node: &Var) -> Result<Self, SchemaMismatch> {
        let [name, shape_type, p1_x, p1_y, p2_x, p2_y, thickness]: [Var; 7] =
            match_schema(node, &LINE_SCHEMA)?
                .try_into()
                .map_err(|found: Vec<Var>| SchemaMismatch::ChildCount {
                    expected: LINE_SCHEMA.len(),
                    found: found.len(),
                })?;
        let line = Self {
            name: VarString::wrap(name),
            shape_type: VarStringEnum::wrap(shape_type),
            p1_x: VarDouble::wrap(p1_x),
            p1_y: VarDouble::wrap(p1_y),
            p2_x: VarDouble::wrap(p2_x),
            p2_y: VarDouble::wrap(p2_y),
            thickness: VarDouble::wrap(thickness),
            node: Arc::clone(node),
            detached: false,
        };
        line.node
            .replace_children(line.leaves().into_iter().cloned().collect());
        line.bind();
        Ok(line)
    }

    fn bind(&self) {
        fill_type_enum(&self.shape_type, &LINE_SHAPE_TYPES);
        connect_rename(&self.name, &self.node);
    }

    fn leaves(&self) -> [&Var; 7] {
        [
            self.name.var(),
            self.shape_type.var(),
            self.p1_x.var(),
            self.p1_y.var(),
            self.p2_x.var(),
            self.p2_y.var(),
            self.thickness.var(),
        ]
    }

    pub fn name(&self) -> String {
        self.name.get()
    }

    pub fn name_var(&self) -> &VarString {
        &self.name
    }

    pub fn shape_type(&self) -> &VarStringEnum {
        &self.shape_type
    }

    pub fn p1(&self) -> [f64; 2] {
        [self.p1_x.get(), self.p1_y.get()]
    }

    pub fn p2(&self) -> [f64; 2] {
        [self.p2_x.get(), self.p2_y.get()]
    }

    pub fn thickness(&self) -> f64 {
        self.thickness.get()
    }

    /// Gives up ownership of the node without tearing it down.
    pub fn into_node(mut self) -> Var {
        self.detached = true;
        Arc::clone(&self.node)
    }
}

impl Clone for FieldLine {
    fn clone(&self) -> Self {
        Self::build(
            &self.name.get(),
            &self.shape_type.get(),
            self.p1(),
            self.p2(),
            self.thickness(),
        )
    }
}

impl Drop for FieldLine {
    fn drop(&mut self) {
        if self.detached {
            return;
        }
        for leaf in self.leaves() {
            self.node.remove_child(leaf);
        }
    }
}

impl FieldMarking for FieldLine {
    const KIND: &'static str = "line";

    fn with_name(name: &str) -> Self {
        Self::new(name)
    }

    fn from_var_list(node: &Var) -> Result<Self, SchemaMismatch> {
        Self::from_var_list(node)
    }

    fn default_name(index: usize) -> String {
        format!("Line {index}")
    }

    fn node(&self) -> &Var {
        &self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::var::VarList;

    #[test]
    fn test_new_line_defaults() {
        let line = FieldLine::new("Line 0");
        assert_eq!(line.name(), "Line 0");
        assert_eq!(line.shape_type().get(), "Undefined");
        assert!((line.thickness() - 10.0).abs() < f64::EPSILON);
        assert_eq!(line.shape_type().items().len(), LINE_SHAPE_TYPES.len());

        let names: Vec<String> = line.node().children().iter().map(|c| c.name()).collect();
        let expected: Vec<&str> = LINE_SCHEMA.iter().map(|spec| spec.name).collect();
        assert_eq!(names, expected);
        assert_eq!(line.node().name(), "Line 0");
    }

    #[test]
    fn test_with_geometry_uses_name_as_type() {
        let line = FieldLine::with_geometry("HalfwayLine", [0.0, -4510.0], [0.0, 4510.0], 10.0);
        assert_eq!(line.shape_type().get(), "HalfwayLine");
        assert_eq!(line.p1(), [0.0, -4510.0]);
        assert_eq!(line.p2(), [0.0, 4510.0]);
    }

    #[test]
    fn test_editing_name_renames_node() {
        let line = FieldLine::new("Line 0");
        line.name_var().edit("TopTouchLine");
        assert_eq!(line.node().name(), "TopTouchLine");

        // silent sets do not rename
        line.name_var().set("Other");
        assert_eq!(line.node().name(), "TopTouchLine");
    }

    #[test]
    fn test_readopt_created_node() {
        let line = FieldLine::with_geometry("LeftGoalLine", [-6020.0, -4510.0], [-6020.0, 4510.0], 12.0);
        let node = line.into_node();
        assert_eq!(node.child_count(), 7);

        let adopted = FieldLine::from_var_list(&node).unwrap();
        assert!(Arc::ptr_eq(adopted.node(), &node));
        assert_eq!(adopted.name(), "LeftGoalLine");
        assert_eq!(adopted.shape_type().get(), "LeftGoalLine");
        assert_eq!(adopted.p1(), [-6020.0, -4510.0]);
        assert_eq!(adopted.p2(), [-6020.0, 4510.0]);
        assert!((adopted.thickness() - 12.0).abs() < f64::EPSILON);
        assert_eq!(adopted.shape_type().items().len(), LINE_SHAPE_TYPES.len());
    }

    #[test]
    fn test_adoption_restores_canonical_order() {
        let node = FieldLine::new("Line 0").into_node();
        let mut children = node.children();
        children.reverse();
        node.replace_children(children);

        let adopted = FieldLine::from_var_list(&node).unwrap();
        assert_eq!(adopted.node().children()[0].name(), "Name");
        assert_eq!(adopted.node().children()[6].name(), "Line thickness");
    }

    #[test]
    fn test_adoption_rejects_missing_thickness() {
        let node = FieldLine::new("Line 0").into_node();
        let thickness = node.find_child("Line thickness").unwrap();
        node.remove_child(&thickness);
        assert_eq!(node.child_count(), 6);

        let err = FieldLine::from_var_list(&node).unwrap_err();
        assert_eq!(err, SchemaMismatch::ChildCount { expected: 7, found: 6 });
    }

    #[test]
    fn test_adoption_rejects_unexpected_name() {
        let node = FieldLine::new("Line 0").into_node();
        let thickness = node.find_child("Line thickness").unwrap();
        node.remove_child(&thickness);
        node.add_child(Arc::clone(VarDouble::new("Radius", 1.0).var()));

        let err = FieldLine::from_var_list(&node).unwrap_err();
        assert_eq!(err, SchemaMismatch::UnexpectedChild("Radius".to_string()));
    }

    #[test]
    fn test_drop_leaves_siblings_untouched() {
        let parent = VarList::new("Field Lines");
        let keep = FieldLine::new("Line 0");
        parent.add_child(Arc::clone(keep.node()));

        let line = FieldLine::new("Line 1");
        let node = Arc::clone(line.node());
        parent.add_child(Arc::clone(&node));
        parent.remove_child(&node);
        drop(line);

        assert_eq!(node.child_count(), 0);
        assert_eq!(parent.child_count(), 1);
        assert_eq!(keep.node().child_count(), 7);
    }

    #[test]
    fn test_clone_is_independent() {
        let line = FieldLine::with_geometry("CenterLine", [-1.0, 0.0], [1.0, 0.0], 10.0);
        let copy = line.clone();
        assert!(!Arc::ptr_eq(line.node(), copy.node()));

        copy.name_var().edit("Copy");
        assert_eq!(line.name(), "CenterLine");
        assert_eq!(line.node().name(), "CenterLine");
        assert_eq!(copy.node().name(), "Copy");
        assert_eq!(copy.p2(), [1.0, 0.0]);
    }
}
