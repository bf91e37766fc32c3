//! Circular arc field markings.

use std::sync::Arc;

use ssl_field_proto::SslFieldShapeType;

use crate::error::SchemaMismatch;
use crate::record::{FieldMarking, FieldSpec, connect_rename, fill_type_enum, match_schema};
use crate::var::{Var, VarDouble, VarNode, VarString, VarStringEnum, VarType};

pub const ARC_SHAPE_TYPES: [SslFieldShapeType; 2] =
    [SslFieldShapeType::Undefined, SslFieldShapeType::CenterCircle];

/// Children of an arc node, in canonical order.
pub const ARC_SCHEMA: [FieldSpec; 8] = [
    FieldSpec::new("Name", VarType::String),
    FieldSpec::new("Type", VarType::StringEnum),
    FieldSpec::new("Center.x", VarType::Double),
    FieldSpec::new("Center.y", VarType::Double),
    FieldSpec::new("Radius", VarType::Double),
    FieldSpec::new("Start angle", VarType::Double),
    FieldSpec::new("End angle", VarType::Double),
    FieldSpec::new("Line thickness", VarType::Double),
];

pub const DEFAULT_ARC_THICKNESS: f64 = 10.0;

/// A circular arc marking bound to its own tree node. Angles are in radians,
/// counter-clockwise from `start` to `end`.
#[derive(Debug)]
pub struct FieldCircularArc {
    name: VarString,
    shape_type: VarStringEnum,
    center_x: VarDouble,
    center_y: VarDouble,
    radius: VarDouble,
    a1: VarDouble,
    a2: VarDouble,
    thickness: VarDouble,
    node: Var,
    detached: bool,
}

impl FieldCircularArc {
    pub fn new(name: &str) -> Self {
        Self::build(name, "Undefined", [0.0, 0.0], 0.0, 0.0, 0.0, DEFAULT_ARC_THICKNESS)
    }

    /// Creates an arc with explicit geometry. The type is set to `name`.
    pub fn with_geometry(
        name: &str,
        center: [f64; 2],
        radius: f64,
        a1: f64,
        a2: f64,
        thickness: f64,
    ) -> Self {
        Self::build(name, name, center, radius, a1, a2, thickness)
    }

    fn build(
        name: &str,
        shape_type: &str,
        center: [f64; 2],
        radius: f64,
        a1: f64,
        a2: f64,
        thickness: f64,
    ) -> Self {
        let arc = Self {
            name: VarString::new("Name", name),
            shape_type: VarStringEnum::new("Type", shape_type),
            center_x: VarDouble::new("Center.x", center[0]),
            center_y: VarDouble::new("Center.y", center[1]),
            radius: VarDouble::new("Radius", radius),
            a1: VarDouble::new("Start angle", a1),
            a2: VarDouble::new("End angle", a2),
            thickness: VarDouble::new("Line thickness", thickness),
            node: VarNode::list(name),
            detached: false,
        };
        for leaf in arc.leaves() {
            arc.node.add_child(Arc::clone(leaf));
        }
        arc.bind();
        arc
    }

    /// Adopts the leaves of an existing node; see [`crate::FieldLine::from_var_list`].
    pub fn from_var_list(node: &Var) -> Result<Self, SchemaMismatch> {
        let [name, shape_type, center_x, center_y, radius, a1, a2, thickness]: [Var; 8] =
            match_schema(node, &ARC_SCHEMA)?
                .try_into()
                .map_err(|found: Vec<Var>| SchemaMismatch::ChildCount {
                    expected: ARC_SCHEMA.len(),
                    found: found.len(),
                })?;
        let arc = Self {
            name: VarString::wrap(name),
            shape_type: VarStringEnum::wrap(shape_type),
            center_x: VarDouble::wrap(center_x),
            center_y: VarDouble::wrap(center_y),
            radius: VarDouble::wrap(radius),
            a1: VarDouble::wrap(a1),
            a2: VarDouble::wrap(a2),
            thickness: VarDouble::wrap(thickness),
            node: Arc::clone(node),
            detached: false,
        };
        arc.node
            .replace_children(arc.leaves().into_iter().cloned().collect());
        arc.bind();
        Ok(arc)
    }

    fn bind(&self) {
        fill_type_enum(&self.shape_type, &ARC_SHAPE_TYPES);
        connect_rename(&self.name, &self.node);
    }

    fn leaves(&self) -> [&Var; 8] {
        [
            self.name.var(),
            self.shape_type.var(),
            self.center_x.var(),
            self.center_y.var(),
            self.radius.var(),
            self.a1.var(),
            self.a2.var(),
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

    pub fn center(&self) -> [f64; 2] {
        [self.center_x.get(), self.center_y.get()]
    }

    pub fn radius(&self) -> f64 {
        self.radius.get()
    }

    pub fn start_angle(&self) -> f64 {
        self.a1.get()
    }

    pub fn end_angle(&self) -> f64 {
        self.a2.get()
    }

    pub fn thickness(&self) -> f64 {
        self.thickness.get()
    }

    pub fn into_node(mut self) -> Var {
        self.detached = true;
        Arc::clone(&self.node)
    }
}

impl Clone for FieldCircularArc {
    fn clone(&self) -> Self {
        Self::build(
            &self.name.get(),
            &self.shape_type.get(),
            self.center(),
            self.radius(),
            self.start_angle(),
            self.end_angle(),
            self.thickness(),
        )
    }
}

impl Drop for FieldCircularArc {
    fn drop(&mut self) {
        if self.detached {
            return;
        }
        for leaf in self.leaves() {
            self.node.remove_child(leaf);
        }
    }
}

impl FieldMarking for FieldCircularArc {
    const KIND: &'static str = "arc";

    fn with_name(name: &str) -> Self {
        Self::new(name)
    }

    fn from_var_list(node: &Var) -> Result<Self, SchemaMismatch> {
        Self::from_var_list(node)
    }

    fn default_name(index: usize) -> String {
        format!("Arc {index}")
    }

    fn node(&self) -> &Var {
        &self.node
    }
}
