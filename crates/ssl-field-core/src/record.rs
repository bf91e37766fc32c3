//! Shared pieces of the field marking records: the child schema used to adopt
//! existing tree nodes, and the trait the collection logic is generic over.

use std::sync::{Arc, Weak};

use ssl_field_proto::SslFieldShapeType;

use crate::error::SchemaMismatch;
use crate::var::{Value, Var, VarNode, VarString, VarStringEnum, VarType};

/// One expected child of a record node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub var_type: VarType,
}

impl FieldSpec {
    pub const fn new(name: &'static str, var_type: VarType) -> Self {
        Self { name, var_type }
    }
}

/// Matches the children of `node` against `schema`.
///
/// Every child must match exactly one schema entry by name and type, and
/// every entry must be matched once. On success the children are returned
/// in schema order.
pub(crate) fn match_schema(node: &Var, schema: &[FieldSpec]) -> Result<Vec<Var>, SchemaMismatch> {
    let children = node.children();
    if children.len() != schema.len() {
        return Err(SchemaMismatch::ChildCount {
            expected: schema.len(),
            found: children.len(),
        });
    }

    let mut slots: Vec<Option<Var>> = vec![None; schema.len()];
    for child in children {
        let name = child.name();
        let Some(index) = schema.iter().position(|spec| spec.name == name) else {
            return Err(SchemaMismatch::UnexpectedChild(name));
        };
        if slots[index].is_some() {
            return Err(SchemaMismatch::DuplicateChild(name));
        }
        let found = child.var_type();
        if found != schema[index].var_type {
            return Err(SchemaMismatch::WrongType {
                name,
                expected: schema[index].var_type,
                found,
            });
        }
        slots[index] = Some(child);
    }

    // Count and uniqueness checks above guarantee every slot is filled.
    Ok(slots.into_iter().flatten().collect())
}

/// Keeps the node's display name in sync with its `Name` leaf.
pub(crate) fn connect_rename(name: &VarString, node: &Var) {
    let node: Weak<_> = Arc::downgrade(node);
    name.edited().connect(move |leaf| {
        if let (Some(node), Some(name)) = (node.upgrade(), leaf_name(leaf)) {
            node.set_name(name);
        }
    });
}

fn leaf_name(leaf: &VarNode) -> Option<String> {
    leaf.with_value(|value| match value {
        Value::String(name) => Some(name.clone()),
        _ => None,
    })
    .flatten()
}

pub(crate) fn fill_type_enum(shape_type: &VarStringEnum, kinds: &[SslFieldShapeType]) {
    for kind in kinds {
        shape_type.add_item(kind.as_str_name());
    }
}

/// Resolves a shape-type leaf to its protobuf code, `Undefined` when unknown.
pub fn parse_shape_type(shape_type: &VarStringEnum) -> SslFieldShapeType {
    SslFieldShapeType::from_str_name(&shape_type.get()).unwrap_or(SslFieldShapeType::Undefined)
}

/// A field marking backed by a tree node, managed in a resizable collection.
pub trait FieldMarking: Sized {
    /// Collection label used in logs and errors.
    const KIND: &'static str;

    /// Creates a default record named `name`.
    fn with_name(name: &str) -> Self;

    /// Wraps the existing children of `node`.
    fn from_var_list(node: &Var) -> Result<Self, SchemaMismatch>;

    /// Name of the `index`-th record appended by a resize.
    fn default_name(index: usize) -> String;

    /// The backing tree node.
    fn node(&self) -> &Var;
}
