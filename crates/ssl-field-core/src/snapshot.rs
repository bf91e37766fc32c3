//! Serializable snapshots of the variable tree.
//!
//! A snapshot stores names and values only. Bounds and enum items are part of
//! the program, not of the settings file, and are kept from the live tree
//! when a snapshot is applied.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::var::{
    Value, Var, VarBool, VarDouble, VarInt, VarNode, VarString, VarStringEnum, VarTrigger, VarType,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarSnapshot {
    pub name: String,
    #[serde(flatten)]
    pub value: SnapshotValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SnapshotValue {
    Double { value: f64 },
    Int { value: i64 },
    Bool { value: bool },
    String { value: String },
    StringEnum { value: String },
    Trigger,
    List { children: Vec<VarSnapshot> },
}

impl SnapshotValue {
    pub fn var_type(&self) -> VarType {
        match self {
            Self::Double { .. } => VarType::Double,
            Self::Int { .. } => VarType::Int,
            Self::Bool { .. } => VarType::Bool,
            Self::String { .. } => VarType::String,
            Self::StringEnum { .. } => VarType::StringEnum,
            Self::Trigger => VarType::Trigger,
            Self::List { .. } => VarType::List,
        }
    }
}

impl VarSnapshot {
    /// Captures `node` and everything below it.
    pub fn capture(node: &VarNode) -> Self {
        let value = match node.value() {
            Some(Value::Double { value, .. }) => SnapshotValue::Double { value },
            Some(Value::Int(value)) => SnapshotValue::Int { value },
            Some(Value::Bool(value)) => SnapshotValue::Bool { value },
            Some(Value::String(value)) => SnapshotValue::String { value },
            Some(Value::StringEnum { value, .. }) => SnapshotValue::StringEnum { value },
            Some(Value::Trigger(_)) => SnapshotValue::Trigger,
            None => SnapshotValue::List {
                children: node.children().iter().map(|c| Self::capture(c)).collect(),
            },
        };
        Self {
            name: node.name(),
            value,
        }
    }

    /// Builds a fresh, unbounded tree from the snapshot.
    pub fn build(&self) -> Var {
        match &self.value {
            SnapshotValue::Double { value } => Arc::clone(VarDouble::new(&self.name, *value).var()),
            SnapshotValue::Int { value } => Arc::clone(VarInt::new(&self.name, *value).var()),
            SnapshotValue::Bool { value } => Arc::clone(VarBool::new(&self.name, *value).var()),
            SnapshotValue::String { value } => {
                Arc::clone(VarString::new(&self.name, value.as_str()).var())
            }
            SnapshotValue::StringEnum { value } => {
                Arc::clone(VarStringEnum::new(&self.name, value.as_str()).var())
            }
            SnapshotValue::Trigger => Arc::clone(VarTrigger::new(&self.name, "").var()),
            SnapshotValue::List { children } => {
                let list = VarNode::list(&self.name);
                for child in children {
                    list.add_child(child.build());
                }
                list
            }
        }
    }

    /// Writes the snapshot into `var` without raising any signal.
    ///
    /// Leaves take the stored value. Collections get their children replaced
    /// by freshly built nodes; other lists are matched child by child by
    /// name. Every list that was written is pushed to `loaded`, children
    /// before their parent.
    pub(crate) fn apply(&self, var: &Var, loaded: &mut Vec<Var>) {
        if var.var_type() != self.value.var_type() {
            tracing::warn!(
                "[var] Ignoring setting '{}': stored as {:?}, tree has {:?}",
                self.name,
                self.value.var_type(),
                var.var_type()
            );
            return;
        }

        match &self.value {
            SnapshotValue::Double { value } => VarDouble::wrap(Arc::clone(var)).set(*value),
            SnapshotValue::Int { value } => VarInt::wrap(Arc::clone(var)).set(*value),
            SnapshotValue::Bool { value } => VarBool::wrap(Arc::clone(var)).set(*value),
            SnapshotValue::String { value } => VarString::wrap(Arc::clone(var)).set(value.as_str()),
            SnapshotValue::StringEnum { value } => {
                VarStringEnum::wrap(Arc::clone(var)).set(value.as_str());
            }
            SnapshotValue::Trigger => {}
            SnapshotValue::List { children } => {
                if var.is_collection() {
                    var.replace_children(children.iter().map(Self::build).collect());
                } else {
                    for child in children {
                        match var.find_child(&child.name) {
                            Some(target) => child.apply(&target, loaded),
                            None => tracing::warn!(
                                "[var] Ignoring unknown setting '{}' in '{}'",
                                child.name,
                                self.name
                            ),
                        }
                    }
                }
                loaded.push(Arc::clone(var));
            }
        }
    }
}
