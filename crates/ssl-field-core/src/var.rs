//! Observable variable tree.
//!
//! A settings tree is built from [`VarNode`]s shared through [`Var`] handles.
//! Leaves hold a single typed value, list nodes hold an ordered sequence of
//! children. Every node carries two signals:
//!
//! - `edited`: raised by the `edit*` family of setters (a user edit) and by
//!   triggers. Plain `set` calls are silent.
//! - `loaded`: raised on list nodes after their children were replaced from
//!   outside, e.g. by loading a settings file.
//!
//! Leaf values are accessed through typed wrappers ([`VarDouble`],
//! [`VarString`], ...) that are only constructible for nodes of the
//! matching [`VarType`].

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::RwLock;

/// Shared handle to a tree node. Node identity is pointer identity.
pub type Var = Arc<VarNode>;

type Listener<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Synchronous listener list.
///
/// Listeners run on the emitting thread, in connection order. A listener
/// must not connect to the signal that is currently invoking it.
pub struct Signal<T: ?Sized> {
    listeners: RwLock<Vec<Listener<T>>>,
}

impl<T: ?Sized> Default for Signal<T> {
    fn default() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
        }
    }
}

impl<T: ?Sized> Signal<T> {
    pub fn connect<F>(&self, listener: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.listeners.write().push(Box::new(listener));
    }

    pub fn emit(&self, value: &T) {
        for listener in self.listeners.read().iter() {
            listener(value);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }
}

impl<T: ?Sized> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Kind of a node, used for schema matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Double,
    Int,
    Bool,
    String,
    StringEnum,
    Trigger,
    List,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    Double {
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
    Int(i64),
    Bool(bool),
    String(String),
    StringEnum {
        value: String,
        items: Vec<String>,
    },
    Trigger(String),
}

impl Value {
    fn var_type(&self) -> VarType {
        match self {
            Self::Double { .. } => VarType::Double,
            Self::Int(_) => VarType::Int,
            Self::Bool(_) => VarType::Bool,
            Self::String(_) => VarType::String,
            Self::StringEnum { .. } => VarType::StringEnum,
            Self::Trigger(_) => VarType::Trigger,
        }
    }
}

enum Body {
    Leaf(RwLock<Value>),
    List {
        children: RwLock<Vec<Var>>,
        collection: bool,
    },
}

/// A named node of the settings tree.
pub struct VarNode {
    name: RwLock<String>,
    body: Body,
    edited: Signal<VarNode>,
    loaded: Signal<VarNode>,
}

impl VarNode {
    fn new(name: impl Into<String>, body: Body) -> Var {
        Arc::new(Self {
            name: RwLock::new(name.into()),
            body,
            edited: Signal::default(),
            loaded: Signal::default(),
        })
    }

    pub(crate) fn leaf(name: impl Into<String>, value: Value) -> Var {
        Self::new(name, Body::Leaf(RwLock::new(value)))
    }

    /// Creates an empty list node.
    pub fn list(name: impl Into<String>) -> Var {
        Self::new(
            name,
            Body::List {
                children: RwLock::new(Vec::new()),
                collection: false,
            },
        )
    }

    /// Creates an empty list node whose children are replaced wholesale when
    /// a settings snapshot is loaded into it.
    pub fn collection(name: impl Into<String>) -> Var {
        Self::new(
            name,
            Body::List {
                children: RwLock::new(Vec::new()),
                collection: true,
            },
        )
    }

    pub fn name(&self) -> String {
        self.name.read().clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        *self.name.write() = name.into();
    }

    pub fn var_type(&self) -> VarType {
        match &self.body {
            Body::Leaf(value) => value.read().var_type(),
            Body::List { .. } => VarType::List,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.body, Body::List { collection: true, .. })
    }

    pub fn edited(&self) -> &Signal<VarNode> {
        &self.edited
    }

    pub fn loaded(&self) -> &Signal<VarNode> {
        &self.loaded
    }

    pub fn emit_edited(&self) {
        self.edited.emit(self);
    }

    pub fn emit_loaded(&self) {
        self.loaded.emit(self);
    }

    pub(crate) fn value(&self) -> Option<Value> {
        match &self.body {
            Body::Leaf(value) => Some(value.read().clone()),
            Body::List { .. } => None,
        }
    }

    pub(crate) fn with_value<R>(&self, f: impl FnOnce(&Value) -> R) -> Option<R> {
        match &self.body {
            Body::Leaf(value) => Some(f(&value.read())),
            Body::List { .. } => None,
        }
    }

    pub(crate) fn update_value(&self, f: impl FnOnce(&mut Value)) {
        if let Body::Leaf(value) = &self.body {
            f(&mut value.write());
        }
    }

    /// Appends `child`. Leaves cannot hold children; the call is ignored.
    pub fn add_child(&self, child: Var) {
        match &self.body {
            Body::List { children, .. } => children.write().push(child),
            Body::Leaf(_) => {
                tracing::warn!(
                    "[var] Ignoring child '{}' added to leaf '{}'",
                    child.name(),
                    self.name()
                );
            }
        }
    }

    /// Removes `child` (by identity). Returns whether it was a child.
    pub fn remove_child(&self, child: &Var) -> bool {
        let Body::List { children, .. } = &self.body else {
            return false;
        };
        let mut children = children.write();
        let initial_len = children.len();
        children.retain(|c| !Arc::ptr_eq(c, child));
        children.len() < initial_len
    }

    pub fn contains(&self, child: &Var) -> bool {
        match &self.body {
            Body::List { children, .. } => children.read().iter().any(|c| Arc::ptr_eq(c, child)),
            Body::Leaf(_) => false,
        }
    }

    /// Snapshot of the current children, in order.
    pub fn children(&self) -> Vec<Var> {
        match &self.body {
            Body::List { children, .. } => children.read().clone(),
            Body::Leaf(_) => Vec::new(),
        }
    }

    pub fn child_count(&self) -> usize {
        match &self.body {
            Body::List { children, .. } => children.read().len(),
            Body::Leaf(_) => 0,
        }
    }

    /// First child named `name`.
    pub fn find_child(&self, name: &str) -> Option<Var> {
        match &self.body {
            Body::List { children, .. } => {
                children.read().iter().find(|c| *c.name.read() == name).cloned()
            }
            Body::Leaf(_) => None,
        }
    }

    pub fn clear_children(&self) {
        if let Body::List { children, .. } = &self.body {
            children.write().clear();
        }
    }

    /// Replaces the whole child sequence without raising `loaded`.
    pub fn replace_children(&self, new_children: Vec<Var>) {
        if let Body::List { children, .. } = &self.body {
            *children.write() = new_children;
        }
    }
}

impl fmt::Debug for VarNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("VarNode");
        s.field("name", &*self.name.read());
        match &self.body {
            Body::Leaf(value) => s.field("value", &*value.read()),
            Body::List { children, .. } => s.field("children", &children.read().len()),
        };
        s.finish()
    }
}

fn clamp(value: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let value = min.map_or(value, |min| value.max(min));
    max.map_or(value, |max| value.min(max))
}

macro_rules! var_wrapper {
    ($(#[$meta:meta])* $wrapper:ident, $ty:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $wrapper(Var);

        impl $wrapper {
            /// Wraps `var` if it has the matching type.
            pub fn from_var(var: &Var) -> Option<Self> {
                (var.var_type() == $ty).then(|| Self(Arc::clone(var)))
            }

            /// Wraps `var` whose type was already checked.
            #[allow(dead_code)]
            pub(crate) fn wrap(var: Var) -> Self {
                debug_assert_eq!(var.var_type(), $ty);
                Self(var)
            }

            pub fn var(&self) -> &Var {
                &self.0
            }
        }

        impl Deref for $wrapper {
            type Target = VarNode;

            fn deref(&self) -> &VarNode {
                &self.0
            }
        }
    };
}

var_wrapper!(
    /// Floating point leaf, optionally bounded.
    VarDouble,
    VarType::Double
);
var_wrapper!(VarInt, VarType::Int);
var_wrapper!(VarBool, VarType::Bool);
var_wrapper!(VarString, VarType::String);
var_wrapper!(
    /// String leaf restricted (by convention) to a list of items.
    VarStringEnum,
    VarType::StringEnum
);
var_wrapper!(
    /// Button-like leaf: carries no value, only raises `edited`.
    VarTrigger,
    VarType::Trigger
);
var_wrapper!(VarList, VarType::List);

impl VarDouble {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self(VarNode::leaf(
            name,
            Value::Double {
                value,
                min: None,
                max: None,
            },
        ))
    }

    pub fn bounded(name: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        Self(VarNode::leaf(
            name,
            Value::Double {
                value: clamp(value, Some(min), Some(max)),
                min: Some(min),
                max: Some(max),
            },
        ))
    }

    pub fn get(&self) -> f64 {
        self.0
            .with_value(|v| match v {
                Value::Double { value, .. } => *value,
                _ => 0.0,
            })
            .unwrap_or_default()
    }

    pub fn set(&self, new_value: f64) {
        self.0.update_value(|v| {
            if let Value::Double { value, min, max } = v {
                *value = clamp(new_value, *min, *max);
            }
        });
    }

    pub fn edit(&self, value: f64) {
        self.set(value);
        self.0.emit_edited();
    }

    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        self.0
            .with_value(|v| match v {
                Value::Double { min, max, .. } => (*min, *max),
                _ => (None, None),
            })
            .unwrap_or_default()
    }
}

impl VarInt {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self(VarNode::leaf(name, Value::Int(value)))
    }

    pub fn get(&self) -> i64 {
        self.0
            .with_value(|v| match v {
                Value::Int(value) => *value,
                _ => 0,
            })
            .unwrap_or_default()
    }

    pub fn set(&self, new_value: i64) {
        self.0.update_value(|v| {
            if let Value::Int(value) = v {
                *value = new_value;
            }
        });
    }

    pub fn edit(&self, value: i64) {
        self.set(value);
        self.0.emit_edited();
    }
}

impl VarBool {
    pub fn new(name: impl Into<String>, value: bool) -> Self {
        Self(VarNode::leaf(name, Value::Bool(value)))
    }

    pub fn get(&self) -> bool {
        self.0
            .with_value(|v| matches!(v, Value::Bool(true)))
            .unwrap_or_default()
    }

    pub fn set(&self, new_value: bool) {
        self.0.update_value(|v| {
            if let Value::Bool(value) = v {
                *value = new_value;
            }
        });
    }

    pub fn edit(&self, value: bool) {
        self.set(value);
        self.0.emit_edited();
    }
}

impl VarString {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self(VarNode::leaf(name, Value::String(value.into())))
    }

    pub fn get(&self) -> String {
        self.0
            .with_value(|v| match v {
                Value::String(value) => value.clone(),
                _ => String::new(),
            })
            .unwrap_or_default()
    }

    pub fn set(&self, new_value: impl Into<String>) {
        let new_value = new_value.into();
        self.0.update_value(|v| {
            if let Value::String(value) = v {
                *value = new_value;
            }
        });
    }

    pub fn edit(&self, value: impl Into<String>) {
        self.set(value);
        self.0.emit_edited();
    }
}

impl VarStringEnum {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self(VarNode::leaf(
            name,
            Value::StringEnum {
                value: value.into(),
                items: Vec::new(),
            },
        ))
    }

    pub fn get(&self) -> String {
        self.0
            .with_value(|v| match v {
                Value::StringEnum { value, .. } => value.clone(),
                _ => String::new(),
            })
            .unwrap_or_default()
    }

    /// Sets the current value. The value does not have to be one of the items.
    pub fn set(&self, new_value: impl Into<String>) {
        let new_value = new_value.into();
        self.0.update_value(|v| {
            if let Value::StringEnum { value, .. } = v {
                *value = new_value;
            }
        });
    }

    pub fn edit(&self, value: impl Into<String>) {
        self.set(value);
        self.0.emit_edited();
    }

    pub fn items(&self) -> Vec<String> {
        self.0
            .with_value(|v| match v {
                Value::StringEnum { items, .. } => items.clone(),
                _ => Vec::new(),
            })
            .unwrap_or_default()
    }

    /// Appends `item` unless already present.
    pub fn add_item(&self, item: &str) {
        self.0.update_value(|v| {
            if let Value::StringEnum { items, .. } = v {
                if !items.iter().any(|i| i == item) {
                    items.push(item.to_string());
                }
            }
        });
    }
}

impl VarTrigger {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self(VarNode::leaf(name, Value::Trigger(label.into())))
    }

    pub fn label(&self) -> String {
        self.0
            .with_value(|v| match v {
                Value::Trigger(label) => label.clone(),
                _ => String::new(),
            })
            .unwrap_or_default()
    }

    /// Presses the trigger.
    pub fn fire(&self) {
        self.0.emit_edited();
    }
}

impl VarList {
    pub fn new(name: impl Into<String>) -> Self {
        Self(VarNode::list(name))
    }

    pub fn new_collection(name: impl Into<String>) -> Self {
        Self(VarNode::collection(name))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_bounded_double_clamps() {
        let damping = VarDouble::bounded("Damping (z)", 0.7, 0.0, 1.0);
        damping.set(1.5);
        assert!((damping.get() - 1.0).abs() < f64::EPSILON);
        damping.set(-0.5);
        assert!(damping.get().abs() < f64::EPSILON);
        assert_eq!(damping.bounds(), (Some(0.0), Some(1.0)));
    }

    #[test]
    fn test_set_is_silent_and_edit_emits() {
        let count = VarInt::new("Number of Arcs", 0);
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in_listener = Arc::clone(&hits);
        count.edited().connect(move |_| {
            hits_in_listener.fetch_add(1, Ordering::SeqCst);
        });

        count.set(3);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        count.edit(4);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(count.get(), 4);
    }

    #[test]
    fn test_typed_wrapper_rejects_other_kinds() {
        let name = VarString::new("Name", "Line 0");
        assert!(VarDouble::from_var(name.var()).is_none());
        assert!(VarString::from_var(name.var()).is_some());
        assert!(VarList::from_var(name.var()).is_none());
    }

    #[test]
    fn test_children_by_identity() {
        let list = VarList::new("Field Lines");
        let a = VarDouble::new("P1.x", 0.0);
        let b = VarDouble::new("P1.x", 0.0);
        list.add_child(Arc::clone(a.var()));
        list.add_child(Arc::clone(b.var()));

        assert!(list.remove_child(a.var()));
        assert!(!list.remove_child(a.var()));
        assert_eq!(list.child_count(), 1);
        assert!(list.contains(b.var()));
        assert!(Arc::ptr_eq(&list.find_child("P1.x").unwrap(), b.var()));
    }

    #[test]
    fn test_leaf_ignores_children() {
        let leaf = VarBool::new("Center Line", true);
        leaf.add_child(VarNode::list("x"));
        assert_eq!(leaf.child_count(), 0);
        assert!(leaf.children().is_empty());
    }

    #[test]
    fn test_wrap_shares_node() {
        let node = VarNode::collection("Field Arcs");
        let list = VarList::wrap(Arc::clone(&node));
        assert!(Arc::ptr_eq(list.var(), &node));
        assert!(list.is_collection());

        let trigger = VarTrigger::new("Division A", "Apply");
        let alias = VarTrigger::wrap(Arc::clone(trigger.var()));
        assert_eq!(alias.label(), "Apply");
        assert!(Arc::ptr_eq(alias.var(), trigger.var()));
    }

    #[test]
    fn test_string_enum_items_are_unique() {
        let shape = VarStringEnum::new("Type", "Undefined");
        shape.add_item("Undefined");
        shape.add_item("CenterCircle");
        shape.add_item("Undefined");
        assert_eq!(shape.items(), vec!["Undefined", "CenterCircle"]);
        shape.set("NotAnItem");
        assert_eq!(shape.get(), "NotAnItem");
    }
}
