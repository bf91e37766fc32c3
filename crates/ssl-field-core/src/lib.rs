//! SSL Field Core Library
//!
//! Editable field geometry for SSL vision: an observable settings tree of
//! field dimensions, line segments and circular arcs, kept in sync with typed
//! record collections and rendered into the vision geometry protobuf.
//!
//! - [`var`]: the observable tree and its typed leaves
//! - [`line`] / [`arc`]: marking records bound to tree nodes
//! - [`field`]: the field manager ([`RoboCupField`])
//! - [`snapshot`]: settings persistence

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod arc;
pub mod division;
pub mod error;
pub mod field;
pub mod line;
pub mod models;
pub mod record;
pub mod snapshot;
pub mod var;

pub use arc::FieldCircularArc;
pub use division::{Division, FieldDimensions};
pub use error::{FieldError, SchemaMismatch};
pub use field::{FieldParams, RoboCupField, default_field_arcs, default_field_lines};
pub use line::FieldLine;
pub use models::{BallModelChipFixedLoss, BallModelStraightTwoPhase, FieldModels};
pub use record::{FieldMarking, FieldSpec, parse_shape_type};
pub use snapshot::{SnapshotValue, VarSnapshot};
pub use var::{
    Signal, Var, VarBool, VarDouble, VarInt, VarList, VarNode, VarString, VarStringEnum,
    VarTrigger, VarType,
};
