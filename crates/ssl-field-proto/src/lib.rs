//! SSL Field Geometry Protocol Library
//!
//! Generated protobuf types for the geometry part of the SSL vision protocol,
//! compiled from `proto/ssl_vision_geometry.proto` at build time. The schema
//! is parsed by `protox`, so building this crate needs no `protoc`.

#[allow(clippy::pedantic)]
pub mod geometry {
    // the schema declares no package
    include!(concat!(env!("OUT_DIR"), "/_.rs"));
}

pub use geometry::{
    SslBallModelChipFixedLoss, SslBallModelStraightTwoPhase, SslFieldCircularArc,
    SslFieldLineSegment, SslFieldShapeType, SslGeometryFieldSize, SslGeometryModels, Vector2f,
};

impl Vector2f {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
