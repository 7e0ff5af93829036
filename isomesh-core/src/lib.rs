//! Core data structures and traits for isomesh
//!
//! This crate provides the fundamental types shared by the extraction
//! pipeline: lattice and world-space points, the non-indexed output mesh,
//! the pluggable density function trait, and the error type.

pub mod point;
pub mod mesh;
pub mod traits;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
