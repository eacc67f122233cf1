//! Fixed-size `f32` vectors and column-major matrices.
//!
//! `vector.rs` and `matrix.rs` are generated from the templates next to them;
//! the whole `vecmat64` crate is derived from this one.

//vecmat:generate vecmat-codegen --template vector.rs.hbs --output vector.rs
//vecmat:generate vecmat-codegen --template matrix.rs.hbs --output matrix.rs
//vecmat:generate vecmat-codegen --vecmat64 --dir ../vecmat64

pub mod matrix;
pub mod util;
pub mod vector;

pub use matrix::*;
pub use util::{approx_eq, clamp};
pub use vector::{Vec2, Vec3, Vec4};
