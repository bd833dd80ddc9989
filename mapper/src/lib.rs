// This file makes `mapper` into a rust library crate.

// The file `main.rs` still exists to make `mapper` into an executable.

pub mod bind;
pub mod config;
pub mod criteria;
pub mod export_glb;
pub mod import_ply;
pub mod material;
pub mod mesh;
pub mod misc;
pub mod observer;
pub mod pipeline;
pub mod project;
pub mod select;

#[cfg(test)]
mod testing;

pub use base;
