// src/lib.rs
pub mod domain;
pub mod engine;
pub mod money;
pub mod persistence;
pub mod web;

pub use domain::*;
pub use engine::*;
pub use money::*;
