// src/extractors/mod.rs
pub mod section;
pub mod text;
