// src/analysis/mod.rs
pub mod scores;
pub mod terms;
