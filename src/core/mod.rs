//! Core translation orchestration module

pub mod classifier;
pub mod engine;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod registry;
pub mod tree;
