// src/core.rs
pub mod canonical;
pub mod classifier;
pub mod cleaner;
pub mod extract;
pub mod favorites;
pub mod ingest;
pub mod library;
pub mod normalize;
pub mod patterns;
pub mod planner;
pub mod reconciler;
