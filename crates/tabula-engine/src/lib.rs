//! tabula-engine - cell storage, formula evaluation and the dependency graph.

pub mod engine;
