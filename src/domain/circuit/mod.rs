pub mod circuit;
pub mod circuit_store;
