pub mod core;
pub mod link;
pub mod modulation;
pub mod node;
pub mod route;
pub mod spectrum;
pub mod topology;
