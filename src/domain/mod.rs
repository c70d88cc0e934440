pub mod circuit;
pub mod control_plane;
pub mod network;
pub mod physical_layer;
pub mod rmlsa;
pub mod simulation;
pub mod utils;
