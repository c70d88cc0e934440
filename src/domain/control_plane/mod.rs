pub mod control_plane;
pub mod network;
pub mod power;
