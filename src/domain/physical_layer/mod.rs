pub mod amplifier;
pub mod crosstalk;
pub mod math;
pub mod physical_layer;
pub mod reach;
