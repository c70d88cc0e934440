pub mod config_dto;
pub mod network_dto;
pub mod physical_layer_dto;
pub mod scenario_dto;
pub mod simulation_dto;
