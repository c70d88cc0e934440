use crate::api::config_dto::ConfigDto;
use crate::domain::control_plane::control_plane::ControlPlane;
use crate::error::Result;
use crate::loader::parser::parse_json_file;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Loads a configuration file and builds a control plane seeded with the configured seed.
pub fn build_control_plane(file_path: &str) -> Result<ControlPlane> {
    let config: ConfigDto = parse_json_file::<ConfigDto>(file_path)?;
    log::info!("Configuration '{}' parsed successfully.", file_path);

    let control_plane = ControlPlane::from_config(&config, config.simulation.seed)?;
    log::info!("Control plane constructed successfully.");

    Ok(control_plane)
}
