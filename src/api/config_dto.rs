use serde::Deserialize;

use crate::api::network_dto::NetworkDto;
use crate::api::physical_layer_dto::PhysicalLayerDto;
use crate::api::simulation_dto::SimulationDto;

/// Root of a configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDto {
    pub network: NetworkDto,
    #[serde(default)]
    pub physical_layer: PhysicalLayerDto,
    pub simulation: SimulationDto,
}
