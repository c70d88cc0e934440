#![allow(dead_code)]

use sdm_eon_sim::api::config_dto::ConfigDto;
use sdm_eon_sim::api::network_dto::{LinkDto, NetworkDto, NodeDto};
use sdm_eon_sim::api::physical_layer_dto::PhysicalLayerDto;
use sdm_eon_sim::api::simulation_dto::{ModulationDto, SimulationDto};
use sdm_eon_sim::domain::circuit::circuit::Circuit;
use sdm_eon_sim::domain::control_plane::control_plane::ControlPlane;
use sdm_eon_sim::domain::network::spectrum::SpectrumBand;
use sdm_eon_sim::domain::utils::id::{LinkId, NodeId};

pub const GBPS_100: f64 = 100e9;

pub fn node(name: &str) -> NodeDto {
    NodeDto { name: name.to_string(), transmitters: None, receivers: None, max_spectral_amplitude: None }
}

pub fn link(source: &str, destination: &str, length: f64) -> LinkDto {
    LinkDto { source: source.to_string(), destination: destination.to_string(), length, bidirectional: true }
}

pub fn modulation(name: &str, bits_per_symbol: f64, constellation_size: f64, snr_threshold: f64) -> ModulationDto {
    ModulationDto { name: name.to_string(), bits_per_symbol, constellation_size, snr_threshold, guard_band: 0, max_range: None }
}

/// BPSK up to 64QAM with common SNR thresholds.
pub fn standard_catalog() -> Vec<ModulationDto> {
    vec![
        modulation("BPSK", 1.0, 2.0, 3.0),
        modulation("QPSK", 2.0, 4.0, 6.8),
        modulation("8QAM", 3.0, 8.0, 10.5),
        modulation("16QAM", 4.0, 16.0, 13.5),
        modulation("32QAM", 5.0, 32.0, 16.5),
        modulation("64QAM", 6.0, 64.0, 22.0),
    ]
}

/// Single bidirectional fiber `A <-> B` of `length` km.
pub fn two_node_network(length: f64) -> NetworkDto {
    NetworkDto {
        nodes: vec![node("A"), node("B")],
        links: vec![link("A", "B", length)],
        cores_per_link: 7,
        slots_per_core: 320,
        slot_bandwidth: 12.5e9,
        guard_band: 0,
    }
}

/// Triangle `A - B - C` with a long direct fiber `A - C`.
///
/// ```text
///   A --300-- B --300-- C
///    \_______900_______/
/// ```
pub fn triangle_network() -> NetworkDto {
    NetworkDto {
        nodes: vec![node("A"), node("B"), node("C")],
        links: vec![link("A", "B", 300.0), link("B", "C", 300.0), link("A", "C", 900.0)],
        cores_per_link: 7,
        slots_per_core: 320,
        slot_bandwidth: 12.5e9,
        guard_band: 0,
    }
}

pub fn simulation(spectrum_assignment: &str, modulation_selection: &str, modulations: Vec<ModulationDto>) -> SimulationDto {
    SimulationDto {
        rmlsa_type: "Sequential".to_string(),
        spectrum_assignment: spectrum_assignment.to_string(),
        modulation_selection: modulation_selection.to_string(),
        integrated_rmlsa: "CompleteSharing".to_string(),
        k_shortest_paths: 3,
        seed: 42,
        replications: 1,
        bit_rates: vec![GBPS_100],
        modulations,
    }
}

/// Physical layer with both QoT checks switched off.
pub fn physical_layer_without_qot() -> PhysicalLayerDto {
    PhysicalLayerDto { active_qot: false, active_qot_for_other: false, ..PhysicalLayerDto::default() }
}

pub fn config(network: NetworkDto, physical_layer: PhysicalLayerDto, simulation: SimulationDto) -> ConfigDto {
    ConfigDto { network, physical_layer, simulation }
}

pub fn control_plane(config: &ConfigDto) -> ControlPlane {
    ControlPlane::from_config(config, config.simulation.seed).expect("control plane should build")
}

pub fn request(source: &str, destination: &str, bit_rate: f64) -> Circuit {
    Circuit::new(NodeId::new(source), NodeId::new(destination), bit_rate)
}

pub fn link_id(source: &str, destination: &str) -> LinkId {
    LinkId::between(&NodeId::new(source), &NodeId::new(destination))
}

/// Marks `bands` as used on `core` of the directed link without registering a circuit.
pub fn occupy(control_plane: &mut ControlPlane, source: &str, destination: &str, core: usize, bands: &[(u32, u32)]) {
    let link = control_plane.topology_mut().link_mut(&link_id(source, destination)).expect("link should exist");
    let core = link.core_mut(core).expect("core should exist");
    for &(lo, hi) in bands {
        assert!(core.use_spectrum(SpectrumBand::new(lo, hi), 0), "[{}, {}] should be free", lo, hi);
    }
}

pub fn free_bands(control_plane: &ControlPlane, source: &str, destination: &str, core: usize) -> Vec<SpectrumBand> {
    control_plane.topology().link(&link_id(source, destination)).unwrap().core(core).unwrap().free_spectrum_bands(0)
}
