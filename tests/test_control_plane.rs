mod fixtures;

use std::sync::{Arc, Mutex};

use fixtures::*;
use sdm_eon_sim::api::physical_layer_dto::PhysicalLayerDto;
use sdm_eon_sim::domain::circuit::circuit::{BlockCause, Placement};
use sdm_eon_sim::domain::circuit::circuit_store::CircuitStore;
use sdm_eon_sim::domain::control_plane::control_plane::AdmissionOutcome;
use sdm_eon_sim::domain::control_plane::power::PowerConsumptionHook;
use sdm_eon_sim::domain::network::spectrum::SpectrumBand;
use sdm_eon_sim::domain::network::topology::Topology;
use sdm_eon_sim::domain::rmlsa::routing::KShortestPaths;
use sdm_eon_sim::domain::utils::id::NodeId;
use sdm_eon_sim::error::Error;

#[test]
fn test_establish_and_release_round_trip() {
    let config = config(two_node_network(500.0), PhysicalLayerDto::default(), simulation("FirstFit", "ByDistanceAndBandwidth", standard_catalog()));
    let mut control_plane = control_plane(&config);

    let outcome = control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap();
    let id = outcome.circuit_id().expect("request should be established");

    let circuit = control_plane.circuit(id).unwrap();
    let placement = circuit.placement.unwrap();
    assert_eq!(placement.core, 0);
    assert_eq!(placement.band.lo, 1);
    assert!(circuit.qot);
    assert!(circuit.snr_db.is_finite());

    let a = NodeId::new("A");
    let b = NodeId::new("B");
    assert_eq!(control_plane.topology().node(&a).unwrap().transmitters.in_use(), 1);
    assert_eq!(control_plane.topology().node(&b).unwrap().receivers.in_use(), 1);
    assert_eq!(control_plane.search_for_active_circuits(&a, &b).len(), 1);
    assert!(control_plane.search_for_active_circuits(&b, &a).is_empty());
    assert!((control_plane.data_transmitted() - GBPS_100).abs() < 1.0);
    assert_eq!(free_bands(&control_plane, "A", "B", 0), vec![SpectrumBand::new(placement.band.hi + 1, 320)]);
    assert!(control_plane.utilization() > 0.0);

    let released = control_plane.release_circuit(id).unwrap();
    assert_eq!(released.placement, Some(placement));

    assert_eq!(free_bands(&control_plane, "A", "B", 0), vec![SpectrumBand::new(1, 320)]);
    assert_eq!(control_plane.topology().node(&a).unwrap().transmitters.in_use(), 0);
    assert_eq!(control_plane.topology().node(&b).unwrap().receivers.in_use(), 0);
    assert!(control_plane.active_circuits().is_empty());
    assert_eq!(control_plane.utilization(), 0.0);
}

#[test]
fn test_release_of_inactive_circuit_fails() {
    let config = config(two_node_network(500.0), physical_layer_without_qot(), simulation("FirstFit", "ByDistanceAndBandwidth", standard_catalog()));
    let mut control_plane = control_plane(&config);

    let id = control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap().circuit_id().unwrap();
    assert!(control_plane.release_circuit(id).is_ok());
    assert!(matches!(control_plane.release_circuit(id), Err(Error::UnknownCircuit)));
}

#[test]
fn test_release_of_circuit_missing_its_spectrum_fails() {
    let config = config(two_node_network(500.0), physical_layer_without_qot(), simulation("FirstFit", "ByDistanceAndBandwidth", standard_catalog()));
    let mut control_plane = control_plane(&config);

    let id = control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap().circuit_id().unwrap();
    let band = control_plane.circuit(id).unwrap().placement.unwrap().band;
    let core = control_plane.topology_mut().link_mut(&link_id("A", "B")).unwrap().core_mut(0).unwrap();
    assert!(core.liberate_spectrum(band));

    let result = control_plane.release_circuit(id);
    assert!(matches!(result, Err(Error::InconsistentRelease { core: 0, .. })), "{:?}", result);

    // Everything else the circuit held is still given back.
    assert!(control_plane.active_circuits().is_empty());
    assert!(control_plane.topology().link(&link_id("A", "B")).unwrap().core(0).unwrap().circuits().is_empty());
    assert_eq!(control_plane.topology().node(&NodeId::new("A")).unwrap().transmitters.in_use(), 0);
    assert_eq!(control_plane.topology().node(&NodeId::new("B")).unwrap().receivers.in_use(), 0);
}

#[test]
fn test_commit_on_occupied_spectrum_fails_and_rolls_back() {
    let config = config(triangle_network(), physical_layer_without_qot(), simulation("FirstFit", "ByDistanceAndBandwidth", standard_catalog()));
    let mut control_plane = control_plane(&config);
    occupy(&mut control_plane, "B", "C", 0, &[(1, 4)]);

    let nodes = [NodeId::new("A"), NodeId::new("B"), NodeId::new("C")];
    let route = Arc::new(control_plane.topology().route_through(&nodes).unwrap());
    let qpsk = control_plane.modulations().iter().find(|modulation| modulation.name == "QPSK").unwrap().clone();
    let circuit = request("A", "C", GBPS_100).trial(route, qpsk, Some(Placement::new(0, SpectrumBand::new(1, 4))));

    let result = control_plane.allocate_circuit(circuit);
    match result {
        Err(Error::SpectrumConflict { link, core, band }) => {
            assert_eq!(link, link_id("B", "C"));
            assert_eq!(core, 0);
            assert_eq!(band, SpectrumBand::new(1, 4));
        }
        other => panic!("expected a spectrum conflict, got {:?}", other),
    }

    assert_eq!(control_plane.topology().link(&link_id("A", "B")).unwrap().core(0).unwrap().used_slots(), 0);
    assert_eq!(free_bands(&control_plane, "B", "C", 0), vec![SpectrumBand::new(5, 320)]);
    assert_eq!(control_plane.topology().node(&nodes[0]).unwrap().transmitters.in_use(), 0);
    assert_eq!(control_plane.topology().node(&nodes[2]).unwrap().receivers.in_use(), 0);
    assert!(control_plane.active_circuits().is_empty());
}

#[test]
fn test_lack_of_transmitter_blocks() {
    let mut network = two_node_network(500.0);
    network.nodes[0].transmitters = Some(0);
    let config = config(network, physical_layer_without_qot(), simulation("FirstFit", "ByDistanceAndBandwidth", standard_catalog()));
    let mut control_plane = control_plane(&config);

    let outcome = control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap();
    assert_eq!(outcome.block_cause(), Some(BlockCause::LackTx));
    let AdmissionOutcome::Blocked(circuit) = outcome else { panic!("request should be blocked") };
    assert!(circuit.route.is_none());
    assert_eq!(free_bands(&control_plane, "A", "B", 0), vec![SpectrumBand::new(1, 320)]);
}

#[test]
fn test_lack_of_receiver_blocks() {
    let mut network = two_node_network(500.0);
    network.nodes[1].receivers = Some(0);
    let config = config(network, physical_layer_without_qot(), simulation("FirstFit", "ByDistanceAndBandwidth", standard_catalog()));
    let mut control_plane = control_plane(&config);

    let outcome = control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap();
    assert_eq!(outcome.block_cause(), Some(BlockCause::LackRx));
    assert!(control_plane.active_circuits().is_empty());
}

#[test]
fn test_released_transmitter_can_be_reused() {
    let mut network = two_node_network(500.0);
    network.nodes[0].transmitters = Some(1);
    let config = config(network, physical_layer_without_qot(), simulation("FirstFit", "ByDistanceAndBandwidth", standard_catalog()));
    let mut control_plane = control_plane(&config);

    let first = control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap().circuit_id().unwrap();
    assert_eq!(control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap().block_cause(), Some(BlockCause::LackTx));

    control_plane.release_circuit(first).unwrap();
    assert!(control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap().is_established());
}

#[test]
fn test_overlapping_band_on_adjacent_core_is_blocked_by_crosstalk() {
    let catalog = vec![modulation("64QAM", 6.0, 64.0, 22.0)];
    let config = config(two_node_network(1000.0), physical_layer_without_qot(), simulation("RandomFit", "ByDistanceAndBandwidth", catalog));
    let mut control_plane = control_plane(&config);

    // Round robin puts the first request on core 0 and the second on core 1, both at slot 1.
    let first = control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap();
    assert!(first.is_established());
    assert_eq!(control_plane.circuit(first.circuit_id().unwrap()).unwrap().placement.unwrap().band, SpectrumBand::new(1, 2));

    let second = control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap();
    assert_eq!(second.block_cause(), Some(BlockCause::Crosstalk));
    let AdmissionOutcome::Blocked(circuit) = second else { panic!("request should be blocked") };
    assert_eq!(circuit.placement.unwrap().core, 1);
    assert!(circuit.xt_db > -34.0, "crosstalk {} dB should exceed the 64QAM threshold", circuit.xt_db);
    assert!(!circuit.xt_admissible);

    assert_eq!(control_plane.active_circuits().len(), 1);
    assert_eq!(free_bands(&control_plane, "A", "B", 1), vec![SpectrumBand::new(1, 320)]);
}

/// 20 slots; "Robust" needs 8 slots and always meets QoT, "Fragile" needs 2 and never does.
fn fragmented_config() -> sdm_eon_sim::api::config_dto::ConfigDto {
    let mut network = two_node_network(100.0);
    network.slots_per_core = 20;
    let catalog = vec![modulation("Robust", 1.0, 2.0, -50.0), modulation("Fragile", 4.0, 16.0, 1000.0)];
    config(network, PhysicalLayerDto::default(), simulation("FirstFit", "ByQoT", catalog))
}

#[test]
fn test_scattered_free_slots_block_by_fragmentation() {
    let config = fragmented_config();
    let mut control_plane = control_plane(&config);
    occupy(&mut control_plane, "A", "B", 0, &[(4, 4), (8, 8), (12, 12), (16, 16), (20, 20)]);
    let before = free_bands(&control_plane, "A", "B", 0);

    let outcome = control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap();
    assert_eq!(outcome.block_cause(), Some(BlockCause::Fragmentation));
    assert_eq!(free_bands(&control_plane, "A", "B", 0), before);
    assert!(control_plane.active_circuits().is_empty());
}

#[test]
fn test_too_few_free_slots_block_by_qotn() {
    let config = fragmented_config();
    let mut control_plane = control_plane(&config);
    occupy(&mut control_plane, "A", "B", 0, &[(3, 6), (9, 12), (15, 20)]);

    let outcome = control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap();
    assert_eq!(outcome.block_cause(), Some(BlockCause::QotN));
    let AdmissionOutcome::Blocked(circuit) = outcome else { panic!("request should be blocked") };
    assert_eq!(circuit.modulation.unwrap().name, "Fragile");
    assert!(!circuit.qot);
}

#[test]
fn test_new_circuit_degrading_active_one_is_blocked_by_qoto() {
    let physical_layer = PhysicalLayerDto { active_ase: false, ..PhysicalLayerDto::default() };

    // SNR of a lone 4-slot circuit on this link.
    let lone_catalog = vec![modulation("Fragile", 2.0, 4.0, -50.0)];
    let lone_config = config(two_node_network(1000.0), physical_layer.clone(), simulation("FirstFit", "ByQoT", lone_catalog));
    let mut lone_plane = control_plane(&lone_config);
    let lone_id = lone_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap().circuit_id().unwrap();
    let snr_alone = lone_plane.circuit(lone_id).unwrap().snr_db;
    assert!(snr_alone.is_finite());

    let catalog = vec![modulation("Robust", 1.0, 2.0, -50.0), modulation("Fragile", 2.0, 4.0, snr_alone - 0.5)];
    let config = config(two_node_network(1000.0), physical_layer, simulation("FirstFit", "ByQoT", catalog));
    let mut control_plane = control_plane(&config);

    let first = control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap().circuit_id().unwrap();
    let first_circuit = control_plane.circuit(first).unwrap().clone();
    assert_eq!(first_circuit.modulation.as_ref().unwrap().name, "Fragile");

    let outcome = control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap();
    assert_eq!(outcome.block_cause(), Some(BlockCause::QotO));
    let AdmissionOutcome::Blocked(circuit) = outcome else { panic!("request should be blocked") };
    assert!(circuit.qot);
    assert!(!circuit.qot_for_other);

    let unchanged = control_plane.circuit(first).unwrap();
    assert_eq!(unchanged.snr_db, first_circuit.snr_db);
    assert_eq!(unchanged.placement, first_circuit.placement);
    assert_eq!(control_plane.active_circuits().len(), 1);
    assert_eq!(free_bands(&control_plane, "A", "B", 0), vec![SpectrumBand::new(5, 320)]);
}

#[test]
fn test_others_qot_is_not_checked_when_qot_is_off() {
    let physical_layer = PhysicalLayerDto { active_ase: false, ..PhysicalLayerDto::default() };

    let lone_catalog = vec![modulation("Fragile", 2.0, 4.0, -50.0)];
    let lone_config = config(two_node_network(1000.0), physical_layer.clone(), simulation("FirstFit", "ByQoT", lone_catalog));
    let mut lone = control_plane(&lone_config);
    let lone_id = lone.establish_circuit(request("A", "B", GBPS_100)).unwrap().circuit_id().unwrap();
    let snr_alone = lone.circuit(lone_id).unwrap().snr_db;

    // A neighbour would push the first circuit below its threshold, but with
    // QoT off neither circuit is evaluated.
    let catalog = vec![modulation("Fragile", 2.0, 4.0, snr_alone - 0.5)];
    let physical_layer = PhysicalLayerDto { active_qot: false, active_qot_for_other: true, ..physical_layer };
    let config = config(two_node_network(1000.0), physical_layer, simulation("FirstFit", "ByDistanceAndBandwidth", catalog));
    let mut control_plane = control_plane(&config);

    let first = control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap();
    let second = control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap();
    assert!(first.is_established());
    assert!(second.is_established(), "{:?}", second.block_cause());
    assert_eq!(control_plane.active_circuits().len(), 2);
}

#[test]
fn test_snr_impact_and_margin_queries() {
    let physical_layer = PhysicalLayerDto { active_ase: false, active_qot_for_other: false, ..PhysicalLayerDto::default() };
    let catalog = vec![modulation("Fragile", 2.0, 4.0, -50.0)];
    let config = config(two_node_network(1000.0), physical_layer, simulation("FirstFit", "ByQoT", catalog));
    let mut control_plane = control_plane(&config);

    let first = control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap().circuit_id().unwrap();
    let second = control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap().circuit_id().unwrap();
    let first_margin_at_admission = control_plane.circuit(first).unwrap().snr_db + 50.0;

    // The first circuit was admitted alone, so removing the second gives back exactly its stored SNR.
    assert!(control_plane.computes_impact_on_snr_other(second).unwrap().abs() < 1e-9);
    assert!(control_plane.computes_impact_on_snr_other(first).unwrap() > 0.5);

    let margin_now = control_plane.get_delta_snr(first).unwrap();
    assert!(margin_now < first_margin_at_admission - 0.5, "{} should be below {}", margin_now, first_margin_at_admission);

    let stored_snr = control_plane.circuit(second).unwrap().snr_db;
    control_plane.computes_impact_on_snr_other(first).unwrap();
    assert_eq!(control_plane.circuit(second).unwrap().snr_db, stored_snr);
}

#[test]
fn test_integrated_rmlsa_prefers_lowest_band_over_candidate_routes() {
    let mut simulation = simulation("FirstFit", "ByDistanceAndBandwidth", standard_catalog());
    simulation.rmlsa_type = "Integrated".to_string();
    let config = config(triangle_network(), physical_layer_without_qot(), simulation);
    let mut control_plane = control_plane(&config);
    occupy(&mut control_plane, "A", "B", 0, &[(1, 100)]);

    let id = control_plane.establish_circuit(request("A", "C", GBPS_100)).unwrap().circuit_id().unwrap();
    let circuit = control_plane.circuit(id).unwrap();
    assert_eq!(circuit.route.as_ref().unwrap().hops(), 1);
    assert_eq!(circuit.placement.unwrap().band.lo, 1);
}

#[test]
fn test_integrated_rmlsa_compares_only_the_configured_number_of_routes() {
    let mut simulation = simulation("FirstFit", "ByDistanceAndBandwidth", standard_catalog());
    simulation.rmlsa_type = "Integrated".to_string();
    simulation.k_shortest_paths = 1;
    let config = config(triangle_network(), physical_layer_without_qot(), simulation);
    let mut control_plane = control_plane(&config);
    let routing = KShortestPaths::new(control_plane.topology(), 3);
    let mut control_plane = control_plane.with_routing(Box::new(routing));
    occupy(&mut control_plane, "A", "B", 0, &[(1, 100)]);

    // The direct fiber has a lower band free, but only the shortest route is compared.
    let id = control_plane.establish_circuit(request("A", "C", GBPS_100)).unwrap().circuit_id().unwrap();
    let circuit = control_plane.circuit(id).unwrap();
    assert_eq!(circuit.route.as_ref().unwrap().hops(), 2);
    assert_eq!(circuit.placement.unwrap().band.lo, 101);
}

#[test]
fn test_sequential_rmlsa_uses_shortest_route() {
    let config = config(triangle_network(), physical_layer_without_qot(), simulation("FirstFit", "ByDistanceAndBandwidth", standard_catalog()));
    let mut control_plane = control_plane(&config);
    occupy(&mut control_plane, "A", "B", 0, &[(1, 100)]);

    let id = control_plane.establish_circuit(request("A", "C", GBPS_100)).unwrap().circuit_id().unwrap();
    let circuit = control_plane.circuit(id).unwrap();
    assert_eq!(circuit.route.as_ref().unwrap().hops(), 2);
    assert_eq!(circuit.placement.unwrap().band.lo, 101);
    let hi = circuit.placement.unwrap().band.hi;
    assert_eq!(free_bands(&control_plane, "B", "C", 0), vec![SpectrumBand::new(1, 100), SpectrumBand::new(hi + 1, 320)]);
}

#[derive(Debug, Clone, Default)]
struct CountingHook {
    calls: Arc<Mutex<Vec<usize>>>,
}

impl PowerConsumptionHook for CountingHook {
    fn recompute(&mut self, _topology: &Topology, circuits: &CircuitStore) {
        self.calls.lock().unwrap().push(circuits.len());
    }
}

#[test]
fn test_power_hook_runs_after_commit_and_release() {
    let mut network = two_node_network(500.0);
    network.nodes[0].transmitters = Some(1);
    let config = config(network, physical_layer_without_qot(), simulation("FirstFit", "ByDistanceAndBandwidth", standard_catalog()));

    let hook = CountingHook::default();
    let calls = hook.calls.clone();
    let mut control_plane = control_plane(&config).with_power_hook(Box::new(hook));

    let id = control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap().circuit_id().unwrap();
    assert!(!control_plane.establish_circuit(request("A", "B", GBPS_100)).unwrap().is_established());
    control_plane.release_circuit(id).unwrap();

    assert_eq!(*calls.lock().unwrap(), vec![1, 0]);
}
