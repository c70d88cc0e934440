use std::fmt::Debug;

use crate::domain::circuit::circuit_store::CircuitStore;
use crate::domain::network::topology::Topology;

/// Notified after every commit and release so an energy model can refresh
/// its view of the network.
pub trait PowerConsumptionHook: Debug {
    fn recompute(&mut self, topology: &Topology, circuits: &CircuitStore);
}

/// Ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPowerModel;

impl PowerConsumptionHook for NoPowerModel {
    fn recompute(&mut self, _topology: &Topology, _circuits: &CircuitStore) {}
}

/// Fixed wattage per active circuit (its transceiver pair) plus per
/// amplifier on every lit link (booster, in-line amplifiers, pre-amplifier).
#[derive(Debug, Clone)]
pub struct TransceiverPowerModel {
    watts_per_circuit: f64,
    watts_per_amplifier: f64,
    /// km
    span_length: f64,
    total_watts: f64,
}

impl TransceiverPowerModel {
    pub fn new(watts_per_circuit: f64, watts_per_amplifier: f64, span_length: f64) -> Self {
        TransceiverPowerModel { watts_per_circuit, watts_per_amplifier, span_length, total_watts: 0.0 }
    }

    pub fn total_watts(&self) -> f64 {
        self.total_watts
    }
}

impl PowerConsumptionHook for TransceiverPowerModel {
    fn recompute(&mut self, topology: &Topology, circuits: &CircuitStore) {
        let amplifiers: f64 = topology
            .links
            .values()
            .filter(|link| link.is_lit())
            .map(|link| ((link.distance_km / self.span_length) - 1.0).ceil().max(0.0) + 2.0)
            .sum();

        self.total_watts = circuits.len() as f64 * self.watts_per_circuit + amplifiers * self.watts_per_amplifier;
        log::trace!("Power consumption recomputed: {:.1} W", self.total_watts);
    }
}
