use std::collections::HashMap;

use crate::domain::network::modulation::Modulation;
use crate::domain::network::topology::Topology;
use crate::domain::physical_layer::physical_layer::PhysicalLayer;

/// Maximum transparent reach (km) per modulation and bit rate.
#[derive(Debug, Clone, Default)]
pub struct ReachTable {
    /// Keyed by modulation name and bit rate in bit/s.
    entries: HashMap<(String, u64), f64>,
}

impl ReachTable {
    pub fn new() -> Self {
        ReachTable { entries: HashMap::new() }
    }

    /// Computes the reach of every modulation at every bit rate.
    pub fn compute(physical_layer: &PhysicalLayer, topology: &Topology, modulations: &[Modulation], bit_rates: &[f64]) -> Self {
        let average_last_segment = topology.average_last_fiber_segment(physical_layer.span_length());
        let mut table = ReachTable::new();

        for &bit_rate in bit_rates {
            for modulation in modulations {
                let reach = physical_layer.compute_modulation_reach(modulation, bit_rate, topology.num_slots(), average_last_segment);
                log::debug!("Reach of {} at {} Gb/s: {:.0} km", modulation.name, bit_rate / 1e9, reach);
                table.insert(modulation, bit_rate, reach);
            }
        }

        table
    }

    pub fn insert(&mut self, modulation: &Modulation, bit_rate: f64, reach_km: f64) {
        self.entries.insert((modulation.name.clone(), bit_rate.round() as u64), reach_km);
    }

    pub fn contains(&self, modulation: &Modulation, bit_rate: f64) -> bool {
        self.entries.contains_key(&(modulation.name.clone(), bit_rate.round() as u64))
    }

    /// Reach in km. Falls back to the modulation's configured range, then 0.
    pub fn reach_km(&self, modulation: &Modulation, bit_rate: f64) -> f64 {
        match self.entries.get(&(modulation.name.clone(), bit_rate.round() as u64)) {
            Some(reach) => *reach,
            None => modulation.max_range_km.unwrap_or(0.0),
        }
    }
}
