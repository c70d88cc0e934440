use crate::domain::circuit::circuit::Circuit;
use crate::domain::circuit::circuit_store::CircuitStore;
use crate::domain::network::modulation::Modulation;
use crate::domain::network::route::Route;
use crate::domain::network::spectrum::SpectrumBand;
use crate::domain::network::topology::Topology;
use crate::domain::physical_layer::crosstalk::Crosstalk;
use crate::domain::physical_layer::physical_layer::PhysicalLayer;
use crate::domain::physical_layer::reach::ReachTable;
use crate::domain::rmlsa::routing::RoutingProvider;
use crate::error::Result;

/// Read-only view of the network state handed to RMLSA algorithms.
///
/// Algorithms decide on a circuit; only the control plane commits.
#[derive(Clone, Copy)]
pub struct RmlsaContext<'a> {
    pub topology: &'a Topology,
    pub circuits: &'a CircuitStore,
    pub physical_layer: &'a PhysicalLayer,
    pub crosstalk: &'a Crosstalk,
    pub routing: &'a dyn RoutingProvider,
    pub modulations: &'a [Modulation],
    pub reach_table: &'a ReachTable,
}

impl<'a> RmlsaContext<'a> {
    /// Free slots on `core` common to every link of `route`, with the network guard band.
    pub fn free_spectrum(&self, route: &Route, core: usize) -> Result<Vec<SpectrumBand>> {
        self.topology.route_free_spectrum(route, core, self.topology.guard_band())
    }

    /// `true` if a band of `num_slots` is wider than the source transmitter can emit.
    pub fn exceeds_max_amplitude(&self, num_slots: u32, circuit: &Circuit) -> Result<bool> {
        let amplitude = self.topology.node(&circuit.source)?.transmitters.max_spectral_amplitude;
        Ok(num_slots > amplitude)
    }
}
