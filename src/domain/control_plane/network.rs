use crate::domain::circuit::circuit_store::CircuitStore;
use crate::domain::network::modulation::Modulation;
use crate::domain::network::topology::Topology;
use crate::domain::physical_layer::crosstalk::Crosstalk;
use crate::domain::physical_layer::physical_layer::PhysicalLayer;
use crate::domain::physical_layer::reach::ReachTable;
use crate::domain::rmlsa::context::RmlsaContext;
use crate::domain::rmlsa::routing::RoutingProvider;

/// Network state owned by a control plane: the mesh, its active circuits
/// and the physical models evaluated on them.
#[derive(Debug)]
pub struct Network {
    pub topology: Topology,
    pub circuits: CircuitStore,
    pub physical_layer: PhysicalLayer,
    pub crosstalk: Crosstalk,
    pub routing: Box<dyn RoutingProvider>,
    pub modulations: Vec<Modulation>,
    pub reach_table: ReachTable,
}

impl Network {
    pub fn context(&self) -> RmlsaContext<'_> {
        RmlsaContext {
            topology: &self.topology,
            circuits: &self.circuits,
            physical_layer: &self.physical_layer,
            crosstalk: &self.crosstalk,
            routing: self.routing.as_ref(),
            modulations: &self.modulations,
            reach_table: &self.reach_table,
        }
    }
}
