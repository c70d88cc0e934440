use crate::domain::network::core::{Core, adjacent_core_indices};
use crate::domain::utils::id::{LinkId, NodeId};
use crate::error::{Error, Result};

/// Directed multi-core fiber between two nodes.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: LinkId,
    pub source: NodeId,
    pub target: NodeId,
    pub distance_km: f64,
    cores: Vec<Core>,
}

impl Link {
    pub fn new(source: NodeId, target: NodeId, distance_km: f64, num_cores: usize, num_slots: u32) -> Self {
        let cores = (0..num_cores).map(|index| Core::new(index, num_slots)).collect();
        Link { id: LinkId::between(&source, &target), source, target, distance_km, cores }
    }

    pub fn num_cores(&self) -> usize {
        self.cores.len()
    }

    pub fn cores(&self) -> &[Core] {
        &self.cores
    }

    pub fn core(&self, index: usize) -> Result<&Core> {
        let num_cores = self.cores.len();
        self.cores.get(index).ok_or_else(|| Error::CoreOutOfRange { link: self.id.clone(), core: index, num_cores })
    }

    pub fn core_mut(&mut self, index: usize) -> Result<&mut Core> {
        let num_cores = self.cores.len();
        let link = self.id.clone();
        self.cores.get_mut(index).ok_or(Error::CoreOutOfRange { link, core: index, num_cores })
    }

    /// Cores physically adjacent to the core at `index`.
    pub fn adjacent_cores(&self, index: usize) -> impl Iterator<Item = &Core> + '_ {
        adjacent_core_indices(index, self.cores.len()).into_iter().filter_map(move |adjacent| self.cores.get(adjacent))
    }

    pub fn used_slots(&self) -> u32 {
        self.cores.iter().map(Core::used_slots).sum()
    }

    pub fn utilization(&self) -> f64 {
        let capacity: u32 = self.cores.iter().map(Core::num_slots).sum();
        if capacity == 0 { 0.0 } else { self.used_slots() as f64 / capacity as f64 }
    }

    /// `true` if any core carries at least one circuit.
    pub fn is_lit(&self) -> bool {
        self.cores.iter().any(|core| !core.circuits().is_empty())
    }
}
