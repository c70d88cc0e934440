use slotmap::{SlotMap, new_key_type};
use std::collections::HashMap;

use crate::domain::circuit::circuit::Circuit;
use crate::domain::utils::id::NodeId;

new_key_type! {
    pub struct CircuitId;
}

/// Registry of the active circuits of one network.
///
/// Keeps the circuits themselves plus an index by `(source, destination)`
/// so circuits between a node pair are found without a full scan.
#[derive(Debug, Default, Clone)]
pub struct CircuitStore {
    /// Circuit storage.
    circuits: SlotMap<CircuitId, Circuit>,

    /// Active circuits per ordered node pair, in admission order.
    pair_index: HashMap<(NodeId, NodeId), Vec<CircuitId>>,
}

impl CircuitStore {
    pub fn new() -> Self {
        CircuitStore { circuits: SlotMap::with_key(), pair_index: HashMap::new() }
    }

    /// Registers an active circuit.
    ///
    /// # Returns
    /// The key under which the circuit is stored.
    pub fn add(&mut self, circuit: Circuit) -> CircuitId {
        let pair = (circuit.source.clone(), circuit.destination.clone());
        let key = self.circuits.insert(circuit);
        self.pair_index.entry(pair).or_default().push(key);
        key
    }

    /// Unregisters a circuit.
    ///
    /// # Returns
    /// The removed circuit, or `None` if the key is not active.
    pub fn remove(&mut self, key: CircuitId) -> Option<Circuit> {
        let circuit = self.circuits.remove(key)?;
        let pair = (circuit.source.clone(), circuit.destination.clone());

        if let Some(keys) = self.pair_index.get_mut(&pair) {
            keys.retain(|other| *other != key);
            if keys.is_empty() {
                self.pair_index.remove(&pair);
            }
        }

        Some(circuit)
    }

    pub fn get(&self, key: CircuitId) -> Option<&Circuit> {
        self.circuits.get(key)
    }

    pub fn get_mut(&mut self, key: CircuitId) -> Option<&mut Circuit> {
        self.circuits.get_mut(key)
    }

    pub fn contains(&self, key: CircuitId) -> bool {
        self.circuits.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.circuits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circuits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CircuitId, &Circuit)> {
        self.circuits.iter()
    }

    /// Active circuits from `source` to `destination`, in admission order.
    pub fn search(&self, source: &NodeId, destination: &NodeId) -> Vec<(CircuitId, &Circuit)> {
        self.pair_index
            .get(&(source.clone(), destination.clone()))
            .into_iter()
            .flatten()
            .filter_map(|key| self.circuits.get(*key).map(|circuit| (*key, circuit)))
            .collect()
    }

    /// Active circuits leaving `source`.
    pub fn search_from(&self, source: &NodeId) -> Vec<(CircuitId, &Circuit)> {
        self.circuits.iter().filter(|(_, circuit)| &circuit.source == source).collect()
    }

    /// Sum of the bit rates of all active circuits, in bit/s.
    pub fn data_transmitted(&self) -> f64 {
        self.circuits.values().map(|circuit| circuit.bit_rate).sum()
    }
}
