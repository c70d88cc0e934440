use std::collections::HashSet;

use crate::domain::circuit::circuit_store::CircuitId;
use crate::domain::network::spectrum::{self, SpectrumBand};

/// One spatial channel of a multi-core fiber link.
///
/// A core owns the occupancy of its `num_slots` frequency slots and the
/// identities of the circuits currently lit on it.
#[derive(Debug, Clone)]
pub struct Core {
    pub id: usize,
    num_slots: u32,

    /// Occupied bands, sorted by `lo` and pairwise disjoint.
    used_bands: Vec<SpectrumBand>,

    /// Circuits occupying spectrum on this core.
    circuits: HashSet<CircuitId>,
}

impl Core {
    pub fn new(id: usize, num_slots: u32) -> Self {
        Core { id, num_slots, used_bands: Vec::new(), circuits: HashSet::new() }
    }

    pub fn num_slots(&self) -> u32 {
        self.num_slots
    }

    pub fn used_bands(&self) -> &[SpectrumBand] {
        &self.used_bands
    }

    /// Free bands of this core, sorted by `lo`.
    ///
    /// Every occupied band is widened by `guard_band` slots on both sides
    /// before being removed, so any band chosen from the result keeps the
    /// guard distance to its neighbours.
    pub fn free_spectrum_bands(&self, guard_band: u32) -> Vec<SpectrumBand> {
        let mut free = vec![SpectrumBand::new(1, self.num_slots)];
        for used in &self.used_bands {
            free = spectrum::subtract(&free, &used.widened(guard_band));
        }
        free
    }

    /// Marks `band` as occupied.
    ///
    /// # Returns
    /// `true` if the band fits inside one free band (computed with `guard_band`),
    /// `false` otherwise. The core is left untouched on `false`.
    pub fn use_spectrum(&mut self, band: SpectrumBand, guard_band: u32) -> bool {
        if band.lo == 0 || band.hi > self.num_slots {
            log::error!("Band {} lies outside core {} with {} slots.", band, self.id, self.num_slots);
            return false;
        }

        if !self.free_spectrum_bands(guard_band).iter().any(|free| free.contains(&band)) {
            return false;
        }

        let position = self.used_bands.partition_point(|used| used.lo < band.lo);
        self.used_bands.insert(position, band);
        true
    }

    /// Returns `band` to the free pool.
    ///
    /// # Returns
    /// `false` (and an error is logged) if the band was not occupied.
    pub fn liberate_spectrum(&mut self, band: SpectrumBand) -> bool {
        match self.used_bands.iter().position(|used| *used == band) {
            Some(position) => {
                self.used_bands.remove(position);
                true
            }
            None => {
                log::error!("Liberation of band {} on core {} was not possible, because the band is not in use.", band, self.id);
                false
            }
        }
    }

    pub fn circuits(&self) -> &HashSet<CircuitId> {
        &self.circuits
    }

    pub fn add_circuit(&mut self, circuit_id: CircuitId) -> bool {
        if self.circuits.insert(circuit_id) {
            true
        } else {
            log::warn!("Attempted to insert duplicate circuit {:?} on core {}.", circuit_id, self.id);
            false
        }
    }

    pub fn remove_circuit(&mut self, circuit_id: CircuitId) -> bool {
        if self.circuits.remove(&circuit_id) {
            true
        } else {
            log::error!("Removal of circuit {:?} from core {} was not possible, because it is not registered.", circuit_id, self.id);
            false
        }
    }

    pub fn used_slots(&self) -> u32 {
        spectrum::total_slots(&self.used_bands)
    }

    /// Fraction of occupied slots.
    pub fn utilization(&self) -> f64 {
        self.used_slots() as f64 / self.num_slots as f64
    }
}

/// Indices of the cores physically adjacent to `core` in a fiber with
/// `num_cores` cores.
///
/// Core 0 sits in the center and touches every other core. The remaining
/// cores form a ring `1, 2, .., num_cores - 1` where each touches the center
/// and its two ring neighbours, wrapping from the last back to 1. For seven
/// cores this is the standard hexagonal layout.
pub fn adjacent_core_indices(core: usize, num_cores: usize) -> Vec<usize> {
    if core >= num_cores {
        return Vec::new();
    }
    if core == 0 {
        return (1..num_cores).collect();
    }

    let ring_len = num_cores - 1;
    let previous = if core == 1 { ring_len } else { core - 1 };
    let next = if core == ring_len { 1 } else { core + 1 };

    let mut adjacent = vec![0];
    for neighbour in [previous, next] {
        if neighbour != core && !adjacent.contains(&neighbour) {
            adjacent.push(neighbour);
        }
    }
    adjacent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_bands_of_empty_core() {
        let core = Core::new(0, 320);
        assert_eq!(core.free_spectrum_bands(1), vec![SpectrumBand::new(1, 320)]);
    }

    #[test]
    fn test_use_spectrum_applies_guard_band() {
        let mut core = Core::new(0, 20);
        assert!(core.use_spectrum(SpectrumBand::new(5, 8), 1));

        assert_eq!(core.free_spectrum_bands(1), vec![SpectrumBand::new(1, 3), SpectrumBand::new(10, 20)]);
        assert_eq!(core.free_spectrum_bands(0), vec![SpectrumBand::new(1, 4), SpectrumBand::new(9, 20)]);

        assert!(!core.use_spectrum(SpectrumBand::new(9, 10), 1), "Band inside the guard region must be rejected");
        assert!(core.use_spectrum(SpectrumBand::new(10, 12), 1));
        assert_eq!(core.used_bands(), &[SpectrumBand::new(5, 8), SpectrumBand::new(10, 12)]);
    }

    #[test]
    fn test_use_then_liberate_restores_free_list() {
        let mut core = Core::new(2, 40);
        assert!(core.use_spectrum(SpectrumBand::new(1, 10), 0));
        let before = core.free_spectrum_bands(1);

        assert!(core.use_spectrum(SpectrumBand::new(20, 25), 1));
        assert!(core.liberate_spectrum(SpectrumBand::new(20, 25)));

        assert_eq!(core.free_spectrum_bands(1), before);
        assert!(!core.liberate_spectrum(SpectrumBand::new(20, 25)));
    }

    #[test]
    fn test_band_outside_core_is_rejected() {
        let mut core = Core::new(0, 10);
        assert!(!core.use_spectrum(SpectrumBand::new(8, 11), 0));
        assert!(core.used_bands().is_empty());
    }

    #[test]
    fn test_utilization() {
        let mut core = Core::new(0, 10);
        assert!(core.use_spectrum(SpectrumBand::new(1, 3), 0));
        assert!((core.utilization() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_seven_core_adjacency() {
        assert_eq!(adjacent_core_indices(0, 7), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(adjacent_core_indices(1, 7), vec![0, 6, 2]);
        assert_eq!(adjacent_core_indices(3, 7), vec![0, 2, 4]);
        assert_eq!(adjacent_core_indices(6, 7), vec![0, 5, 1]);
    }

    #[test]
    fn test_small_core_counts() {
        assert!(adjacent_core_indices(0, 1).is_empty());
        assert_eq!(adjacent_core_indices(1, 2), vec![0]);
        assert_eq!(adjacent_core_indices(2, 3), vec![0, 1]);
        assert!(adjacent_core_indices(7, 7).is_empty());
    }
}
