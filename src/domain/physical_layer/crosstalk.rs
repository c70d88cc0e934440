use lazy_static::lazy_static;

use crate::domain::circuit::circuit_store::CircuitStore;
use crate::domain::network::modulation::Modulation;
use crate::domain::network::route::Route;
use crate::domain::network::spectrum::SpectrumBand;
use crate::domain::network::topology::Topology;
use crate::domain::physical_layer::math::ratio_to_db;
use crate::error::{Error, Result};

/// Propagation constant, 1/m.
const PROPAGATION_CONSTANT: f64 = 1.0e7;
/// Bending radius, m.
const BENDING_RADIUS: f64 = 0.01;
/// Coupling coefficient, 1/m.
const COUPLING_COEFFICIENT: f64 = 0.012;
/// Core pitch, m.
const CORE_PITCH: f64 = 4.5e-5;
const SIGNAL_POWER: f64 = 10.0;

/// Crosstalk floor used when no adjacent core leaks into the band.
pub const ISOLATED_CROSSTALK: f64 = 1.0e-12;

lazy_static! {
    /// Power-coupling coefficient per meter, `2 k^2 R / (beta * D)`.
    static ref POWER_COUPLING_COEFFICIENT: f64 =
        2.0 * COUPLING_COEFFICIENT.powi(2) * BENDING_RADIUS / (PROPAGATION_CONSTANT * CORE_PITCH);
}

/// Inter-core crosstalk estimator for multi-core fibers.
#[derive(Debug, Clone, Default)]
pub struct Crosstalk;

impl Crosstalk {
    pub fn new() -> Self {
        Crosstalk
    }

    /// Crosstalk in dB a band on `core` would suffer along `route`.
    ///
    /// For each link, every adjacent core leaks in proportionally to the
    /// fraction of its occupied slots that overlap the band and to the link
    /// length.
    pub fn crosstalk_db(&self, topology: &Topology, circuits: &CircuitStore, route: &Route, core: usize, band: SpectrumBand) -> Result<f64> {
        let mut crosstalk = 0.0;

        for link_id in &route.links {
            let link = topology.link(link_id)?;
            link.core(core)?;

            for adjacent in link.adjacent_cores(core) {
                let mut overlapping = 0u32;
                let mut occupied = 0u32;

                for &other_id in adjacent.circuits() {
                    let other = circuits.get(other_id).ok_or(Error::UnknownCircuit)?;
                    let other_band = other.placement()?.band;
                    if other_band.intersects(&band) {
                        overlapping += other_band.overlap(&band);
                        occupied += other_band.num_slots();
                    }
                }

                if occupied == 0 {
                    continue;
                }

                let isolation = overlapping as f64 / occupied as f64;
                let leaked_power = isolation * SIGNAL_POWER * *POWER_COUPLING_COEFFICIENT * link.distance_km * 1000.0;
                crosstalk += leaked_power / SIGNAL_POWER;
            }
        }

        if crosstalk == 0.0 {
            crosstalk = ISOLATED_CROSSTALK;
        }

        Ok(ratio_to_db(crosstalk))
    }

    /// Maximum tolerated crosstalk in dB per modulation format. Unknown
    /// formats get 0 dB.
    pub fn threshold_db(&self, modulation: &Modulation) -> f64 {
        match modulation.name.to_ascii_uppercase().as_str() {
            "BPSK" => -14.0,
            "QPSK" => -18.5,
            "8QAM" => -21.0,
            "16QAM" => -25.0,
            "32QAM" => -27.0,
            "64QAM" => -34.0,
            _ => 0.0,
        }
    }

    pub fn is_admissible(&self, modulation: &Modulation, crosstalk_db: f64) -> bool {
        crosstalk_db <= self.threshold_db(modulation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_coupling_coefficient() {
        assert!((*POWER_COUPLING_COEFFICIENT - 6.4e-9).abs() < 1e-12);
    }

    #[test]
    fn test_thresholds() {
        let crosstalk = Crosstalk::new();
        let modulation = |name: &str| Modulation::new(name, 2.0, 4.0, 6.8, 12.5e9, 0.07);

        assert_eq!(crosstalk.threshold_db(&modulation("QPSK")), -18.5);
        assert_eq!(crosstalk.threshold_db(&modulation("64QAM")), -34.0);
        assert_eq!(crosstalk.threshold_db(&modulation("Custom")), 0.0);
        assert!(crosstalk.is_admissible(&modulation("QPSK"), -120.0));
        assert!(!crosstalk.is_admissible(&modulation("QPSK"), -18.0));
    }
}
