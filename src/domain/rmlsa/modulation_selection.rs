use std::str::FromStr;
use std::sync::Arc;

use crate::domain::circuit::circuit::{Circuit, Placement};
use crate::domain::network::modulation::Modulation;
use crate::domain::network::route::Route;
use crate::domain::physical_layer::physical_layer::InterferenceProbe;
use crate::domain::rmlsa::context::RmlsaContext;
use crate::domain::rmlsa::spectrum_assignment::SpectrumAssignment;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModulationSelection {
    /// Densest format whose reach covers the route length.
    ByDistanceAndBandwidth,
    /// Format whose tentative placement passes the QoT check.
    ByQoT,
}

impl FromStr for ModulationSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ByDistanceAndBandwidth" | "ModulationSelectionByDistanceAndBandwidth" => Ok(ModulationSelection::ByDistanceAndBandwidth),
            "ByQoT" | "ModulationSelectionByQoT" => Ok(ModulationSelection::ByQoT),
            _ => Err(Error::UnknownModulationSelection(s.to_string())),
        }
    }
}

/// Result of a modulation selection.
#[derive(Debug, Clone)]
pub struct ModulationChoice {
    pub modulation: Modulation,
    /// Tentative placement found while selecting, if the strategy assigns spectrum.
    pub placement: Option<Placement>,
    /// Whether the tentative placement passed the QoT check.
    pub qot: bool,
    pub snr_db: Option<f64>,
}

impl ModulationChoice {
    fn without_placement(modulation: Modulation) -> Self {
        ModulationChoice { modulation, placement: None, qot: false, snr_db: None }
    }
}

impl ModulationSelection {
    /// Picks a modulation for `circuit` on `route`.
    ///
    /// Never fails for lack of a qualifying format: the first catalog entry
    /// (or the first spectrum-feasible one for `ByQoT`) is the fallback.
    pub fn select_modulation(
        &self,
        circuit: &Circuit,
        route: &Arc<Route>,
        spectrum_assignment: &mut SpectrumAssignment,
        ctx: &RmlsaContext<'_>,
    ) -> Result<ModulationChoice> {
        let first = ctx.modulations.first().cloned().ok_or_else(|| Error::ModelConstructionError("The modulation catalog is empty".to_string()))?;

        match self {
            ModulationSelection::ByDistanceAndBandwidth => {
                Ok(ModulationChoice::without_placement(by_distance_and_bandwidth(circuit.bit_rate, route, ctx).unwrap_or(first)))
            }
            ModulationSelection::ByQoT => {
                Ok(by_qot(circuit, route, spectrum_assignment, ctx)?.unwrap_or_else(|| ModulationChoice::without_placement(first)))
            }
        }
    }
}

/// Format with the most bits per symbol among those whose reach at
/// `bit_rate` covers the route. Earlier catalog entries win ties.
pub fn by_distance_and_bandwidth(bit_rate: f64, route: &Route, ctx: &RmlsaContext<'_>) -> Option<Modulation> {
    let mut chosen: Option<&Modulation> = None;

    for modulation in ctx.modulations {
        if ctx.reach_table.reach_km(modulation, bit_rate) < route.distance_km {
            continue;
        }
        if chosen.is_none_or(|best| modulation.bits_per_symbol > best.bits_per_symbol) {
            chosen = Some(modulation);
        }
    }

    chosen.cloned()
}

/// Tries every format in catalog order with a tentative placement.
///
/// The last format whose placement passes QoT wins. If none passes, the
/// first format that found spectrum at all is returned with `qot == false`.
fn by_qot(circuit: &Circuit, route: &Arc<Route>, spectrum_assignment: &mut SpectrumAssignment, ctx: &RmlsaContext<'_>) -> Result<Option<ModulationChoice>> {
    let mut chosen: Option<ModulationChoice> = None;
    let mut alternative: Option<ModulationChoice> = None;

    for modulation in ctx.modulations {
        let slots = modulation.required_slots(circuit.bit_rate);
        let mut trial = circuit.trial(route.clone(), modulation.clone(), None);

        let Some(placement) = spectrum_assignment.assign_spectrum(slots, &trial, ctx)? else {
            continue;
        };
        trial.placement = Some(placement);

        if alternative.is_none() {
            alternative = Some(ModulationChoice { modulation: modulation.clone(), placement: Some(placement), qot: false, snr_db: None });
        }

        let (admissible, snr_db) = ctx.physical_layer.is_admissible_modulation(ctx.topology, ctx.circuits, &trial, None, InterferenceProbe::None)?;
        if admissible {
            chosen = Some(ModulationChoice { modulation: modulation.clone(), placement: Some(placement), qot: true, snr_db: Some(snr_db) });
        }
    }

    Ok(chosen.or(alternative))
}
