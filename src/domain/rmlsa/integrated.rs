use std::str::FromStr;
use std::sync::Arc;

use crate::domain::circuit::circuit::{Circuit, Placement};
use crate::domain::network::modulation::Modulation;
use crate::domain::network::route::Route;
use crate::domain::rmlsa::context::RmlsaContext;
use crate::domain::rmlsa::modulation_selection::ModulationSelection;
use crate::domain::rmlsa::spectrum_assignment::SpectrumAssignment;
use crate::domain::rmlsa::spectrum_assignment::first_fit::FirstFit;
use crate::error::{Error, Result};

/// Route, modulation and placement chosen in one step.
#[derive(Debug, Clone)]
pub struct RmlsaDecision {
    pub route: Arc<Route>,
    pub modulation: Modulation,
    /// `None` when no candidate route had room.
    pub placement: Option<Placement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegratedRmlsaType {
    CompleteSharing,
}

impl FromStr for IntegratedRmlsaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CompleteSharing" => Ok(IntegratedRmlsaType::CompleteSharing),
            _ => Err(Error::UnknownRmlsaType(s.to_string())),
        }
    }
}

impl IntegratedRmlsaType {
    /// `k` bounds the candidate routes the algorithm compares.
    pub fn get_instance(&self, k: usize) -> CompleteSharing {
        match self {
            IntegratedRmlsaType::CompleteSharing => CompleteSharing::new(k),
        }
    }
}

/// Over the first `k` candidate routes, keeps the one whose first-fit band
/// starts lowest in the spectrum.
#[derive(Debug, Clone)]
pub struct CompleteSharing {
    k: usize,
    spectrum_assignment: SpectrumAssignment,
}

impl CompleteSharing {
    pub const DEFAULT_K: usize = 3;

    pub fn new(k: usize) -> Self {
        CompleteSharing { k: k.max(1), spectrum_assignment: SpectrumAssignment::FirstFit(FirstFit) }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn rsa(&mut self, circuit: &Circuit, modulation_selection: &ModulationSelection, ctx: &RmlsaContext<'_>) -> Result<Option<RmlsaDecision>> {
        let candidate_routes = ctx.routing.routes(&circuit.source, &circuit.destination);
        let Some(first_route) = candidate_routes.first().cloned() else {
            return Ok(None);
        };

        let mut chosen: Option<RmlsaDecision> = None;

        for route in candidate_routes.into_iter().take(self.k) {
            let choice = modulation_selection.select_modulation(circuit, &route, &mut self.spectrum_assignment, ctx)?;
            let core = choice.placement.map_or(0, |placement| placement.core);

            let trial = circuit.trial(route.clone(), choice.modulation.clone(), choice.placement);
            let free_bands = ctx.free_spectrum(&route, core)?;
            let slots = choice.modulation.required_slots(circuit.bit_rate);

            let Some(band) = self.spectrum_assignment.policy(slots, &free_bands, &trial, ctx)? else {
                continue;
            };

            let lower = chosen.as_ref().and_then(|decision| decision.placement).is_none_or(|placement| band.lo < placement.band.lo);
            if lower {
                chosen = Some(RmlsaDecision { route, modulation: choice.modulation, placement: Some(Placement::new(core, band)) });
            }
        }

        if chosen.is_none() {
            let first_modulation = ctx.modulations.first().cloned().ok_or_else(|| Error::ModelConstructionError("The modulation catalog is empty".to_string()))?;
            chosen = Some(RmlsaDecision { route: first_route, modulation: first_modulation, placement: None });
        }

        Ok(chosen)
    }
}

impl Default for CompleteSharing {
    fn default() -> Self {
        CompleteSharing::new(Self::DEFAULT_K)
    }
}
