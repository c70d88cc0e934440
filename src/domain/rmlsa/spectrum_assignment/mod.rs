pub mod core_prioritization_first_fit;
pub mod first_fit;
pub mod first_last_exact_fit;
pub mod last_fit;
pub mod random_fit;
pub mod xt_aware_greedy;

use std::str::FromStr;

use crate::domain::circuit::circuit::{Circuit, Placement};
use crate::domain::network::spectrum::SpectrumBand;
use crate::domain::rmlsa::context::RmlsaContext;
use crate::error::{Error, Result};

use core_prioritization_first_fit::CorePrioritizationFirstFit;
use first_fit::FirstFit;
use first_last_exact_fit::FirstLastExactFit;
use last_fit::LastFit;
use random_fit::RandomFit;
use xt_aware_greedy::XtAwareGreedy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectrumAssignmentType {
    FirstFit,
    LastFit,
    RandomFit,
    FirstLastExactFit,
    CorePrioritizationFirstFit,
    XtAwareGreedyAlgorithm,
}

impl FromStr for SpectrumAssignmentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "FirstFit" => Ok(SpectrumAssignmentType::FirstFit),
            "LastFit" => Ok(SpectrumAssignmentType::LastFit),
            "RandomFit" => Ok(SpectrumAssignmentType::RandomFit),
            "FirstLastExactFit" => Ok(SpectrumAssignmentType::FirstLastExactFit),
            "CorePrioritizationFirstFit" => Ok(SpectrumAssignmentType::CorePrioritizationFirstFit),
            "XtAwareGreedyAlgorithm" => Ok(SpectrumAssignmentType::XtAwareGreedyAlgorithm),
            _ => Err(Error::UnknownSpectrumAssignment(s.to_string())),
        }
    }
}

impl SpectrumAssignmentType {
    /// Creates a fresh policy. `seed` drives the randomized policies.
    pub fn get_instance(&self, seed: u64) -> SpectrumAssignment {
        match self {
            SpectrumAssignmentType::FirstFit => SpectrumAssignment::FirstFit(FirstFit),
            SpectrumAssignmentType::LastFit => SpectrumAssignment::LastFit(LastFit),
            SpectrumAssignmentType::RandomFit => SpectrumAssignment::RandomFit(RandomFit::new(seed)),
            SpectrumAssignmentType::FirstLastExactFit => SpectrumAssignment::FirstLastExactFit(FirstLastExactFit::new()),
            SpectrumAssignmentType::CorePrioritizationFirstFit => SpectrumAssignment::CorePrioritizationFirstFit(CorePrioritizationFirstFit::new()),
            SpectrumAssignmentType::XtAwareGreedyAlgorithm => SpectrumAssignment::XtAwareGreedy(XtAwareGreedy),
        }
    }
}

/// Core and spectrum assignment policy.
///
/// `assign_spectrum` picks a core and a band for a circuit whose route is
/// set. `policy` picks a band from an already merged free list for callers
/// that fixed the core themselves. Neither touches the network.
#[derive(Debug, Clone)]
pub enum SpectrumAssignment {
    FirstFit(FirstFit),
    LastFit(LastFit),
    RandomFit(RandomFit),
    FirstLastExactFit(FirstLastExactFit),
    CorePrioritizationFirstFit(CorePrioritizationFirstFit),
    XtAwareGreedy(XtAwareGreedy),
}

impl SpectrumAssignment {
    pub fn assign_spectrum(&mut self, num_slots: u32, circuit: &Circuit, ctx: &RmlsaContext<'_>) -> Result<Option<Placement>> {
        let placement = match self {
            SpectrumAssignment::FirstFit(policy) => policy.assign_spectrum(num_slots, circuit, ctx),
            SpectrumAssignment::LastFit(policy) => policy.assign_spectrum(num_slots, circuit, ctx),
            SpectrumAssignment::RandomFit(policy) => policy.assign_spectrum(num_slots, circuit, ctx),
            SpectrumAssignment::FirstLastExactFit(policy) => policy.assign_spectrum(num_slots, circuit, ctx),
            SpectrumAssignment::CorePrioritizationFirstFit(policy) => policy.assign_spectrum(num_slots, circuit, ctx),
            SpectrumAssignment::XtAwareGreedy(policy) => policy.assign_spectrum(num_slots, circuit, ctx),
        }?;

        log::trace!("{} slots for {}: {:?}", num_slots, circuit.label(), placement);
        Ok(placement)
    }

    pub fn policy(&mut self, num_slots: u32, free_bands: &[SpectrumBand], circuit: &Circuit, ctx: &RmlsaContext<'_>) -> Result<Option<SpectrumBand>> {
        match self {
            SpectrumAssignment::FirstFit(policy) => policy.policy(num_slots, free_bands, circuit, ctx),
            SpectrumAssignment::LastFit(policy) => policy.policy(num_slots, free_bands, circuit, ctx),
            SpectrumAssignment::RandomFit(policy) => policy.policy(num_slots, free_bands, circuit, ctx),
            SpectrumAssignment::FirstLastExactFit(policy) => policy.policy(num_slots, free_bands, circuit, ctx),
            SpectrumAssignment::CorePrioritizationFirstFit(policy) => policy.policy(num_slots, free_bands, circuit, ctx),
            SpectrumAssignment::XtAwareGreedy(policy) => policy.policy(num_slots, free_bands, circuit, ctx),
        }
    }
}
