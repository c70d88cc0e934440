use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::circuit::circuit::{Circuit, Placement};
use crate::domain::network::spectrum::SpectrumBand;
use crate::domain::rmlsa::context::RmlsaContext;
use crate::error::Result;

/// Random qualifying band, cores taken round robin.
#[derive(Debug, Clone)]
pub struct RandomFit {
    rng: StdRng,
    next_core: usize,
}

impl RandomFit {
    pub fn new(seed: u64) -> Self {
        RandomFit { rng: StdRng::seed_from_u64(seed), next_core: 0 }
    }

    pub fn assign_spectrum(&mut self, num_slots: u32, circuit: &Circuit, ctx: &RmlsaContext<'_>) -> Result<Option<Placement>> {
        let core = self.core_assignment(ctx.topology.num_cores());
        let free_bands = ctx.free_spectrum(circuit.route()?, core)?;
        Ok(self.policy(num_slots, &free_bands, circuit, ctx)?.map(|band| Placement::new(core, band)))
    }

    pub fn policy(&mut self, num_slots: u32, free_bands: &[SpectrumBand], circuit: &Circuit, ctx: &RmlsaContext<'_>) -> Result<Option<SpectrumBand>> {
        if ctx.exceeds_max_amplitude(num_slots, circuit)? {
            return Ok(None);
        }

        let candidates: Vec<&SpectrumBand> = free_bands.iter().filter(|band| band.num_slots() >= num_slots).collect();
        if candidates.is_empty() {
            return Ok(None);
        }

        let chosen = candidates[self.rng.random_range(0..candidates.len())];
        Ok(Some(SpectrumBand::starting_at(chosen.lo, num_slots)))
    }

    /// Core for this call; advances one step per call.
    fn core_assignment(&mut self, num_cores: usize) -> usize {
        let core = self.next_core % num_cores.max(1);
        self.next_core = (core + 1) % num_cores.max(1);
        core
    }
}
