use crate::domain::circuit::circuit::{Circuit, Placement};
use crate::domain::network::spectrum::SpectrumBand;
use crate::domain::rmlsa::context::RmlsaContext;
use crate::domain::rmlsa::spectrum_assignment::first_fit::first_fit;
use crate::error::Result;

/// Fixed core visiting order of the seven-core layout.
const CORE_PRIORITY: [usize; 7] = [6, 4, 2, 3, 1, 5, 0];

/// First fit on a core taken from a fixed priority rotation.
///
/// Each call advances the rotation one step, whether or not a band is found.
/// Cores the fiber does not have are skipped.
#[derive(Debug, Clone, Default)]
pub struct CorePrioritizationFirstFit {
    counter: usize,
}

impl CorePrioritizationFirstFit {
    pub fn new() -> Self {
        CorePrioritizationFirstFit { counter: 0 }
    }

    pub fn assign_spectrum(&mut self, num_slots: u32, circuit: &Circuit, ctx: &RmlsaContext<'_>) -> Result<Option<Placement>> {
        let core = self.core_assignment(ctx.topology.num_cores());
        let free_bands = ctx.free_spectrum(circuit.route()?, core)?;
        Ok(self.policy(num_slots, &free_bands, circuit, ctx)?.map(|band| Placement::new(core, band)))
    }

    pub fn policy(&self, num_slots: u32, free_bands: &[SpectrumBand], circuit: &Circuit, ctx: &RmlsaContext<'_>) -> Result<Option<SpectrumBand>> {
        if ctx.exceeds_max_amplitude(num_slots, circuit)? {
            return Ok(None);
        }
        Ok(first_fit(num_slots, free_bands))
    }

    pub fn core_assignment(&mut self, num_cores: usize) -> usize {
        let order: Vec<usize> = CORE_PRIORITY.iter().copied().filter(|core| *core < num_cores).collect();
        if order.is_empty() {
            return 0;
        }

        let core = order[self.counter % order.len()];
        self.counter = (self.counter + 1) % order.len();
        core
    }
}
