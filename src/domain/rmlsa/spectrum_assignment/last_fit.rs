use crate::domain::circuit::circuit::{Circuit, Placement};
use crate::domain::network::spectrum::SpectrumBand;
use crate::domain::rmlsa::context::RmlsaContext;
use crate::error::Result;

/// Highest-indexed free band on core 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastFit;

impl LastFit {
    const CORE: usize = 0;

    pub fn assign_spectrum(&self, num_slots: u32, circuit: &Circuit, ctx: &RmlsaContext<'_>) -> Result<Option<Placement>> {
        let free_bands = ctx.free_spectrum(circuit.route()?, Self::CORE)?;
        Ok(self.policy(num_slots, &free_bands, circuit, ctx)?.map(|band| Placement::new(Self::CORE, band)))
    }

    pub fn policy(&self, num_slots: u32, free_bands: &[SpectrumBand], circuit: &Circuit, ctx: &RmlsaContext<'_>) -> Result<Option<SpectrumBand>> {
        if ctx.exceeds_max_amplitude(num_slots, circuit)? {
            return Ok(None);
        }
        Ok(last_fit(num_slots, free_bands))
    }
}

/// The highest `num_slots` slots of the last free band wide enough.
pub fn last_fit(num_slots: u32, free_bands: &[SpectrumBand]) -> Option<SpectrumBand> {
    free_bands.iter().rev().find(|band| band.num_slots() >= num_slots).map(|band| SpectrumBand::ending_at(band.hi, num_slots))
}
