use crate::domain::circuit::circuit::{Circuit, Placement};
use crate::domain::network::spectrum::SpectrumBand;
use crate::domain::rmlsa::context::RmlsaContext;
use crate::error::Result;

/// Exhaustive search over every core and every start slot for the placement
/// with the largest crosstalk margin below the modulation's threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct XtAwareGreedy;

impl XtAwareGreedy {
    pub fn assign_spectrum(&self, num_slots: u32, circuit: &Circuit, ctx: &RmlsaContext<'_>) -> Result<Option<Placement>> {
        let route = circuit.route()?;
        let mut best: Option<(Placement, f64)> = None;

        for core in 0..ctx.topology.num_cores() {
            let free_bands = ctx.free_spectrum(route, core)?;
            if let Some((band, slack)) = self.best_on_core(core, num_slots, &free_bands, circuit, ctx)? {
                if best.is_none_or(|(_, best_slack)| slack >= best_slack) {
                    best = Some((Placement::new(core, band), slack));
                }
            }
        }

        Ok(best.map(|(placement, _)| placement))
    }

    /// Best band on the circuit's current core (core 0 if unplaced).
    pub fn policy(&self, num_slots: u32, free_bands: &[SpectrumBand], circuit: &Circuit, ctx: &RmlsaContext<'_>) -> Result<Option<SpectrumBand>> {
        Ok(self.best_on_core(circuit.core_index(), num_slots, free_bands, circuit, ctx)?.map(|(band, _)| band))
    }

    /// Band on `core` with the largest crosstalk margin, and that margin in dB.
    ///
    /// A candidate only counts if its crosstalk is admissible. Ties go to the
    /// candidate seen last.
    fn best_on_core(
        &self,
        core: usize,
        num_slots: u32,
        free_bands: &[SpectrumBand],
        circuit: &Circuit,
        ctx: &RmlsaContext<'_>,
    ) -> Result<Option<(SpectrumBand, f64)>> {
        if num_slots == 0 || ctx.exceeds_max_amplitude(num_slots, circuit)? {
            return Ok(None);
        }

        let route = circuit.route()?;
        let modulation = circuit.modulation()?;
        let threshold = ctx.crosstalk.threshold_db(modulation);
        let mut best: Option<(SpectrumBand, f64)> = None;

        for free in free_bands.iter().filter(|free| free.num_slots() >= num_slots) {
            for lo in free.lo..=(free.hi + 1 - num_slots) {
                let band = SpectrumBand::starting_at(lo, num_slots);
                let crosstalk = ctx.crosstalk.crosstalk_db(ctx.topology, ctx.circuits, route, core, band)?;

                if crosstalk == 0.0 || !ctx.crosstalk.is_admissible(modulation, crosstalk) {
                    continue;
                }

                let slack = threshold - crosstalk;
                if best.is_none_or(|(_, best_slack)| slack >= best_slack) {
                    best = Some((band, slack));
                }
            }
        }

        Ok(best)
    }
}
