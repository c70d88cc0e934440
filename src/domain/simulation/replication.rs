use std::collections::{BTreeMap, HashMap};
use std::thread;

use crate::api::config_dto::ConfigDto;
use crate::api::scenario_dto::{EventDto, ScenarioDto};
use crate::domain::circuit::circuit::{BlockCause, Circuit};
use crate::domain::circuit::circuit_store::CircuitId;
use crate::domain::control_plane::control_plane::{AdmissionOutcome, ControlPlane};
use crate::domain::utils::id::{NodeId, RequestName};
use crate::error::{Error, Result};

/// Counters of one replication of a scenario.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplicationSummary {
    pub replication: usize,
    pub seed: u64,
    pub requests: usize,
    pub established: usize,
    pub released: usize,
    pub blocked: BTreeMap<BlockCause, usize>,
    /// Sum of the bit rates still active at the end, bit/s.
    pub data_transmitted: f64,
    /// Spectrum utilization at the end.
    pub utilization: f64,
}

impl ReplicationSummary {
    pub fn blocked_total(&self) -> usize {
        self.blocked.values().sum()
    }

    pub fn blocked_by(&self, cause: BlockCause) -> usize {
        self.blocked.get(&cause).copied().unwrap_or(0)
    }

    pub fn blocking_probability(&self) -> f64 {
        if self.requests == 0 {
            return 0.0;
        }
        self.blocked_total() as f64 / self.requests as f64
    }
}

/// Replays `scenario` on a fresh control plane built from `config`.
///
/// Releases of unknown or blocked request ids are skipped with a warning.
pub fn run_replication(config: &ConfigDto, scenario: &ScenarioDto, replication: usize) -> Result<ReplicationSummary> {
    let seed = config.simulation.seed.wrapping_add(replication as u64);
    let mut control_plane = ControlPlane::from_config(config, seed)?;

    let bit_rates: Vec<f64> = scenario
        .events
        .iter()
        .filter_map(|event| match event {
            EventDto::Establish { bit_rate, .. } => Some(*bit_rate),
            EventDto::Release { .. } => None,
        })
        .collect();
    control_plane.register_bit_rates(&bit_rates);

    let mut summary = ReplicationSummary { replication, seed, ..ReplicationSummary::default() };
    let mut active: HashMap<RequestName, CircuitId> = HashMap::new();

    for event in &scenario.events {
        match event {
            EventDto::Establish { id, source, destination, bit_rate } => {
                let name = RequestName::new(id.clone());
                if active.contains_key(&name) {
                    log::warn!("Replication {}: request {} is already active, ignored.", replication, id);
                    continue;
                }

                summary.requests += 1;
                let circuit = Circuit::new(NodeId::new(source.clone()), NodeId::new(destination.clone()), *bit_rate);
                match control_plane.establish_circuit(circuit)? {
                    AdmissionOutcome::Established(key) => {
                        summary.established += 1;
                        active.insert(name, key);
                    }
                    AdmissionOutcome::Blocked(circuit) => {
                        let cause = circuit.block_cause.unwrap_or(BlockCause::Other);
                        *summary.blocked.entry(cause).or_insert(0) += 1;
                    }
                }
            }
            EventDto::Release { id } => match active.remove(&RequestName::new(id.clone())) {
                Some(key) => {
                    control_plane.release_circuit(key)?;
                    summary.released += 1;
                }
                None => log::warn!("Replication {}: request {} is not active, release ignored.", replication, id),
            },
        }
    }

    summary.data_transmitted = control_plane.data_transmitted();
    summary.utilization = control_plane.utilization();
    Ok(summary)
}

/// Runs `replications` independent replications, one OS thread each.
///
/// Replication `i` is seeded with `seed + i`. Summaries come back in
/// replication order.
pub fn run_replications(config: &ConfigDto, scenario: &ScenarioDto, replications: usize) -> Result<Vec<ReplicationSummary>> {
    log::info!("Starting {} replications of {} events.", replications, scenario.events.len());

    let results: Vec<Result<ReplicationSummary>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..replications).map(|replication| scope.spawn(move || run_replication(config, scenario, replication))).collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(replication, handle)| handle.join().unwrap_or(Err(Error::ReplicationPanicked(replication))))
            .collect()
    });

    let summaries = results.into_iter().collect::<Result<Vec<ReplicationSummary>>>()?;
    for summary in &summaries {
        log::info!(
            "Replication {} finished: {}/{} established, blocking probability {:.4}.",
            summary.replication,
            summary.established,
            summary.requests,
            summary.blocking_probability()
        );
    }

    Ok(summaries)
}
