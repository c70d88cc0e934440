use serde::Serialize;
use std::io;

use crate::domain::circuit::circuit::BlockCause;
use crate::domain::simulation::replication::ReplicationSummary;
use crate::error::Result;

/// One CSV row per replication.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplicationRecord {
    replication: usize,
    seed: u64,
    requests: usize,
    established: usize,
    released: usize,
    blocking_probability: f64,
    lack_tx: usize,
    lack_rx: usize,
    qotn: usize,
    qoto: usize,
    crosstalk: usize,
    fragmentation: usize,
    other: usize,
    data_transmitted_gbps: f64,
    utilization: f64,
}

impl From<&ReplicationSummary> for ReplicationRecord {
    fn from(summary: &ReplicationSummary) -> Self {
        ReplicationRecord {
            replication: summary.replication,
            seed: summary.seed,
            requests: summary.requests,
            established: summary.established,
            released: summary.released,
            blocking_probability: summary.blocking_probability(),
            lack_tx: summary.blocked_by(BlockCause::LackTx),
            lack_rx: summary.blocked_by(BlockCause::LackRx),
            qotn: summary.blocked_by(BlockCause::QotN),
            qoto: summary.blocked_by(BlockCause::QotO),
            crosstalk: summary.blocked_by(BlockCause::Crosstalk),
            fragmentation: summary.blocked_by(BlockCause::Fragmentation),
            other: summary.blocked_by(BlockCause::Other),
            data_transmitted_gbps: summary.data_transmitted / 1e9,
            utilization: summary.utilization,
        }
    }
}

/// Writes the summaries as `;`-separated CSV with a header row to `writer`.
pub fn write_summaries<W: io::Write>(writer: W, summaries: &[ReplicationSummary]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);

    for summary in summaries {
        csv_writer.serialize(ReplicationRecord::from(summary))?;
    }

    csv_writer.flush()?;
    Ok(())
}
