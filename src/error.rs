use thiserror::Error;

use crate::domain::network::spectrum::SpectrumBand;
use crate::domain::utils::id::{LinkId, NodeId};

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to write results: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Failed to build network model: {0}")]
    ModelConstructionError(String),

    #[error("Unknown spectrum assignment policy: {0}")]
    UnknownSpectrumAssignment(String),

    #[error("Unknown modulation selection strategy: {0}")]
    UnknownModulationSelection(String),

    #[error("Unknown RMLSA type: {0}")]
    UnknownRmlsaType(String),

    #[error("Node {0} does not exist in the topology")]
    UnknownNode(NodeId),

    #[error("Link {0} does not exist in the topology")]
    UnknownLink(LinkId),

    #[error("Core {core} is out of range on link {link} ({num_cores} cores)")]
    CoreOutOfRange { link: LinkId, core: usize, num_cores: usize },

    #[error("Circuit is not registered as active")]
    UnknownCircuit,

    #[error("Circuit {0} has no route")]
    MissingRoute(String),

    #[error("Circuit {0} has no modulation")]
    MissingModulation(String),

    #[error("Circuit {0} has no core/spectrum placement")]
    MissingPlacement(String),

    #[error("No free transceiver left at node {0}")]
    TransceiverExhausted(NodeId),

    #[error("Replication {0} panicked")]
    ReplicationPanicked(usize),

    #[error("Bad RMLSA choice: spectrum {band} on core {core} of link {link} is not free")]
    SpectrumConflict { link: LinkId, core: usize, band: SpectrumBand },

    #[error("Released circuit did not hold spectrum {band} on core {core} of link {link}")]
    InconsistentRelease { link: LinkId, core: usize, band: SpectrumBand },
}

pub type Result<T> = std::result::Result<T, Error>;
