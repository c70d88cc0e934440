use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::domain::network::modulation::Modulation;
use crate::domain::network::route::Route;
use crate::domain::network::spectrum::SpectrumBand;
use crate::domain::utils::id::{LinkId, NodeId};
use crate::error::{Error, Result};

/// Why a connection request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BlockCause {
    /// No free transmitter at the source node.
    LackTx,
    /// No free receiver at the destination node.
    LackRx,
    /// The new circuit itself would not meet its QoT threshold.
    QotN,
    /// Admitting the circuit would push an active circuit below its QoT threshold.
    QotO,
    /// Inter-core crosstalk above the modulation threshold.
    Crosstalk,
    /// Enough total free spectrum along the route, but no contiguous band.
    Fragmentation,
    Other,
}

impl BlockCause {
    pub const ALL: [BlockCause; 7] =
        [BlockCause::LackTx, BlockCause::LackRx, BlockCause::QotN, BlockCause::QotO, BlockCause::Crosstalk, BlockCause::Fragmentation, BlockCause::Other];
}

impl fmt::Display for BlockCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockCause::LackTx => "LACK_TX",
            BlockCause::LackRx => "LACK_RX",
            BlockCause::QotN => "QOTN",
            BlockCause::QotO => "QOTO",
            BlockCause::Crosstalk => "CROSSTALK",
            BlockCause::Fragmentation => "FRAGMENTATION",
            BlockCause::Other => "OTHER",
        };
        write!(f, "{}", name)
    }
}

/// Core index and slot band a circuit occupies on every link of its route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub core: usize,
    pub band: SpectrumBand,
}

impl Placement {
    pub fn new(core: usize, band: SpectrumBand) -> Self {
        Placement { core, band }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "core {} slots {}", self.core, self.band)
    }
}

/// A lightpath: a connection request while it is being admitted, and the
/// committed connection once it is active.
///
/// The same band and core are used on every link of the route.
#[derive(Debug, Clone)]
pub struct Circuit {
    pub source: NodeId,
    pub destination: NodeId,
    /// bit/s
    pub bit_rate: f64,

    pub route: Option<Arc<Route>>,
    pub modulation: Option<Modulation>,
    pub placement: Option<Placement>,

    /// Overrides the configured launch power (linear, W).
    pub launch_power: Option<f64>,

    /// Last computed SNR in dB.
    pub snr_db: f64,
    pub qot: bool,
    /// `false` once admitting this circuit was found to break an active one.
    pub qot_for_other: bool,

    /// Last computed crosstalk in dB.
    pub xt_db: f64,
    /// `false` once the crosstalk check failed.
    pub xt_admissible: bool,

    pub block_cause: Option<BlockCause>,
}

impl Circuit {
    pub fn new(source: NodeId, destination: NodeId, bit_rate: f64) -> Self {
        Circuit {
            source,
            destination,
            bit_rate,
            route: None,
            modulation: None,
            placement: None,
            launch_power: None,
            snr_db: f64::NEG_INFINITY,
            qot: false,
            qot_for_other: true,
            xt_db: f64::NEG_INFINITY,
            xt_admissible: true,
            block_cause: None,
        }
    }

    /// Short human-readable label for logs and errors.
    pub fn label(&self) -> String {
        format!("{} -> {} @ {} Gb/s", self.source, self.destination, self.bit_rate / 1e9)
    }

    pub fn route(&self) -> Result<&Arc<Route>> {
        self.route.as_ref().ok_or_else(|| Error::MissingRoute(self.label()))
    }

    pub fn modulation(&self) -> Result<&Modulation> {
        self.modulation.as_ref().ok_or_else(|| Error::MissingModulation(self.label()))
    }

    pub fn placement(&self) -> Result<Placement> {
        self.placement.ok_or_else(|| Error::MissingPlacement(self.label()))
    }

    /// Core index, or 0 while the circuit has no placement.
    pub fn core_index(&self) -> usize {
        self.placement.map_or(0, |placement| placement.core)
    }

    pub fn uses_link(&self, link: &LinkId) -> bool {
        self.route.as_ref().is_some_and(|route| route.contains_link(link))
    }

    /// Copy of this circuit evaluated with a different choice, leaving `self` untouched.
    pub fn trial(&self, route: Arc<Route>, modulation: Modulation, placement: Option<Placement>) -> Circuit {
        let mut trial = self.clone();
        trial.route = Some(route);
        trial.modulation = Some(modulation);
        trial.placement = placement;
        trial
    }
}
