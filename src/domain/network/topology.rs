use std::collections::{BTreeMap, HashMap, HashSet};

use crate::api::network_dto::NetworkDto;
use crate::domain::network::link::Link;
use crate::domain::network::node::{Node, TransceiverBank};
use crate::domain::network::route::Route;
use crate::domain::network::spectrum::{self, SpectrumBand};
use crate::domain::utils::id::{LinkId, NodeId};
use crate::error::{Error, Result};

/// Physical mesh: nodes, directed multi-core links and their adjacency.
///
/// All links share the same core count, slot count and slot bandwidth.
#[derive(Debug, Clone)]
pub struct Topology {
    nodes: BTreeMap<NodeId, Node>,

    pub links: HashMap<LinkId, Link>,

    /// Maps a `NodeId` to the set of its outgoing `LinkId`s.
    adjacency: HashMap<NodeId, HashSet<LinkId>>,

    num_cores: usize,
    num_slots: u32,
    /// Hz
    slot_bandwidth: f64,
    /// Guard band in slots between neighbouring bands on a core.
    guard_band: u32,
}

impl Topology {
    pub fn from_dto(dto: &NetworkDto) -> Result<Self> {
        if dto.cores_per_link == 0 {
            return Err(Error::ModelConstructionError("Links need at least one core".to_string()));
        }
        if dto.slots_per_core == 0 {
            return Err(Error::ModelConstructionError("Cores need at least one slot".to_string()));
        }

        // 1. Nodes with their transceiver pools.
        let nodes = Topology::setup_nodes(dto)?;

        // 2. Directed links, two per bidirectional fiber.
        let links = Topology::setup_links(dto, &nodes)?;

        // 3. Outgoing adjacency.
        let adjacency = Topology::setup_adjacency(&links, &nodes);

        log::info!(
            "Topology built: {} nodes, {} directed links, {} cores x {} slots of {} GHz.",
            nodes.len(),
            links.len(),
            dto.cores_per_link,
            dto.slots_per_core,
            dto.slot_bandwidth / 1e9
        );

        Ok(Topology {
            nodes,
            links,
            adjacency,
            num_cores: dto.cores_per_link,
            num_slots: dto.slots_per_core,
            slot_bandwidth: dto.slot_bandwidth,
            guard_band: dto.guard_band,
        })
    }

    pub fn setup_nodes(dto: &NetworkDto) -> Result<BTreeMap<NodeId, Node>> {
        let mut nodes = BTreeMap::new();

        for node_dto in &dto.nodes {
            let id = NodeId::new(node_dto.name.clone());
            let amplitude = node_dto.max_spectral_amplitude.unwrap_or(dto.slots_per_core);
            let node = Node::new(id.clone(), TransceiverBank::new(node_dto.transmitters, amplitude), TransceiverBank::new(node_dto.receivers, amplitude));

            if nodes.insert(id.clone(), node).is_some() {
                return Err(Error::ModelConstructionError(format!("Node {} is defined twice", id)));
            }
        }

        Ok(nodes)
    }

    pub fn setup_links(dto: &NetworkDto, nodes: &BTreeMap<NodeId, Node>) -> Result<HashMap<LinkId, Link>> {
        let mut links = HashMap::new();

        for link_dto in &dto.links {
            let source = NodeId::new(link_dto.source.clone());
            let target = NodeId::new(link_dto.destination.clone());

            for endpoint in [&source, &target] {
                if !nodes.contains_key(endpoint) {
                    return Err(Error::UnknownNode(endpoint.clone()));
                }
            }
            if source == target {
                return Err(Error::ModelConstructionError(format!("Link {} is a self loop", source)));
            }
            if link_dto.length <= 0.0 {
                return Err(Error::ModelConstructionError(format!("Link {} -> {} needs a positive length", source, target)));
            }

            let mut directions = vec![(source.clone(), target.clone())];
            if link_dto.bidirectional {
                directions.push((target, source));
            }

            for (from, to) in directions {
                let link = Link::new(from, to, link_dto.length, dto.cores_per_link, dto.slots_per_core);
                let id = link.id.clone();
                if links.insert(id.clone(), link).is_some() {
                    return Err(Error::ModelConstructionError(format!("Link {} is defined twice", id)));
                }
            }
        }

        Ok(links)
    }

    pub fn setup_adjacency(links: &HashMap<LinkId, Link>, nodes: &BTreeMap<NodeId, Node>) -> HashMap<NodeId, HashSet<LinkId>> {
        let mut adjacency: HashMap<NodeId, HashSet<LinkId>> = nodes.keys().map(|id| (id.clone(), HashSet::new())).collect();

        for link in links.values() {
            adjacency.entry(link.source.clone()).or_default().insert(link.id.clone());
        }

        adjacency
    }

    pub fn num_cores(&self) -> usize {
        self.num_cores
    }

    pub fn num_slots(&self) -> u32 {
        self.num_slots
    }

    pub fn slot_bandwidth(&self) -> f64 {
        self.slot_bandwidth
    }

    pub fn guard_band(&self) -> u32 {
        self.guard_band
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    pub fn node(&self, id: &NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or_else(|| Error::UnknownNode(id.clone()))
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or_else(|| Error::UnknownNode(id.clone()))
    }

    pub fn link(&self, id: &LinkId) -> Result<&Link> {
        self.links.get(id).ok_or_else(|| Error::UnknownLink(id.clone()))
    }

    pub fn link_mut(&mut self, id: &LinkId) -> Result<&mut Link> {
        self.links.get_mut(id).ok_or_else(|| Error::UnknownLink(id.clone()))
    }

    pub fn outgoing_links(&self, node: &NodeId) -> impl Iterator<Item = &LinkId> {
        self.adjacency.get(node).into_iter().flatten()
    }

    /// The directed link `source -> target`, if the fiber exists.
    pub fn link_between(&self, source: &NodeId, target: &NodeId) -> Option<&Link> {
        self.links.get(&LinkId::between(source, target))
    }

    /// Builds the route visiting `nodes` in order.
    pub fn route_through(&self, nodes: &[NodeId]) -> Result<Route> {
        if nodes.len() < 2 {
            return Err(Error::ModelConstructionError("A route needs at least two nodes".to_string()));
        }

        let mut links = Vec::with_capacity(nodes.len() - 1);
        let mut distance_km = 0.0;
        for hop in nodes.windows(2) {
            let link = self.link(&LinkId::between(&hop[0], &hop[1]))?;
            distance_km += link.distance_km;
            links.push(link.id.clone());
        }

        Ok(Route::new(nodes.to_vec(), links, distance_km))
    }

    /// Slots free on `core` of every link of `route`, with `guard_band` kept
    /// around occupied bands.
    pub fn route_free_spectrum(&self, route: &Route, core: usize, guard_band: u32) -> Result<Vec<SpectrumBand>> {
        let mut free: Option<Vec<SpectrumBand>> = None;

        for link_id in &route.links {
            let link_free = self.link(link_id)?.core(core)?.free_spectrum_bands(guard_band);
            free = Some(match free {
                None => link_free,
                Some(acc) => spectrum::merge(&acc, &link_free),
            });
        }

        Ok(free.unwrap_or_default())
    }

    /// Mean length of the fiber segment after the last in-line amplifier,
    /// over all links.
    pub fn average_last_fiber_segment(&self, span_length_km: f64) -> f64 {
        if self.links.is_empty() {
            return 0.0;
        }

        let total: f64 = self
            .links
            .values()
            .map(|link| {
                let line_amplifiers = ((link.distance_km / span_length_km) - 1.0).ceil().max(0.0);
                link.distance_km - line_amplifiers * span_length_km
            })
            .sum();

        total / self.links.len() as f64
    }

    /// Fraction of occupied slots over every core of every link.
    pub fn utilization(&self) -> f64 {
        if self.links.is_empty() {
            return 0.0;
        }
        let used: u64 = self.links.values().map(|link| link.used_slots() as u64).sum();
        let capacity = self.links.len() as u64 * self.num_cores as u64 * self.num_slots as u64;
        used as f64 / capacity as f64
    }
}
