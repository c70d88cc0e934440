use std::collections::{BTreeMap, VecDeque};
use std::fmt::Debug;
use std::sync::Arc;

use crate::domain::network::route::Route;
use crate::domain::network::topology::Topology;
use crate::domain::utils::id::{LinkId, NodeId};

/// Source of candidate routes between node pairs.
pub trait RoutingProvider: Debug {
    /// Candidate routes from `source` to `destination`, best first.
    fn routes(&self, source: &NodeId, destination: &NodeId) -> Vec<Arc<Route>>;

    /// Every cached route of every ordered node pair.
    fn routes_for_all_pairs(&self) -> Vec<Arc<Route>>;
}

/// Caches up to `k` loop-free routes per ordered node pair.
///
/// Routes are enumerated breadth first (fewest hops first) and the `k`
/// found are then ranked by length.
#[derive(Debug, Clone)]
pub struct KShortestPaths {
    k: usize,

    /// A cache storing the calculated routes between pairs of nodes.
    path_cache: BTreeMap<(NodeId, NodeId), Vec<Arc<Route>>>,
}

impl KShortestPaths {
    pub fn new(topology: &Topology, k: usize) -> Self {
        let mut path_cache = BTreeMap::new();
        let node_ids: Vec<NodeId> = topology.node_ids().cloned().collect();

        for source in &node_ids {
            for target in &node_ids {
                if source == target {
                    continue;
                }
                let routes = KShortestPaths::calc_k_shortest_paths(topology, source, target, k);
                if routes.is_empty() {
                    log::warn!("No route found: {} => {}", source, target);
                    continue;
                }
                path_cache.insert((source.clone(), target.clone()), routes.into_iter().map(Arc::new).collect());
            }
        }

        log::info!("Routing table built: {} node pairs, up to {} routes each.", path_cache.len(), k);
        KShortestPaths { k, path_cache }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Breadth-first enumeration of loop-free routes from `source` to `target`.
    ///
    /// # Returns
    /// At most `k` routes ordered by distance, then hop count.
    pub fn calc_k_shortest_paths(topology: &Topology, source: &NodeId, target: &NodeId, k: usize) -> Vec<Route> {
        let mut found_solutions: Vec<Vec<LinkId>> = Vec::new();
        let mut queue: VecDeque<Vec<LinkId>> = VecDeque::new();

        for link_id in topology.outgoing_links(source) {
            queue.push_back(vec![link_id.clone()]);
        }

        while let Some(current_path) = queue.pop_front() {
            if found_solutions.len() >= k {
                break;
            }

            let Some(last_link) = current_path.last().and_then(|id| topology.link(id).ok()) else {
                continue;
            };

            if &last_link.target == target {
                found_solutions.push(current_path);
                continue;
            }

            for outgoing_link_id in topology.outgoing_links(&last_link.target) {
                let Ok(outgoing_link) = topology.link(outgoing_link_id) else {
                    continue;
                };

                let is_loop = current_path
                    .iter()
                    .filter_map(|old_part_id| topology.link(old_part_id).ok())
                    .any(|old_part| old_part.source == outgoing_link.target);

                if !is_loop {
                    let mut new_path = current_path.clone();
                    new_path.push(outgoing_link_id.clone());
                    queue.push_back(new_path);
                }
            }
        }

        let mut routes: Vec<Route> = found_solutions
            .into_iter()
            .filter_map(|links| {
                let mut nodes = vec![source.clone()];
                let mut distance_km = 0.0;
                for link_id in &links {
                    let link = topology.link(link_id).ok()?;
                    nodes.push(link.target.clone());
                    distance_km += link.distance_km;
                }
                Some(Route::new(nodes, links, distance_km))
            })
            .collect();

        routes.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km).then(a.hops().cmp(&b.hops())));
        routes
    }
}

impl RoutingProvider for KShortestPaths {
    fn routes(&self, source: &NodeId, destination: &NodeId) -> Vec<Arc<Route>> {
        self.path_cache.get(&(source.clone(), destination.clone())).cloned().unwrap_or_default()
    }

    fn routes_for_all_pairs(&self) -> Vec<Arc<Route>> {
        self.path_cache.values().flatten().cloned().collect()
    }
}
