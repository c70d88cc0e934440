use std::hash::{Hash, Hasher};

use crate::domain::utils::id::{LinkId, NodeId};

/// Ordered path of links between a source and a destination node.
#[derive(Debug, Clone)]
pub struct Route {
    pub nodes: Vec<NodeId>,
    pub links: Vec<LinkId>,
    pub distance_km: f64,
}

impl Route {
    pub fn new(nodes: Vec<NodeId>, links: Vec<LinkId>, distance_km: f64) -> Self {
        debug_assert_eq!(nodes.len(), links.len() + 1, "A route with n links visits n + 1 nodes");
        Route { nodes, links, distance_km }
    }

    pub fn source(&self) -> &NodeId {
        &self.nodes[0]
    }

    pub fn destination(&self) -> &NodeId {
        &self.nodes[self.nodes.len() - 1]
    }

    pub fn hops(&self) -> usize {
        self.links.len()
    }

    pub fn contains_link(&self, link: &LinkId) -> bool {
        self.links.contains(link)
    }

    /// `true` if both routes share at least one link.
    pub fn shares_link_with(&self, other: &Route) -> bool {
        self.links.iter().any(|link| other.contains_link(link))
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.links == other.links && self.nodes == other.nodes
    }
}

impl Eq for Route {}

impl Hash for Route {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.nodes.hash(state);
        self.links.hash(state);
    }
}
