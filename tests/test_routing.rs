mod fixtures;

use fixtures::*;
use sdm_eon_sim::domain::network::topology::Topology;
use sdm_eon_sim::domain::rmlsa::routing::{KShortestPaths, RoutingProvider};
use sdm_eon_sim::domain::utils::id::NodeId;

fn names(nodes: &[NodeId]) -> Vec<&str> {
    nodes.iter().map(|id| id.as_str()).collect()
}

#[test]
fn test_routes_ranked_by_distance() {
    let topology = Topology::from_dto(&triangle_network()).unwrap();
    let routing = KShortestPaths::new(&topology, 3);

    let routes = routing.routes(&NodeId::new("A"), &NodeId::new("C"));
    assert_eq!(routes.len(), 2);
    assert_eq!(names(&routes[0].nodes), vec!["A", "B", "C"]);
    assert_eq!(routes[0].distance_km, 600.0);
    assert_eq!(names(&routes[1].nodes), vec!["A", "C"]);
    assert_eq!(routes[1].hops(), 1);
}

#[test]
fn test_k_limits_breadth_first_candidates() {
    let topology = Topology::from_dto(&triangle_network()).unwrap();

    // Breadth first finds the one-hop route first, even though the two-hop one is shorter.
    let routes = KShortestPaths::calc_k_shortest_paths(&topology, &NodeId::new("A"), &NodeId::new("C"), 1);
    assert_eq!(routes.len(), 1);
    assert_eq!(names(&routes[0].nodes), vec!["A", "C"]);
}

#[test]
fn test_routes_are_loop_free_and_cover_all_pairs() {
    let topology = Topology::from_dto(&triangle_network()).unwrap();
    let routing = KShortestPaths::new(&topology, 5);

    let all = routing.routes_for_all_pairs();
    assert_eq!(all.len(), 12);
    for route in &all {
        let mut visited = route.nodes.clone();
        visited.sort();
        visited.dedup();
        assert_eq!(visited.len(), route.nodes.len(), "route {:?} revisits a node", names(&route.nodes));
        assert_eq!(route.links.len(), route.hops());
    }
}

#[test]
fn test_unconnected_pair_has_no_route() {
    let mut network = two_node_network(100.0);
    network.nodes.push(node("Island"));
    let topology = Topology::from_dto(&network).unwrap();
    let routing = KShortestPaths::new(&topology, 3);

    assert!(routing.routes(&NodeId::new("A"), &NodeId::new("Island")).is_empty());
    assert_eq!(routing.routes(&NodeId::new("A"), &NodeId::new("B")).len(), 1);
}
