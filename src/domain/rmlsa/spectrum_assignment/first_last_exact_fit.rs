use std::sync::Arc;

use crate::domain::circuit::circuit::{Circuit, Placement};
use crate::domain::network::route::Route;
use crate::domain::network::spectrum::SpectrumBand;
use crate::domain::rmlsa::context::RmlsaContext;
use crate::domain::rmlsa::routing::RoutingProvider;
use crate::domain::rmlsa::spectrum_assignment::first_fit::first_fit;
use crate::domain::rmlsa::spectrum_assignment::last_fit::last_fit;
use crate::error::Result;

/// Exact fit from the bottom for routes of a link-disjoint group, exact fit
/// from the top for every other route. Core 0 only.
#[derive(Debug, Clone, Default)]
pub struct FirstLastExactFit {
    /// Built on first use from the routing provider's routes.
    disjoint_connection_group: Option<Vec<Arc<Route>>>,
}

impl FirstLastExactFit {
    const CORE: usize = 0;

    pub fn new() -> Self {
        FirstLastExactFit { disjoint_connection_group: None }
    }

    pub fn assign_spectrum(&mut self, num_slots: u32, circuit: &Circuit, ctx: &RmlsaContext<'_>) -> Result<Option<Placement>> {
        let free_bands = ctx.free_spectrum(circuit.route()?, Self::CORE)?;
        Ok(self.policy(num_slots, &free_bands, circuit, ctx)?.map(|band| Placement::new(Self::CORE, band)))
    }

    pub fn policy(&mut self, num_slots: u32, free_bands: &[SpectrumBand], circuit: &Circuit, ctx: &RmlsaContext<'_>) -> Result<Option<SpectrumBand>> {
        if ctx.exceeds_max_amplitude(num_slots, circuit)? {
            return Ok(None);
        }

        let route = circuit.route()?;
        let group = self.disjoint_connection_group.get_or_insert_with(|| create_disjoint_group(ctx.routing));

        if group.iter().any(|member| member.as_ref() == route.as_ref()) {
            Ok(first_exact_fit(num_slots, free_bands))
        } else {
            Ok(last_exact_fit(num_slots, free_bands))
        }
    }

    pub fn disjoint_connection_group(&self) -> Option<&[Arc<Route>]> {
        self.disjoint_connection_group.as_deref()
    }
}

/// Greedy group of routes in which no two share a link: walk all routes in
/// order and keep a route unless it conflicts with one already kept.
pub fn create_disjoint_group(routing: &dyn RoutingProvider) -> Vec<Arc<Route>> {
    let routes = routing.routes_for_all_pairs();
    let mut group: Vec<Arc<Route>> = Vec::new();

    for route in routes {
        let conflicts = group.iter().any(|member| member.as_ref() != route.as_ref() && member.shares_link_with(&route));
        if !conflicts {
            group.push(route);
        }
    }

    log::debug!("Disjoint connection group holds {} routes.", group.len());
    group
}

/// Lowest band of exactly `num_slots`, else plain first fit.
pub fn first_exact_fit(num_slots: u32, free_bands: &[SpectrumBand]) -> Option<SpectrumBand> {
    free_bands.iter().find(|band| band.num_slots() == num_slots).copied().or_else(|| first_fit(num_slots, free_bands))
}

/// Highest band of exactly `num_slots`, else plain last fit.
pub fn last_exact_fit(num_slots: u32, free_bands: &[SpectrumBand]) -> Option<SpectrumBand> {
    free_bands.iter().rev().find(|band| band.num_slots() == num_slots).copied().or_else(|| last_fit(num_slots, free_bands))
}
