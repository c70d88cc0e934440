use std::collections::HashSet;

use crate::api::config_dto::ConfigDto;
use crate::domain::circuit::circuit::{BlockCause, Circuit};
use crate::domain::circuit::circuit_store::{CircuitId, CircuitStore};
use crate::domain::control_plane::network::Network;
use crate::domain::control_plane::power::{NoPowerModel, PowerConsumptionHook};
use crate::domain::network::modulation::Modulation;
use crate::domain::network::spectrum;
use crate::domain::network::topology::Topology;
use crate::domain::physical_layer::crosstalk::Crosstalk;
use crate::domain::physical_layer::math::ratio_to_db;
use crate::domain::physical_layer::physical_layer::{InterferenceProbe, PhysicalLayer};
use crate::domain::physical_layer::reach::ReachTable;
use crate::domain::rmlsa::integrated::{CompleteSharing, IntegratedRmlsaType};
use crate::domain::rmlsa::modulation_selection::{self, ModulationSelection};
use crate::domain::rmlsa::rmlsa_type::RmlsaType;
use crate::domain::rmlsa::routing::{KShortestPaths, RoutingProvider};
use crate::domain::rmlsa::spectrum_assignment::{SpectrumAssignment, SpectrumAssignmentType};
use crate::domain::utils::id::{LinkId, NodeId};
use crate::error::{Error, Result};

/// Outcome of [`ControlPlane::establish_circuit`].
#[derive(Debug)]
pub enum AdmissionOutcome {
    Established(CircuitId),
    /// The rejected request, with `block_cause` set.
    Blocked(Circuit),
}

impl AdmissionOutcome {
    pub fn is_established(&self) -> bool {
        matches!(self, AdmissionOutcome::Established(_))
    }

    pub fn circuit_id(&self) -> Option<CircuitId> {
        match self {
            AdmissionOutcome::Established(id) => Some(*id),
            AdmissionOutcome::Blocked(_) => None,
        }
    }

    pub fn block_cause(&self) -> Option<BlockCause> {
        match self {
            AdmissionOutcome::Established(_) => None,
            AdmissionOutcome::Blocked(circuit) => circuit.block_cause,
        }
    }
}

/// Algorithms a control plane runs; they may keep state across requests.
#[derive(Debug)]
struct RmlsaAlgorithms {
    rmlsa_type: RmlsaType,
    spectrum_assignment: SpectrumAssignment,
    modulation_selection: ModulationSelection,
    integrated: CompleteSharing,
}

/// Admission control of one network.
///
/// A request runs through transceiver checks, RMLSA, QoT, crosstalk and
/// finally a commit that writes spectrum, transceivers and registries.
/// Everything before the commit works on the request alone; a rejected
/// request leaves the network untouched.
#[derive(Debug)]
pub struct ControlPlane {
    network: Network,
    algorithms: RmlsaAlgorithms,
    power_hook: Box<dyn PowerConsumptionHook>,
}

impl ControlPlane {
    /// Builds topology, physical layer, routing and algorithms from a configuration.
    /// `seed` drives the randomized policies.
    pub fn from_config(config: &ConfigDto, seed: u64) -> Result<Self> {
        let topology = Topology::from_dto(&config.network)?;
        let physical_layer = PhysicalLayer::new(&config.physical_layer, &topology)?;

        let modulations = config
            .simulation
            .modulations
            .iter()
            .map(|dto| Modulation::from_dto(dto, topology.slot_bandwidth(), config.physical_layer.rate_of_fec))
            .collect::<Result<Vec<Modulation>>>()?;
        if modulations.is_empty() {
            return Err(Error::ModelConstructionError("The modulation catalog is empty".to_string()));
        }

        let reach_table = ReachTable::compute(&physical_layer, &topology, &modulations, &config.simulation.bit_rates);
        let routing: Box<dyn RoutingProvider> = Box::new(KShortestPaths::new(&topology, config.simulation.k_shortest_paths));

        let algorithms = RmlsaAlgorithms {
            rmlsa_type: config.simulation.rmlsa_type.parse()?,
            spectrum_assignment: config.simulation.spectrum_assignment.parse::<SpectrumAssignmentType>()?.get_instance(seed),
            modulation_selection: config.simulation.modulation_selection.parse()?,
            integrated: config.simulation.integrated_rmlsa.parse::<IntegratedRmlsaType>()?.get_instance(config.simulation.k_shortest_paths),
        };

        log::info!(
            "Control plane ready: {:?} RMLSA, {} spectrum assignment, {:?} modulation selection, {} modulations.",
            algorithms.rmlsa_type,
            config.simulation.spectrum_assignment,
            algorithms.modulation_selection,
            modulations.len()
        );

        let network = Network { topology, circuits: CircuitStore::new(), physical_layer, crosstalk: Crosstalk::new(), routing, modulations, reach_table };
        Ok(ControlPlane { network, algorithms, power_hook: Box::new(NoPowerModel) })
    }

    pub fn with_routing(mut self, routing: Box<dyn RoutingProvider>) -> Self {
        self.network.routing = routing;
        self
    }

    pub fn with_power_hook(mut self, power_hook: Box<dyn PowerConsumptionHook>) -> Self {
        self.power_hook = power_hook;
        self
    }

    pub fn topology(&self) -> &Topology {
        &self.network.topology
    }

    /// Direct access to the mesh, e.g. to pre-occupy spectrum in test scenarios.
    pub fn topology_mut(&mut self) -> &mut Topology {
        &mut self.network.topology
    }

    pub fn physical_layer(&self) -> &PhysicalLayer {
        &self.network.physical_layer
    }

    pub fn modulations(&self) -> &[Modulation] {
        &self.network.modulations
    }

    pub fn reach_table(&self) -> &ReachTable {
        &self.network.reach_table
    }

    pub fn active_circuits(&self) -> &CircuitStore {
        &self.network.circuits
    }

    pub fn circuit(&self, id: CircuitId) -> Option<&Circuit> {
        self.network.circuits.get(id)
    }

    /// Active circuits between `source` and `destination`, in admission order.
    pub fn search_for_active_circuits(&self, source: &NodeId, destination: &NodeId) -> Vec<(CircuitId, &Circuit)> {
        self.network.circuits.search(source, destination)
    }

    /// Fraction of occupied slots over every core of every link.
    pub fn utilization(&self) -> f64 {
        self.network.topology.utilization()
    }

    /// Adds reach entries for bit rates the configuration did not list.
    pub fn register_bit_rates(&mut self, bit_rates: &[f64]) {
        let network = &mut self.network;
        let average_last_segment = network.topology.average_last_fiber_segment(network.physical_layer.span_length());

        for &bit_rate in bit_rates {
            for modulation in &network.modulations {
                if network.reach_table.contains(modulation, bit_rate) {
                    continue;
                }
                let reach = network.physical_layer.compute_modulation_reach(modulation, bit_rate, network.topology.num_slots(), average_last_segment);
                network.reach_table.insert(modulation, bit_rate, reach);
            }
        }
    }

    /// Sum of the bit rates of all active circuits, bit/s.
    pub fn data_transmitted(&self) -> f64 {
        self.network.circuits.data_transmitted()
    }

    /// Tries to admit a connection request.
    ///
    /// # Returns
    /// `Established` with the new circuit's key, or `Blocked` with the
    /// request and its blocking cause. `Err` only signals an internal
    /// inconsistency, such as a commit clashing with occupied spectrum.
    pub fn establish_circuit(&mut self, mut circuit: Circuit) -> Result<AdmissionOutcome> {
        if !self.network.topology.node(&circuit.source)?.transmitters.has_free() {
            return Ok(self.block(circuit, BlockCause::LackTx));
        }
        if !self.network.topology.node(&circuit.destination)?.receivers.has_free() {
            return Ok(self.block(circuit, BlockCause::LackRx));
        }

        if !self.try_establish(&mut circuit)? {
            let cause = self.diagnose_block_cause(&circuit)?;
            return Ok(self.block(circuit, cause));
        }

        if !self.is_admissible_quality_of_transmission(&mut circuit)? {
            let cause = self.diagnose_block_cause(&circuit)?;
            return Ok(self.block(circuit, cause));
        }

        if !self.is_admissible_crosstalk(&mut circuit)? {
            return Ok(self.block(circuit, BlockCause::Crosstalk));
        }

        let label = circuit.label();
        let id = self.allocate_circuit(circuit)?;
        log::debug!("Established {} as {:?}.", label, id);
        Ok(AdmissionOutcome::Established(id))
    }

    /// Tears down an active circuit and frees everything it held.
    ///
    /// A link where the circuit's band or registration is missing is an
    /// internal inconsistency: the rest of the circuit is still freed and
    /// the first such link is reported as an error.
    pub fn release_circuit(&mut self, id: CircuitId) -> Result<Circuit> {
        let circuit = self.network.circuits.remove(id).ok_or(Error::UnknownCircuit)?;
        let route = circuit.route()?.clone();
        let placement = circuit.placement()?;
        let mut inconsistent: Option<LinkId> = None;

        for link_id in &route.links {
            let core = self.network.topology.link_mut(link_id)?.core_mut(placement.core)?;
            let registered = core.remove_circuit(id);
            let freed = core.liberate_spectrum(placement.band);
            if !(registered && freed) && inconsistent.is_none() {
                inconsistent = Some(link_id.clone());
            }
        }

        self.network.topology.node_mut(&circuit.source)?.transmitters.release();
        self.network.topology.node_mut(&circuit.destination)?.receivers.release();
        self.power_hook.recompute(&self.network.topology, &self.network.circuits);

        if let Some(link) = inconsistent {
            log::error!("Release of {} found inconsistent state on {}.", circuit.label(), link);
            return Err(Error::InconsistentRelease { link, core: placement.core, band: placement.band });
        }

        log::debug!("Released {} ({}).", circuit.label(), placement);
        Ok(circuit)
    }

    /// Chooses route, modulation and placement for `circuit`.
    ///
    /// # Returns
    /// `true` if a placement was found.
    fn try_establish(&mut self, circuit: &mut Circuit) -> Result<bool> {
        let ctx = self.network.context();

        match self.algorithms.rmlsa_type {
            RmlsaType::Integrated => {
                let Some(decision) = self.algorithms.integrated.rsa(circuit, &self.algorithms.modulation_selection, &ctx)? else {
                    return Ok(false);
                };
                circuit.route = Some(decision.route);
                circuit.modulation = Some(decision.modulation);
                circuit.placement = decision.placement;
            }
            RmlsaType::Sequential => {
                let Some(route) = ctx.routing.routes(&circuit.source, &circuit.destination).into_iter().next() else {
                    return Ok(false);
                };
                circuit.route = Some(route.clone());

                let choice = self.algorithms.modulation_selection.select_modulation(circuit, &route, &mut self.algorithms.spectrum_assignment, &ctx)?;
                let slots = choice.modulation.required_slots(circuit.bit_rate);
                circuit.modulation = Some(choice.modulation);

                circuit.placement = self.algorithms.spectrum_assignment.assign_spectrum(slots, circuit, &ctx)?;
            }
        }

        Ok(circuit.placement.is_some())
    }

    /// QoT of the new circuit, then (if enabled) of the active circuits it
    /// would disturb. Both checks are skipped when QoT is disabled. Stores
    /// the verdicts and the SNR on `circuit`.
    pub fn is_admissible_quality_of_transmission(&self, circuit: &mut Circuit) -> Result<bool> {
        let physical_layer = &self.network.physical_layer;

        if !physical_layer.is_active_qot() {
            circuit.qot = true;
            return Ok(true);
        }

        let (admissible, snr_db) =
            physical_layer.is_admissible_modulation(&self.network.topology, &self.network.circuits, circuit, None, InterferenceProbe::None)?;
        circuit.snr_db = snr_db;
        circuit.qot = admissible;
        if !admissible {
            return Ok(false);
        }

        if physical_layer.is_active_qot_for_other() {
            circuit.qot_for_other = self.compute_qot_for_other(circuit)?;
            if !circuit.qot_for_other {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Whether every active circuit sharing a core with `circuit` on its
    /// route still meets its QoT with `circuit` added. Active circuits are
    /// not modified.
    pub fn compute_qot_for_other(&self, circuit: &Circuit) -> Result<bool> {
        for (id, other) in self.circuits_sharing_core(circuit, None)? {
            let (admissible, snr_db) = self.network.physical_layer.is_admissible_modulation(
                &self.network.topology,
                &self.network.circuits,
                other,
                Some(id),
                InterferenceProbe::Add(circuit),
            )?;
            if !admissible {
                log::trace!("{} would drop to {:.2} dB with {} added.", other.label(), snr_db, circuit.label());
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Crosstalk of the circuit's placement. Stores the value and the verdict on `circuit`.
    pub fn is_admissible_crosstalk(&self, circuit: &mut Circuit) -> Result<bool> {
        let placement = circuit.placement()?;
        let crosstalk_db =
            self.network.crosstalk.crosstalk_db(&self.network.topology, &self.network.circuits, circuit.route()?, placement.core, placement.band)?;

        circuit.xt_db = crosstalk_db;
        circuit.xt_admissible = self.network.crosstalk.is_admissible(circuit.modulation()?, crosstalk_db);
        Ok(circuit.xt_admissible)
    }

    /// Total SNR change (dB) the active circuits sharing a core with circuit
    /// `id` would see if it were gone, against the SNR stored at their admission.
    pub fn computes_impact_on_snr_other(&self, id: CircuitId) -> Result<f64> {
        let circuit = self.network.circuits.get(id).ok_or(Error::UnknownCircuit)?;
        let physical_layer = &self.network.physical_layer;
        let mut impact = 0.0;

        for (other_id, other) in self.circuits_sharing_core(circuit, Some(id))? {
            let without = physical_layer.compute_snr(&self.network.topology, &self.network.circuits, other, Some(other_id), InterferenceProbe::Exclude(id))?;
            impact += (ratio_to_db(without) - other.snr_db).abs();
        }

        Ok(impact)
    }

    /// Current SNR margin (dB) of an active circuit above its modulation threshold.
    pub fn get_delta_snr(&self, id: CircuitId) -> Result<f64> {
        let circuit = self.network.circuits.get(id).ok_or(Error::UnknownCircuit)?;
        let snr = self.network.physical_layer.compute_snr(&self.network.topology, &self.network.circuits, circuit, Some(id), InterferenceProbe::None)?;
        Ok(ratio_to_db(snr) - circuit.modulation()?.snr_threshold_db)
    }

    /// Distinct active circuits on the circuit's core along its route, other than `skip`.
    fn circuits_sharing_core(&self, circuit: &Circuit, skip: Option<CircuitId>) -> Result<Vec<(CircuitId, &Circuit)>> {
        let placement = circuit.placement()?;
        let mut seen = HashSet::new();
        let mut sharing = Vec::new();

        for link_id in &circuit.route()?.links {
            for &id in self.network.topology.link(link_id)?.core(placement.core)?.circuits() {
                if Some(id) == skip || !seen.insert(id) {
                    continue;
                }
                sharing.push((id, self.network.circuits.get(id).ok_or(Error::UnknownCircuit)?));
            }
        }

        Ok(sharing)
    }

    /// Why a request that passed the transceiver checks was rejected.
    fn diagnose_block_cause(&self, circuit: &Circuit) -> Result<BlockCause> {
        if self.is_blocking_by_qotn(circuit)? {
            if self.is_blocking_by_fragmentation(circuit)? {
                return Ok(BlockCause::Fragmentation);
            }
            return Ok(BlockCause::QotN);
        }
        if !circuit.qot_for_other {
            return Ok(BlockCause::QotO);
        }
        if !circuit.xt_admissible {
            return Ok(BlockCause::Crosstalk);
        }
        Ok(BlockCause::Other)
    }

    /// `true` if the circuit has a full tentative choice whose own QoT fails.
    fn is_blocking_by_qotn(&self, circuit: &Circuit) -> Result<bool> {
        if !self.network.physical_layer.is_active_qot() || circuit.route.is_none() || circuit.modulation.is_none() || circuit.placement.is_none() {
            return Ok(false);
        }

        let (admissible, _) = self.network.physical_layer.is_admissible_modulation(
            &self.network.topology,
            &self.network.circuits,
            circuit,
            None,
            InterferenceProbe::None,
        )?;
        Ok(!admissible)
    }

    /// `true` if a format the route can reach is more robust than the one
    /// tried, and the route has enough free slots in total for it, just not
    /// contiguously.
    fn is_blocking_by_fragmentation(&self, circuit: &Circuit) -> Result<bool> {
        let ctx = self.network.context();
        let route = circuit.route()?;
        let tried = circuit.modulation()?;

        let Some(reachable) = modulation_selection::by_distance_and_bandwidth(circuit.bit_rate, route, &ctx) else {
            return Ok(false);
        };
        if reachable.snr_threshold_db >= tried.snr_threshold_db {
            return Ok(false);
        }

        let free_bands = ctx.free_spectrum(route, circuit.core_index())?;
        Ok(spectrum::total_slots(&free_bands) >= reachable.required_slots(circuit.bit_rate))
    }

    /// Writes spectrum on every link of the route, takes the transceivers
    /// and registers the circuit.
    ///
    /// `circuit` needs a route, modulation and placement. A band that is no
    /// longer free on some link rolls back the links already written and
    /// fails with [`Error::SpectrumConflict`].
    pub fn allocate_circuit(&mut self, circuit: Circuit) -> Result<CircuitId> {
        let route = circuit.route()?.clone();
        let placement = circuit.placement()?;
        let guard_band = self.network.topology.guard_band();
        let mut allocated: Vec<LinkId> = Vec::with_capacity(route.links.len());

        for link_id in &route.links {
            let core = self.network.topology.link_mut(link_id)?.core_mut(placement.core)?;
            if !core.use_spectrum(placement.band, guard_band) {
                log::error!("Bad RMLSA choice for {}: {} is not free on {}.", circuit.label(), placement, link_id);
                self.rollback_spectrum(&allocated, placement.core, placement.band)?;
                return Err(Error::SpectrumConflict { link: link_id.clone(), core: placement.core, band: placement.band });
            }
            allocated.push(link_id.clone());
        }

        if !self.network.topology.node_mut(&circuit.source)?.transmitters.allocate() {
            self.rollback_spectrum(&allocated, placement.core, placement.band)?;
            return Err(Error::TransceiverExhausted(circuit.source.clone()));
        }
        if !self.network.topology.node_mut(&circuit.destination)?.receivers.allocate() {
            self.network.topology.node_mut(&circuit.source)?.transmitters.release();
            self.rollback_spectrum(&allocated, placement.core, placement.band)?;
            return Err(Error::TransceiverExhausted(circuit.destination.clone()));
        }

        let id = self.network.circuits.add(circuit);
        for link_id in &route.links {
            self.network.topology.link_mut(link_id)?.core_mut(placement.core)?.add_circuit(id);
        }

        self.power_hook.recompute(&self.network.topology, &self.network.circuits);
        Ok(id)
    }

    fn rollback_spectrum(&mut self, links: &[LinkId], core: usize, band: spectrum::SpectrumBand) -> Result<()> {
        for link_id in links {
            self.network.topology.link_mut(link_id)?.core_mut(core)?.liberate_spectrum(band);
        }
        Ok(())
    }

    fn block(&self, mut circuit: Circuit, cause: BlockCause) -> AdmissionOutcome {
        log::debug!("Blocked {}: {}.", circuit.label(), cause);
        circuit.block_cause = Some(cause);
        AdmissionOutcome::Blocked(circuit)
    }
}
