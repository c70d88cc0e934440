use crate::api::physical_layer_dto::PhysicalLayerDto;
use crate::domain::circuit::circuit::Circuit;
use crate::domain::circuit::circuit_store::{CircuitId, CircuitStore};
use crate::domain::network::modulation::Modulation;
use crate::domain::network::spectrum::SpectrumBand;
use crate::domain::network::topology::Topology;
use crate::domain::physical_layer::amplifier::{Amplifier, AmplifierGainType};
use crate::domain::physical_layer::math::{alpha_linear, beta2, bit_error_rate, dbm_to_watt, ratio_to_db};
use crate::error::{Error, Result};

/// Longest distance probed when computing a modulation's reach, km.
pub const MAX_REACH_KM: f64 = 50_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QotTestType {
    /// SNR in dB must reach the modulation threshold.
    Snr,
    /// BER must not exceed the BER at the modulation threshold.
    Ber,
}

/// How the circuit under test enters the interference picture.
#[derive(Debug, Clone, Copy)]
pub enum InterferenceProbe<'a> {
    None,
    /// Count this (not yet active) circuit as an extra interferer on the links it uses.
    Add(&'a Circuit),
    /// Ignore this active circuit as an interferer.
    Exclude(CircuitId),
}

/// Spectral footprint of one channel.
#[derive(Debug, Clone, Copy)]
struct Channel {
    /// Hz
    center_frequency: f64,
    /// Hz
    bandwidth: f64,
    /// W, summed over polarizations.
    launch_power: f64,
}

/// What one link contributes to the noise of a signal.
#[derive(Debug, Clone)]
struct LinkSpan {
    distance_km: f64,
    interferers: Vec<Channel>,
}

/// Closed-form QoT estimation: ASE noise from the amplifier chain plus
/// nonlinear interference from the Gaussian-noise model, per link.
#[derive(Debug, Clone)]
pub struct PhysicalLayer {
    active_qot: bool,
    active_qot_for_other: bool,
    active_ase: bool,
    active_nli: bool,
    test_type: QotTestType,

    /// Default launch power per channel, W.
    power: f64,
    /// km
    span_length: f64,
    /// dB/km
    fiber_loss: f64,
    /// 1/m
    alpha: f64,
    gamma: f64,
    /// s^2/m
    beta2: f64,

    booster: Amplifier,
    line_amplifier: Amplifier,
    pre_amplifier: Amplifier,
    gain_type: AmplifierGainType,

    fixed_power_spectral_density: bool,
    reference_bandwidth: f64,
    polarization_modes: f64,

    slot_bandwidth: f64,
    /// Frequency of the lower edge of slot 1, Hz.
    lower_frequency: f64,
}

impl PhysicalLayer {
    pub fn new(dto: &PhysicalLayerDto, topology: &Topology) -> Result<Self> {
        if dto.span_length <= 0.0 {
            return Err(Error::ModelConstructionError("Span length must be positive".to_string()));
        }

        let test_type = if dto.type_of_test_qot == 0 { QotTestType::Snr } else { QotTestType::Ber };
        let gain_type = AmplifierGainType::from_code(dto.type_of_amplifier_gain)?;

        let amplifier = Amplifier::new(
            0.0,
            dto.power_saturation_of_optical_amplifier,
            dto.noise_figure_of_optical_amplifier,
            dto.constant_of_planck,
            dto.amplification_frequency,
            dto.noise_factor_model_parameter_a1,
            dto.noise_factor_model_parameter_a2,
        );

        let slot_bandwidth = topology.slot_bandwidth();
        let lower_frequency = dto.center_frequency - slot_bandwidth * (topology.num_slots() as f64 / 2.0);
        let polarization_modes = if dto.polarization_modes == 0 { 2.0 } else { dto.polarization_modes as f64 };

        Ok(PhysicalLayer {
            active_qot: dto.active_qot,
            active_qot_for_other: dto.active_qot_for_other,
            active_ase: dto.active_ase,
            active_nli: dto.active_nli,
            test_type,
            power: dbm_to_watt(dto.power),
            span_length: dto.span_length,
            fiber_loss: dto.fiber_loss,
            alpha: alpha_linear(dto.fiber_loss),
            gamma: dto.fiber_nonlinearity,
            beta2: beta2(dto.fiber_dispersion, dto.center_frequency),
            // Booster compensates the insertion loss of both switches.
            booster: amplifier.with_gain(2.0 * dto.switch_insertion_loss),
            line_amplifier: amplifier.with_gain(dto.fiber_loss * dto.span_length),
            pre_amplifier: amplifier,
            gain_type,
            fixed_power_spectral_density: dto.fixed_power_spectral_density,
            reference_bandwidth: dto.reference_bandwidth_for_power_spectral_density,
            polarization_modes,
            slot_bandwidth,
            lower_frequency,
        })
    }

    pub fn is_active_qot(&self) -> bool {
        self.active_qot
    }

    pub fn is_active_qot_for_other(&self) -> bool {
        self.active_qot_for_other
    }

    pub fn test_type(&self) -> QotTestType {
        self.test_type
    }

    pub fn span_length(&self) -> f64 {
        self.span_length
    }

    /// Default launch power per channel, W.
    pub fn launch_power(&self) -> f64 {
        self.power
    }

    /// In-line amplifiers on a fiber of `distance_km`.
    pub fn number_of_line_amplifiers(&self, distance_km: f64) -> f64 {
        ((distance_km / self.span_length) - 1.0).ceil().max(0.0)
    }

    /// Linear SNR of `subject` along its route with its current modulation and placement.
    ///
    /// Interferers on each link are the circuits active on the subject's core,
    /// minus the subject itself (`subject_id`), adjusted by `probe`.
    pub fn compute_snr(
        &self,
        topology: &Topology,
        circuits: &CircuitStore,
        subject: &Circuit,
        subject_id: Option<CircuitId>,
        probe: InterferenceProbe<'_>,
    ) -> Result<f64> {
        let signal = self.channel_of(subject)?;
        let placement = subject.placement()?;
        let route = subject.route()?;

        let mut spans = Vec::with_capacity(route.links.len());
        for link_id in &route.links {
            let link = topology.link(link_id)?;
            let core = link.core(placement.core)?;

            let mut interferers = Vec::with_capacity(core.circuits().len() + 1);
            for &other_id in core.circuits() {
                if Some(other_id) == subject_id {
                    continue;
                }
                if let InterferenceProbe::Exclude(excluded) = probe {
                    if excluded == other_id {
                        continue;
                    }
                }
                let other = circuits.get(other_id).ok_or(Error::UnknownCircuit)?;
                interferers.push(self.channel_of(other)?);
            }

            if let InterferenceProbe::Add(test) = probe {
                if test.uses_link(link_id) && test.core_index() == placement.core {
                    interferers.push(self.channel_of(test)?);
                }
            }

            spans.push(LinkSpan { distance_km: link.distance_km, interferers });
        }

        Ok(self.snr_over_spans(&signal, &spans))
    }

    /// Compares a linear SNR against the modulation's threshold using the
    /// configured test type.
    pub fn is_admissible(&self, modulation: &Modulation, snr: f64) -> bool {
        match self.test_type {
            QotTestType::Snr => ratio_to_db(snr) >= modulation.snr_threshold_db,
            QotTestType::Ber => bit_error_rate(snr, modulation.constellation_size) <= self.ber_threshold(modulation),
        }
    }

    /// BER a signal of `modulation` has at exactly its SNR threshold.
    pub fn ber_threshold(&self, modulation: &Modulation) -> f64 {
        bit_error_rate(modulation.snr_threshold_linear(), modulation.constellation_size)
    }

    /// QoT verdict for `subject` with its current route, modulation and placement.
    ///
    /// # Returns
    /// `(admissible, snr_db)`.
    pub fn is_admissible_modulation(
        &self,
        topology: &Topology,
        circuits: &CircuitStore,
        subject: &Circuit,
        subject_id: Option<CircuitId>,
        probe: InterferenceProbe<'_>,
    ) -> Result<(bool, f64)> {
        let snr = self.compute_snr(topology, circuits, subject, subject_id, probe)?;
        Ok((self.is_admissible(subject.modulation()?, snr), ratio_to_db(snr)))
    }

    /// Longest transparent distance (km) a circuit of `modulation` at
    /// `bit_rate` reaches alone on a single fiber at the bottom of the
    /// spectrum. The fiber ends with a segment of `average_last_segment` km.
    pub fn compute_modulation_reach(&self, modulation: &Modulation, bit_rate: f64, num_slots: u32, average_last_segment: f64) -> f64 {
        let slots = modulation.required_slots(bit_rate).min(num_slots);
        let bandwidth = modulation.bandwidth_from_bit_rate(bit_rate);
        let signal = Channel {
            center_frequency: self.center_frequency_of(SpectrumBand::starting_at(1, slots)),
            bandwidth,
            launch_power: self.power,
        };

        let mut reach = 0.0;
        let mut spans = 0.0;
        loop {
            let distance_km = spans * self.span_length + average_last_segment;
            if distance_km > MAX_REACH_KM {
                break;
            }

            let snr = self.snr_over_spans(&signal, &[LinkSpan { distance_km, interferers: Vec::new() }]);
            if self.is_admissible(modulation, snr) {
                reach = distance_km;
            }
            spans += 1.0;
        }

        reach
    }

    /// Centre of the slots a channel occupies, Hz. The modulation bandwidth
    /// only sets the channel's PSD width.
    fn center_frequency_of(&self, band: SpectrumBand) -> f64 {
        self.lower_frequency + self.slot_bandwidth * (band.lo - 1) as f64 + band.num_slots() as f64 * self.slot_bandwidth / 2.0
    }

    fn channel_of(&self, circuit: &Circuit) -> Result<Channel> {
        let bandwidth = circuit.modulation()?.bandwidth_from_bit_rate(circuit.bit_rate);
        let placement = circuit.placement()?;
        Ok(Channel {
            center_frequency: self.center_frequency_of(placement.band),
            bandwidth,
            launch_power: circuit.launch_power.unwrap_or(self.power),
        })
    }

    /// Power spectral density of a channel per polarization, W/Hz.
    fn power_spectral_density(&self, channel: &Channel) -> f64 {
        let power = channel.launch_power / self.polarization_modes;
        if self.fixed_power_spectral_density { power / self.reference_bandwidth } else { power / channel.bandwidth }
    }

    fn snr_over_spans(&self, signal: &Channel, spans: &[LinkSpan]) -> f64 {
        let psd = self.power_spectral_density(signal);
        let mut ase = 0.0;
        let mut nli = 0.0;

        for span in spans {
            let line_amplifiers = self.number_of_line_amplifiers(span.distance_km);
            let last_segment = span.distance_km - line_amplifiers * self.span_length;

            if self.active_nli {
                nli += self.nonlinear_interference(signal, psd, &span.interferers) * (line_amplifiers + 1.0);
            }

            if self.active_ase {
                let total_power = match self.gain_type {
                    AmplifierGainType::Fixed => 0.0,
                    AmplifierGainType::Saturated => signal.launch_power + span.interferers.iter().map(|channel| channel.launch_power).sum::<f64>(),
                };

                let pre_amplifier = self.pre_amplifier.with_gain(self.fiber_loss * last_segment);
                let booster_ase = self.booster.ase(self.booster.gain_by_type(total_power, self.gain_type));
                let line_ase = self.line_amplifier.ase(self.line_amplifier.gain_by_type(total_power, self.gain_type));
                let pre_ase = pre_amplifier.ase(pre_amplifier.gain_by_type(total_power, self.gain_type));

                ase += (booster_ase + line_amplifiers * line_ase + pre_ase) / self.polarization_modes;
            }
        }

        let noise = ase + nli;
        if noise <= 0.0 {
            return f64::INFINITY;
        }
        psd / noise
    }

    /// Gaussian-noise-model NLI power spectral density of one fiber span:
    /// self-channel term plus cross-channel terms of every interferer.
    fn nonlinear_interference(&self, signal: &Channel, psd: f64, interferers: &[Channel]) -> f64 {
        let beta2 = self.beta2.abs();
        let mi = psd * (3.0 * self.gamma.powi(2)) / (2.0 * std::f64::consts::PI * self.alpha * beta2);
        let ro = (signal.bandwidth.powi(2) * std::f64::consts::PI.powi(2) * beta2 / (2.0 * self.alpha)).abs();

        let self_term = psd.powi(2) * ro.asinh();

        let mut cross_term = 0.0;
        for other in interferers {
            let delta_f = (signal.center_frequency - other.center_frequency).abs();
            let upper = delta_f + other.bandwidth / 2.0;
            let lower = delta_f - other.bandwidth / 2.0;
            if lower.abs() < 1.0 {
                log::warn!("Interferer at {} Hz overlaps the signal spectrum, skipped in the NLI sum.", other.center_frequency);
                continue;
            }
            cross_term += self.power_spectral_density(other).powi(2) * (upper / lower).abs().ln();
        }

        mi * (self_term + cross_term)
    }
}
