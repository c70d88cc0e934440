use serde::Deserialize;

/// Physical-layer parameters. Every field falls back to the values of
/// [`PhysicalLayerDto::default`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhysicalLayerDto {
    /// Check the QoT of the new circuit.
    pub active_qot: bool,
    /// Check the QoT of already active circuits.
    pub active_qot_for_other: bool,
    pub active_ase: bool,
    pub active_nli: bool,
    /// 0 compares SNR against the threshold, anything else compares BER.
    pub type_of_test_qot: u32,
    pub rate_of_fec: f64,

    /// Launch power per channel in dBm.
    pub power: f64,
    /// km
    pub span_length: f64,
    /// dB/km
    pub fiber_loss: f64,
    /// Nonlinear coefficient gamma in 1/(W*m).
    pub fiber_nonlinearity: f64,
    /// Dispersion parameter D in s/m^2.
    pub fiber_dispersion: f64,
    /// Hz
    pub center_frequency: f64,
    pub constant_of_planck: f64,
    /// dB
    pub noise_figure_of_optical_amplifier: f64,
    /// dBm
    pub power_saturation_of_optical_amplifier: f64,
    pub noise_factor_model_parameter_a1: f64,
    pub noise_factor_model_parameter_a2: f64,
    /// 0 fixed gain, 1 saturated gain.
    pub type_of_amplifier_gain: u32,
    /// Hz
    pub amplification_frequency: f64,
    /// dB
    pub switch_insertion_loss: f64,
    pub fixed_power_spectral_density: bool,
    /// Hz
    pub reference_bandwidth_for_power_spectral_density: f64,
    /// 0 is treated as 2.
    pub polarization_modes: u32,
}

impl Default for PhysicalLayerDto {
    fn default() -> Self {
        PhysicalLayerDto {
            active_qot: true,
            active_qot_for_other: true,
            active_ase: true,
            active_nli: true,
            type_of_test_qot: 0,
            rate_of_fec: 0.07,
            power: 1.0,
            span_length: 80.0,
            fiber_loss: 0.2,
            fiber_nonlinearity: 1.3e-3,
            fiber_dispersion: 16.0e-6,
            center_frequency: 193.4e12,
            constant_of_planck: 6.626_070_15e-34,
            noise_figure_of_optical_amplifier: 5.0,
            power_saturation_of_optical_amplifier: 50.0,
            noise_factor_model_parameter_a1: 0.0,
            noise_factor_model_parameter_a2: 0.0,
            type_of_amplifier_gain: 0,
            amplification_frequency: 193.4e12,
            switch_insertion_loss: 0.0,
            fixed_power_spectral_density: true,
            reference_bandwidth_for_power_spectral_density: 12.5e9,
            polarization_modes: 2,
        }
    }
}
