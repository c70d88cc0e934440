use crate::domain::physical_layer::math::{dbm_to_watt, ratio_of_db, ratio_to_db};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmplifierGainType {
    /// Gain is the configured value regardless of input power.
    Fixed,
    /// Gain compresses as the total input power approaches saturation.
    Saturated,
}

impl AmplifierGainType {
    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            0 => Ok(AmplifierGainType::Fixed),
            1 => Ok(AmplifierGainType::Saturated),
            _ => Err(Error::ModelConstructionError(format!("Unknown amplifier gain type {}", code))),
        }
    }
}

/// Erbium-doped fiber amplifier.
///
/// ASE power spectral density (both polarizations) is `F * h * f * (G - 1)`
/// with noise factor `F` and linear gain `G`. In saturated mode the gain is
/// `G0 / (1 + G0 * Pin / Psat)` and the noise figure grows with the gain
/// compression `dG = G0_dB - G_dB` as `NF + A1 * dG + A2 * dG^2`.
#[derive(Debug, Clone)]
pub struct Amplifier {
    gain_db: f64,
    saturation_power_dbm: f64,
    noise_figure_db: f64,
    planck: f64,
    frequency: f64,
    a1: f64,
    a2: f64,
}

impl Amplifier {
    pub fn new(gain_db: f64, saturation_power_dbm: f64, noise_figure_db: f64, planck: f64, frequency: f64, a1: f64, a2: f64) -> Self {
        Amplifier { gain_db, saturation_power_dbm, noise_figure_db, planck, frequency, a1, a2 }
    }

    /// Same device configured with another small-signal gain.
    pub fn with_gain(&self, gain_db: f64) -> Self {
        Amplifier { gain_db, ..self.clone() }
    }

    pub fn gain_db(&self) -> f64 {
        self.gain_db
    }

    /// Operating gain in dB for a total input power in W.
    pub fn gain_by_type(&self, total_power: f64, gain_type: AmplifierGainType) -> f64 {
        match gain_type {
            AmplifierGainType::Fixed => self.gain_db,
            AmplifierGainType::Saturated => self.saturated_gain(total_power),
        }
    }

    pub fn saturated_gain(&self, total_power: f64) -> f64 {
        let small_signal_gain = ratio_of_db(self.gain_db);
        let saturation_power = dbm_to_watt(self.saturation_power_dbm);
        ratio_to_db(small_signal_gain / (1.0 + small_signal_gain * total_power / saturation_power))
    }

    /// Noise figure in dB when operating at `gain_db`.
    pub fn noise_figure(&self, gain_db: f64) -> f64 {
        let compression = (self.gain_db - gain_db).max(0.0);
        self.noise_figure_db + self.a1 * compression + self.a2 * compression * compression
    }

    /// ASE power spectral density in W/Hz when operating at `gain_db`.
    pub fn ase(&self, gain_db: f64) -> f64 {
        let gain = ratio_of_db(gain_db);
        if gain <= 1.0 {
            return 0.0;
        }
        ratio_of_db(self.noise_figure(gain_db)) * self.planck * self.frequency * (gain - 1.0)
    }
}
