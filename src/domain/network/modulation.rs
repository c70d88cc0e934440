use crate::api::simulation_dto::ModulationDto;
use crate::domain::physical_layer::math::ratio_of_db;
use crate::error::{Error, Result};

/// Modulation format of the modulation catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Modulation {
    pub name: String,
    pub bits_per_symbol: f64,
    /// Constellation size M.
    pub constellation_size: f64,
    /// Minimum SNR in dB.
    pub snr_threshold_db: f64,
    /// Guard slots added to every band of this format.
    pub guard_band: u32,
    /// Configured transparent reach in km, if any.
    pub max_range_km: Option<f64>,
    slot_bandwidth: f64,
    fec_rate: f64,
}

impl Modulation {
    pub fn new(name: impl Into<String>, bits_per_symbol: f64, constellation_size: f64, snr_threshold_db: f64, slot_bandwidth: f64, fec_rate: f64) -> Self {
        Modulation {
            name: name.into(),
            bits_per_symbol,
            constellation_size,
            snr_threshold_db,
            guard_band: 0,
            max_range_km: None,
            slot_bandwidth,
            fec_rate,
        }
    }

    pub fn from_dto(dto: &ModulationDto, slot_bandwidth: f64, fec_rate: f64) -> Result<Self> {
        if dto.bits_per_symbol <= 0.0 {
            return Err(Error::ModelConstructionError(format!("Modulation {} needs a positive number of bits per symbol", dto.name)));
        }
        if dto.constellation_size < 2.0 {
            return Err(Error::ModelConstructionError(format!("Modulation {} needs a constellation of at least 2 symbols", dto.name)));
        }

        let mut modulation = Modulation::new(dto.name.clone(), dto.bits_per_symbol, dto.constellation_size, dto.snr_threshold, slot_bandwidth, fec_rate);
        modulation.guard_band = dto.guard_band;
        modulation.max_range_km = dto.max_range;
        Ok(modulation)
    }

    pub fn slot_bandwidth(&self) -> f64 {
        self.slot_bandwidth
    }

    /// Number of contiguous slots a circuit of `bit_rate` bit/s occupies,
    /// including this format's guard slots.
    pub fn required_slots(&self, bit_rate: f64) -> u32 {
        let slots = (bit_rate / (self.bits_per_symbol * self.slot_bandwidth)).ceil().max(1.0);
        slots as u32 + self.guard_band
    }

    /// Signal bandwidth in Hz after FEC overhead.
    pub fn bandwidth_from_bit_rate(&self, bit_rate: f64) -> f64 {
        bit_rate * (1.0 + self.fec_rate) / self.bits_per_symbol
    }

    pub fn snr_threshold_linear(&self) -> f64 {
        ratio_of_db(self.snr_threshold_db)
    }
}
