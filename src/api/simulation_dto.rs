use serde::Deserialize;

fn default_rmlsa_type() -> String {
    "Sequential".to_string()
}

fn default_spectrum_assignment() -> String {
    "FirstFit".to_string()
}

fn default_modulation_selection() -> String {
    "ByDistanceAndBandwidth".to_string()
}

fn default_integrated_rmlsa() -> String {
    "CompleteSharing".to_string()
}

fn default_k_shortest_paths() -> usize {
    3
}

fn default_replications() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationDto {
    /// `Sequential` or `Integrated`.
    #[serde(default = "default_rmlsa_type")]
    pub rmlsa_type: String,
    #[serde(default = "default_spectrum_assignment")]
    pub spectrum_assignment: String,
    #[serde(default = "default_modulation_selection")]
    pub modulation_selection: String,
    #[serde(default = "default_integrated_rmlsa")]
    pub integrated_rmlsa: String,
    #[serde(default = "default_k_shortest_paths")]
    pub k_shortest_paths: usize,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_replications")]
    pub replications: usize,
    /// Bit rates (bit/s) for which the modulation reach table is computed.
    #[serde(default)]
    pub bit_rates: Vec<f64>,
    /// Modulation catalog, in the order strategies iterate it.
    pub modulations: Vec<ModulationDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModulationDto {
    pub name: String,
    pub bits_per_symbol: f64,
    /// Constellation size M.
    pub constellation_size: f64,
    /// dB
    pub snr_threshold: f64,
    /// Extra guard slots added to every band of this format.
    #[serde(default)]
    pub guard_band: u32,
    /// km, used when the reach table has no entry for a bit rate.
    #[serde(default)]
    pub max_range: Option<f64>,
}
