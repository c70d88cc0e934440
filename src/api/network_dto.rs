use serde::Deserialize;

fn default_cores_per_link() -> usize {
    7
}

fn default_slots_per_core() -> u32 {
    320
}

fn default_slot_bandwidth() -> f64 {
    12.5e9
}

fn default_guard_band() -> u32 {
    1
}

fn default_bidirectional() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDto {
    pub nodes: Vec<NodeDto>,
    pub links: Vec<LinkDto>,
    #[serde(default = "default_cores_per_link")]
    pub cores_per_link: usize,
    #[serde(default = "default_slots_per_core")]
    pub slots_per_core: u32,
    /// Width of one frequency slot in Hz.
    #[serde(default = "default_slot_bandwidth")]
    pub slot_bandwidth: f64,
    /// Guard band (in slots) kept between neighbouring bands on a core.
    #[serde(default = "default_guard_band")]
    pub guard_band: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDto {
    pub name: String,
    /// Missing means unlimited.
    #[serde(default)]
    pub transmitters: Option<u32>,
    #[serde(default)]
    pub receivers: Option<u32>,
    /// Missing means the whole core.
    #[serde(default)]
    pub max_spectral_amplitude: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDto {
    pub source: String,
    pub destination: String,
    /// Length in km.
    pub length: f64,
    #[serde(default = "default_bidirectional")]
    pub bidirectional: bool,
}
