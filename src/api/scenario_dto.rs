use serde::Deserialize;

/// Ordered list of connection events replayed by every replication.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDto {
    pub events: Vec<EventDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EventDto {
    Establish { id: String, source: String, destination: String, bit_rate: f64 },
    Release { id: String },
}
