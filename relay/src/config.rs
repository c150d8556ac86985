pub(crate) const DEFAULT_STATION: &str = "Туристская";
pub(crate) const DEFAULT_PREFIX: &str = "air.state";

pub(crate) struct RelayConfig {
    pub station_name: String,
    pub graphite_host: Option<String>,
    pub metrics_prefix: String,
}

impl RelayConfig {
    /// Reads the relay configuration from the environment. With no
    /// `GRAPHITE_HOST` the reading is only logged, never emitted.
    pub(crate) fn from_env() -> Self {
        Self {
            station_name: env_non_empty("STATION_NAME")
                .unwrap_or_else(|| DEFAULT_STATION.to_string()),
            graphite_host: env_non_empty("GRAPHITE_HOST"),
            metrics_prefix: env_non_empty("METRICS_PREFIX")
                .unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
        }
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
