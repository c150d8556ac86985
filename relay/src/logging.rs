use tracing::{error, info};

pub(crate) const TARGET: &str = "vozdukh_relay";

#[derive(Clone, Default)]
pub(crate) struct Logger {
    station: Option<String>,
    parameter: Option<String>,
    value: Option<f64>,
    error_text: Option<String>,
}

impl Logger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    pub(crate) fn parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }

    pub(crate) fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub(crate) fn error_text(mut self, error_text: impl Into<String>) -> Self {
        self.error_text = Some(error_text.into());
        self
    }

    pub(crate) fn info(&self, event: &'static str, message: &str) {
        let station = self.station.as_deref();
        let parameter = self.parameter.as_deref();
        info!(
            target: TARGET,
            event,
            station = station,
            parameter = parameter,
            value = self.value,
            error_text = ?self.error_text,
            "{}",
            message
        );
    }

    pub(crate) fn error<E: std::fmt::Debug>(&self, event: &'static str, err: &E, message: &str) {
        let station = self.station.as_deref();
        let parameter = self.parameter.as_deref();
        error!(
            target: TARGET,
            event,
            station = station,
            parameter = parameter,
            value = self.value,
            error_text = ?self.error_text,
            error = ?err,
            "{}",
            message
        );
    }
}
