use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

use crate::logging;

/// Format of the `dateTime` field reported by the station popup endpoint.
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Seconds from 1900-01-01T00:00:00 to the Unix epoch. Metric timestamps are
/// expressed relative to 1900.
const UNIX_OFFSET_FROM_1900: i64 = 2_208_988_800;

/// One parameter object as reported by the endpoint. `chemicalFormula` only
/// exists in the newer response variant.
#[derive(Debug, Deserialize)]
pub struct RawParameter {
    pub name: String,
    pub norma: f64,
    pub pdk: f64,
    pub modifyav: f64,
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "chemicalFormula")]
    pub chemical_formula: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StationPopup {
    pub parameters: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct Measurement {
    pub name: String,
    pub chemical_formula: Option<String>,
    pub norma: f64,
    pub pdk: f64,
    pub value: f64,
    pub last_update: NaiveDateTime,
}

impl Measurement {
    pub fn new(raw: RawParameter) -> Result<Self> {
        let last_update = NaiveDateTime::parse_from_str(&raw.date_time, DATE_TIME_FORMAT)
            .with_context(|| format!("parsing dateTime '{}' for '{}'", raw.date_time, raw.name))?;
        Ok(Self {
            name: raw.name,
            chemical_formula: raw.chemical_formula,
            norma: raw.norma,
            pdk: raw.pdk,
            value: raw.modifyav,
            last_update,
        })
    }

    /// Metric key: the chemical formula when the endpoint reports one, the
    /// parameter name otherwise.
    pub fn key(&self) -> &str {
        self.chemical_formula.as_deref().unwrap_or(&self.name)
    }

    /// Observation time as integer seconds since 1900-01-01T00:00:00.
    pub fn last_update_seconds(&self) -> i64 {
        self.last_update.and_utc().timestamp() + UNIX_OFFSET_FROM_1900
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.4}/{:.2} ({:.2} ПДК). Updated at {}",
            self.name, self.value, self.norma, self.pdk, self.last_update
        )
    }
}

/// All measurements reported for one station in a single fetch. Each reading
/// owns its collection; readings never share storage.
#[derive(Debug)]
pub struct StationReading {
    pub station: String,
    pub measurements: Vec<Measurement>,
}

impl StationReading {
    pub fn empty(station: impl Into<String>) -> Self {
        Self {
            station: station.into(),
            measurements: Vec::new(),
        }
    }

    /// Builds a reading from a decoded popup response. Parameter objects
    /// missing a required field are skipped; a malformed `dateTime` on a
    /// complete object is an error.
    pub fn from_popup(station: impl Into<String>, popup: StationPopup) -> Result<Self> {
        let station = station.into();
        let mut measurements = Vec::with_capacity(popup.parameters.len());
        for parameter in popup.parameters {
            match serde_json::from_value::<RawParameter>(parameter) {
                Ok(raw) => measurements.push(Measurement::new(raw)?),
                Err(err) => {
                    logging::Logger::new()
                        .station(&station)
                        .error_text(err.to_string())
                        .info("station.parameter_skipped", "Skipping incomplete parameter");
                }
            }
        }
        Ok(Self {
            station,
            measurements,
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Measurement> {
        self.measurements.iter()
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }
}

impl fmt::Display for StationReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for measurement in &self.measurements {
            writeln!(f, "{measurement}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn popup(parameters: Vec<Value>) -> StationPopup {
        StationPopup { parameters }
    }

    #[test]
    fn from_popup_skips_parameters_missing_required_fields() {
        let parameters = vec![
            json!({"name": "NO2", "norma": 0.04, "pdk": 0.5, "modifyav": 0.02, "dateTime": "2023-06-01 12:00:00.0"}),
            json!({"name": "CO", "norma": 3.0, "pdk": 0.1, "dateTime": "2023-06-01 12:00:00.0"}),
            json!({"name": "PM2.5", "norma": 0.035}),
            json!({"name": "O3", "norma": 0.03, "pdk": 0.2, "modifyav": 0.006, "dateTime": "2023-06-01 12:20:00.0"}),
        ];
        let reading = StationReading::from_popup("Туристская", popup(parameters)).unwrap();
        assert_eq!(reading.len(), 2);
        assert_eq!(reading.measurements[0].name, "NO2");
        assert_eq!(reading.measurements[1].name, "O3");
    }

    #[test]
    fn from_popup_fails_on_malformed_date_time() {
        let parameters = vec![
            json!({"name": "NO2", "norma": 0.04, "pdk": 0.5, "modifyav": 0.02, "dateTime": "01/06/2023 12:00"}),
        ];
        let result = StationReading::from_popup("Туристская", popup(parameters));
        assert!(result.is_err());
    }

    #[test]
    fn measurement_parses_spec_example() {
        let raw: RawParameter = serde_json::from_value(json!({
            "name": "NO2",
            "norma": 0.04,
            "pdk": 0.5,
            "modifyav": 0.02,
            "dateTime": "2023-06-01 12:00:00.0"
        }))
        .unwrap();
        let measurement = Measurement::new(raw).unwrap();
        assert_eq!(measurement.pdk, 0.5);
        assert_eq!(measurement.value, 0.02);
        assert_eq!(measurement.key(), "NO2");
    }

    #[test]
    fn measurement_parses_microsecond_fraction() {
        let raw: RawParameter = serde_json::from_value(json!({
            "name": "CO",
            "norma": 3.0,
            "pdk": 0.1,
            "modifyav": 0.3,
            "dateTime": "2023-06-01 12:00:00.123456"
        }))
        .unwrap();
        assert!(Measurement::new(raw).is_ok());
    }

    #[test]
    fn key_prefers_chemical_formula() {
        let raw: RawParameter = serde_json::from_value(json!({
            "name": "Диоксид азота",
            "chemicalFormula": "NO2",
            "norma": 0.04,
            "pdk": 0.5,
            "modifyav": 0.02,
            "dateTime": "2023-06-01 12:00:00.0"
        }))
        .unwrap();
        let measurement = Measurement::new(raw).unwrap();
        assert_eq!(measurement.key(), "NO2");
    }

    #[test]
    fn last_update_seconds_counts_from_1900() {
        let raw: RawParameter = serde_json::from_value(json!({
            "name": "NO2",
            "norma": 0.04,
            "pdk": 0.5,
            "modifyav": 0.02,
            "dateTime": "2023-01-01 00:00:00.0"
        }))
        .unwrap();
        let measurement = Measurement::new(raw).unwrap();
        assert_eq!(measurement.last_update_seconds(), 3_881_520_000);
    }
}
