use anyhow::Result;
use reqwest::Client as HTTPClient;
use serde::Serialize;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod emit;
mod logging;
mod mosecom;
mod station;

#[derive(Serialize)]
struct RelayResult {
    message: String,
    station: String,
    measurements_found: usize,
    points_sent: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()) // Enable log level filtering via `RUST_LOG` env var
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .with_target(false)
        .without_time()
        .init();

    let relay_config = config::RelayConfig::from_env();
    let http_client = HTTPClient::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let reading = mosecom::fetch_station_reading(&http_client, &relay_config.station_name)
        .await
        .inspect_err(|e| {
            logging::Logger::new()
                .station(&relay_config.station_name)
                .error("mosecom.fetch_failed", &e, "Error fetching station reading");
        })?;

    let points_sent = match relay_config.graphite_host.as_deref() {
        Some(host) => {
            let prefix = format!("{}.{}", relay_config.metrics_prefix, reading.station);
            let mut graphite_client = vozdukh_graphite::Client::connect(host, prefix).await?;
            logging::Logger::new().station(&reading.station).info(
                "graphite.connected",
                &format!("Emitting under prefix {}", graphite_client.prefix()),
            );
            emit::send_reading(&mut graphite_client, &reading).await?
        }
        None => {
            if reading.is_empty() {
                logging::Logger::new()
                    .station(&reading.station)
                    .info("reading.empty", "No measurements parsed");
            }
            for measurement in reading.iter() {
                logging::Logger::new()
                    .station(&reading.station)
                    .parameter(&measurement.name)
                    .value(measurement.value)
                    .info("reading.measurement", &measurement.to_string());
            }
            0
        }
    };

    let result = RelayResult {
        message: format!(
            "Relayed {} measurements for {}",
            reading.len(),
            reading.station
        ),
        station: reading.station.clone(),
        measurements_found: reading.len(),
        points_sent,
    };
    info!(
        target: logging::TARGET,
        result = %serde_json::to_string(&result)?,
        "Relay finished"
    );
    Ok(())
}
