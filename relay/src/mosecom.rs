use crate::logging;
use crate::station::{StationPopup, StationReading};
use anyhow::{Context, Result};
use reqwest::Client as HTTPClient;

const STATION_POPUP_URL: &str =
    "https://mosecom.mos.ru/wp-content/themes/moseco/map/station-popup.php";
const LOCALE: &str = "ru_RU";
const MAP_TYPE: &str = "air";

/// Fetches the current reading for one station. A non-success status yields
/// an empty reading rather than an error.
pub async fn fetch_station_reading(
    http_client: &HTTPClient,
    station_name: &str,
) -> Result<StationReading> {
    fetch_station_reading_from(http_client, STATION_POPUP_URL, station_name).await
}

async fn fetch_station_reading_from(
    http_client: &HTTPClient,
    url: &str,
    station_name: &str,
) -> Result<StationReading> {
    let params = [
        ("locale", LOCALE),
        ("station_name", station_name),
        ("mapType", MAP_TYPE),
    ];
    let response = http_client
        .post(url)
        .form(&params)
        .send()
        .await
        .context("requesting station popup")?;

    if !response.status().is_success() {
        logging::Logger::new()
            .station(station_name)
            .error_text(response.status().to_string())
            .info(
                "mosecom.fetch.non_success",
                "Non-success response, returning empty reading",
            );
        return Ok(StationReading::empty(station_name));
    }

    let popup: StationPopup = response.json().await.context("decoding station popup")?;
    StationReading::from_popup(station_name, popup)
}
