use crate::station::StationReading;
use anyhow::Result;
use vozdukh_graphite::Client;

/// Sends two data points per measurement: `<key>.pdk` carrying the
/// regulatory norm and `<key>.value` carrying the observed value, both at
/// the measurement's observation time. Returns the number of points sent.
pub async fn send_reading(client: &mut Client, reading: &StationReading) -> Result<usize> {
    let mut sent = 0usize;
    for measurement in reading.iter() {
        let key = measurement.key();
        let timestamp = measurement.last_update_seconds();
        client
            .send(&format!("{key}.pdk"), measurement.norma, timestamp)
            .await?;
        client
            .send(&format!("{key}.value"), measurement.value, timestamp)
            .await?;
        sent += 2;
    }
    Ok(sent)
}
