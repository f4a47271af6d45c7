// Mock sensor repository - random readings standing in for real devices
use crate::application::sensor_repository::SensorRepository;
use crate::domain::sensor::{DeviceInfo, SensorReading, Timescale};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

const DEFAULT_DEVICE_IP: &str = "192.168.4.20";

#[derive(Debug, Default)]
pub struct MockSensorRepository {
    devices: Mutex<HashMap<String, DeviceInfo>>,
}

impl MockSensorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample count and spacing used to fake a window's worth of history.
    fn sampling(timescale: Timescale) -> (usize, Duration) {
        match timescale {
            Timescale::Hour => (60, Duration::minutes(1)),
            Timescale::Day => (288, Duration::minutes(5)),
            Timescale::Month => (720, Duration::hours(1)),
            Timescale::Year => (365, Duration::days(1)),
            Timescale::All => (500, Duration::hours(1)),
        }
    }

    fn random_reading(rng: &mut impl Rng, device_ip: &str, at: DateTime<Utc>) -> SensorReading {
        let round1 = |v: f64| (v * 10.0).round() / 10.0;
        SensorReading {
            device_ip: Some(device_ip.to_string()),
            timestamp: Some(at.to_rfc3339_opts(SecondsFormat::Secs, true)),
            moisture: Some(round1(rng.gen_range(30.0..70.0))),
            temperature: Some(round1(rng.gen_range(20.0..30.0))),
            humidity: Some(round1(rng.gen_range(40.0..80.0))),
            ph: Some(round1(rng.gen_range(6.0..8.0))),
            light: Some(rng.gen_range(300..800) as f64),
            ..Default::default()
        }
    }

    fn device_for(&self, device_ip: &str) -> Option<DeviceInfo> {
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(device_ip)
            .cloned()
    }

    fn generate_history(device_ip: &str, timescale: Timescale) -> Vec<SensorReading> {
        let (count, spacing) = Self::sampling(timescale);
        let now = Utc::now();
        let mut rng = rand::thread_rng();
        (0..count)
            .map(|i| {
                let at = now - spacing * (count - 1 - i) as i32;
                Self::random_reading(&mut rng, device_ip, at)
            })
            .collect()
    }
}

#[async_trait]
impl SensorRepository for MockSensorRepository {
    async fn latest_reading(&self, device_ip: Option<&str>) -> Result<Option<SensorReading>> {
        let ip = device_ip.unwrap_or(DEFAULT_DEVICE_IP);
        let mut reading = Self::random_reading(&mut rand::thread_rng(), ip, Utc::now());
        reading.command_status = Some("idle".to_string());
        reading.device = self.device_for(ip);
        Ok(Some(reading))
    }

    async fn readings(
        &self,
        device_ip: Option<&str>,
        timescale: Timescale,
    ) -> Result<Vec<SensorReading>> {
        let ip = device_ip.unwrap_or(DEFAULT_DEVICE_IP);
        let history = Self::generate_history(ip, timescale);
        tracing::debug!("Generated {} mock readings for {} ({})", history.len(), ip, timescale);
        Ok(history)
    }

    async fn store_reading(&self, reading: SensorReading) -> Result<SensorReading> {
        // nothing is persisted
        tracing::debug!("Discarding stored reading for {:?}", reading.device_ip);
        Ok(reading)
    }

    async fn upsert_device(&self, mut device: DeviceInfo) -> Result<DeviceInfo> {
        let mut devices = self.devices.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = devices.get(&device.ip) {
            device.registered_at = existing.registered_at.clone();
        }
        devices.insert(device.ip.clone(), device.clone());
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_readings_fall_in_ranges() {
        let repo = MockSensorRepository::new();
        let history = repo.readings(Some("10.1.1.1"), Timescale::Day).await.unwrap();
        assert_eq!(history.len(), 288);
        for r in &history {
            let moisture = r.moisture.unwrap();
            assert!((30.0..=70.0).contains(&moisture));
            let ph = r.ph.unwrap();
            assert!((6.0..=8.0).contains(&ph));
            assert_eq!(r.device_ip.as_deref(), Some("10.1.1.1"));
        }
        assert!(history.windows(2).all(|w| w[0].parsed_timestamp() < w[1].parsed_timestamp()));
    }

    #[tokio::test]
    async fn test_upsert_keeps_registration_time() {
        let repo = MockSensorRepository::new();
        let device = DeviceInfo {
            id: "dev_1".to_string(),
            ip: "10.1.1.2".to_string(),
            port: 80,
            device_type: "soil_sensor".to_string(),
            registered_at: "2024-01-01T00:00:00Z".to_string(),
            last_seen: "2024-01-01T00:00:00Z".to_string(),
            status: "active".to_string(),
        };
        repo.upsert_device(device.clone()).await.unwrap();

        let again = repo
            .upsert_device(DeviceInfo {
                registered_at: "2024-06-01T00:00:00Z".to_string(),
                ..device
            })
            .await
            .unwrap();
        assert_eq!(again.registered_at, "2024-01-01T00:00:00Z");

        let latest = repo.latest_reading(Some("10.1.1.2")).await.unwrap().unwrap();
        assert_eq!(latest.device.map(|d| d.id), Some("dev_1".to_string()));
    }
}
