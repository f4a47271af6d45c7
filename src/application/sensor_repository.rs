// Repository trait for sensor data access
use crate::domain::sensor::{DeviceInfo, SensorReading, Timescale};
use async_trait::async_trait;

#[async_trait]
pub trait SensorRepository: Send + Sync {
    /// Most recent reading, optionally for one device
    async fn latest_reading(&self, device_ip: Option<&str>) -> anyhow::Result<Option<SensorReading>>;

    /// Raw readings inside the timescale window, oldest first
    async fn readings(
        &self,
        device_ip: Option<&str>,
        timescale: Timescale,
    ) -> anyhow::Result<Vec<SensorReading>>;

    /// Stores a reading that already carries its server timestamp
    async fn store_reading(&self, reading: SensorReading) -> anyhow::Result<SensorReading>;

    /// Inserts or refreshes a device, keeping its original registration time
    async fn upsert_device(&self, device: DeviceInfo) -> anyhow::Result<DeviceInfo>;
}
