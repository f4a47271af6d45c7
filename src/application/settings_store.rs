// Settings store trait - persisted key/value strings

pub const TRAIL_LIMIT_KEY: &str = "robotTrailLimit";
pub const TEMP_UNIT_KEY: &str = "tempUnit";

/// String key/value store. A missing key means "use the default".
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Fire-and-forget; implementations absorb their own failures.
    fn set(&self, key: &str, value: &str);
}
