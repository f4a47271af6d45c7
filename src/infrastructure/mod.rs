// Infrastructure layer - External dependencies and adapters
pub mod activity_log;
pub mod chart_snapshot;
pub mod config;
pub mod http_response;
pub mod mock_sensor_repository;
pub mod settings;
pub mod svg_surface;
