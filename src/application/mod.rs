// Application layer - Use cases and the collaborator traits they depend on
pub mod activity_sink;
pub mod axis_allocator;
pub mod chart_updater;
pub mod dashboard_session;
pub mod map_renderer;
pub mod position_engine;
pub mod sensor_repository;
pub mod sensor_service;
pub mod settings_store;
