// Domain layer - Plain data for the robot map, chart series and sensor readings
pub mod robot;
pub mod sensor;
pub mod series;
