//! Configuration files describing scans.

pub mod scan;

pub use scan::{Config, TrajectoryConfig, VolumeConfig, read_config_file};
