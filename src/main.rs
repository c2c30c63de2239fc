// src/main.rs
// Entry point for the waypoint updater node.

// - r2r (through RosInterface): node, subscriptions and the window publisher.
// - env_logger: logging, `RUST_LOG` overrides the default `info` level.
// - First argument: optional YAML configuration file.
use env_logger::Env;
use log::{error, info};
use std::error::Error;
use waypoint_updater::{RosInterface, UpdaterConfig, WaypointUpdater};

/// Load the configuration, wire the node and spin until interrupted.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    info!("Starting waypoint updater...");

    let config = match std::env::args().nth(1) {
        Some(path) => UpdaterConfig::from_file(&path)?,
        None => {
            info!("No configuration file given, using defaults");
            UpdaterConfig::default()
        }
    };
    let mut ros = RosInterface::new(&config.ros_config).map_err(|e| {
        error!("Could not start waypoint updater node: {}", e);
        e
    })?;
    let publisher = ros.create_publisher()?;
    let updater = WaypointUpdater::new(&config, publisher);
    info!(
        "Lookahead {} waypoints, frame '{}', debug {}",
        updater.calculator().lookahead(),
        config.window_config.frame_id,
        config.window_config.debug
    );

    ros.run(updater)?;
    Ok(())
}
