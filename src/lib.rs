//! Waypoint Updater - forward-looking route window for a driving vehicle
//!
//! This library keeps the latest vehicle pose and the global route, and on every
//! pose update publishes the slice of the route that lies ahead of the vehicle.
//! The ROS 2 transport lives behind the `ros` feature so the core builds and
//! tests without a ROS installation.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod state;
pub mod navigation;
#[cfg(feature = "ros")]
pub mod ros_interface;

// Re-export commonly used items for easier access
pub use state::{Pose, PoseTracker, Route, RouteStore, Waypoint};
pub use navigation::{UpdaterStatus, WaypointUpdater, WaypointWindowCalculator, Window, WindowPublisher};
#[cfg(feature = "ros")]
pub use ros_interface::{LanePublisher, RosInterface};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of waypoints published ahead of the vehicle unless configured otherwise
pub const DEFAULT_LOOKAHEAD: usize = 200;

/// Main configuration structure for the waypoint updater
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UpdaterConfig {
    /// ROS 2 configuration
    pub ros_config: RosConfig,
    /// Window computation parameters
    pub window_config: WindowConfig,
}

/// ROS 2 specific configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosConfig {
    /// Node name
    pub node_name: String,
    /// Node namespace
    pub namespace: String,
    /// Vehicle pose input (`geometry_msgs/PoseStamped`)
    pub pose_topic: String,
    /// Global route input (`styx_msgs/Lane`)
    pub route_topic: String,
    /// Traffic light stop index input (`std_msgs/Int32`)
    pub traffic_topic: String,
    /// Obstacle index input (`std_msgs/Int32`)
    pub obstacle_topic: String,
    /// Window output (`styx_msgs/Lane`)
    pub window_topic: String,
    /// QoS history depth for the window publisher
    pub qos_depth: usize,
    /// How long a single spin waits for work, in milliseconds
    pub spin_period_ms: u64,
    /// Stamp outgoing windows with the ROS clock instead of time zero
    pub stamp_with_clock: bool,
}

/// Window computation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Maximum number of waypoints in a published window
    pub lookahead: usize,
    /// Report the search geometry (heading, yaw, angle, index) on every tick
    pub debug: bool,
    /// Recompute and publish as soon as a route arrives if a pose is known
    pub publish_on_route_update: bool,
    /// Reference frame attached to every window
    pub frame_id: String,
}

impl Default for RosConfig {
    fn default() -> Self {
        RosConfig {
            node_name: "waypoint_updater".to_string(),
            namespace: String::new(),
            pose_topic: "/current_pose".to_string(),
            route_topic: "/base_waypoints".to_string(),
            traffic_topic: "/traffic_waypoint".to_string(),
            obstacle_topic: "/obstacle_waypoint".to_string(),
            window_topic: "final_waypoints".to_string(),
            qos_depth: 1,
            spin_period_ms: 100,
            stamp_with_clock: false,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            lookahead: DEFAULT_LOOKAHEAD,
            debug: false,
            publish_on_route_update: false,
            frame_id: "/world".to_string(),
        }
    }
}

impl UpdaterConfig {
    /// Load a configuration from a YAML file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, UpdaterError> {
        let config_file = std::fs::File::open(path.as_ref())?;
        let config: UpdaterConfig = serde_yaml::from_reader(config_file)?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse a configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, UpdaterError> {
        let config: UpdaterConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the updater cannot run with
    pub fn validate(&self) -> Result<(), UpdaterError> {
        if self.window_config.lookahead == 0 {
            return Err(UpdaterError::ConfigError("lookahead must be at least 1".to_string()));
        }
        if self.ros_config.qos_depth == 0 {
            return Err(UpdaterError::ConfigError("qos_depth must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Waypoint updater error types
#[derive(Debug)]
pub enum UpdaterError {
    /// A route without any waypoints was offered
    EmptyRoute,
    /// Configuration error
    ConfigError(String),
    /// ROS interface error
    RosError(String),
    /// Window could not be handed to the downstream consumer
    PublishError(String),
}

impl std::fmt::Display for UpdaterError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            UpdaterError::EmptyRoute => write!(f, "Route contains no waypoints"),
            UpdaterError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            UpdaterError::RosError(msg) => write!(f, "ROS error: {}", msg),
            UpdaterError::PublishError(msg) => write!(f, "Publish error: {}", msg),
        }
    }
}

impl std::error::Error for UpdaterError {}

impl From<std::io::Error> for UpdaterError {
    fn from(e: std::io::Error) -> Self {
        UpdaterError::ConfigError(e.to_string())
    }
}

impl From<serde_yaml::Error> for UpdaterError {
    fn from(e: serde_yaml::Error) -> Self {
        UpdaterError::ConfigError(e.to_string())
    }
}

#[cfg(feature = "ros")]
impl From<r2r::Error> for UpdaterError {
    fn from(e: r2r::Error) -> Self {
        UpdaterError::RosError(e.to_string())
    }
}
