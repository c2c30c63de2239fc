// src/navigation/window.rs
// The bounded slice of the route published ahead of the vehicle.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Waypoint;

/// Forward-looking slice of the route, rebuilt on every pose update.
///
/// The waypoints are copies of the route entries, so downstream planners can
/// annotate velocities without touching the stored route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    /// Reference frame of every waypoint position
    pub frame_id: String,
    /// Stamp attached on output; zero means "latest available"
    pub stamp: Duration,
    /// Route index of the first waypoint
    pub start_index: usize,
    /// Waypoints in traversal order
    pub waypoints: Vec<Waypoint>,
}

impl Window {
    /// Number of waypoints in the window
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// True once the vehicle has run past the end of the route
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Target velocity of the `index`-th waypoint of the window
    pub fn velocity(&self, index: usize) -> Option<f64> {
        self.waypoints.get(index).map(Waypoint::velocity)
    }

    /// Overwrite the target velocity of the `index`-th waypoint.
    /// Returns false if the window has no such waypoint.
    pub fn set_velocity(&mut self, index: usize, velocity: f64) -> bool {
        match self.waypoints.get_mut(index) {
            Some(wp) => {
                wp.set_velocity(velocity);
                true
            }
            None => false,
        }
    }
}
