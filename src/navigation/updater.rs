// src/navigation/updater.rs
// Drives the window calculator from incoming route and pose events and hands
// every computed window to a WindowPublisher.

use log::{debug, error, info, trace, warn};

use super::{WaypointWindowCalculator, Window};
use crate::{Pose, PoseTracker, Route, RouteStore, UpdaterConfig, UpdaterError, Waypoint};

/// Downstream consumer of computed windows
#[cfg_attr(test, mockall::automock)]
pub trait WindowPublisher {
    /// Forward one window
    fn publish(&mut self, window: &Window) -> Result<(), UpdaterError>;
}

/// Snapshot of the updater's state for monitoring
#[derive(Debug, Clone, PartialEq)]
pub struct UpdaterStatus {
    /// Waypoints in the loaded route, if any
    pub route_len: Option<usize>,
    /// Whether a pose has been received
    pub has_pose: bool,
    /// Windows handed to the publisher so far
    pub windows_published: u64,
    /// Start index of the last published window
    pub last_start_index: Option<usize>,
}

/// Event handler owning the route and pose state.
///
/// Events are expected one at a time; the ROS runner serializes them.
pub struct WaypointUpdater<P: WindowPublisher> {
    calculator: WaypointWindowCalculator,
    routes: RouteStore,
    poses: PoseTracker,
    publisher: P,
    publish_on_route_update: bool,
    windows_published: u64,
    last_start_index: Option<usize>,
}

impl<P: WindowPublisher> WaypointUpdater<P> {
    /// Create an updater with no route and no pose
    pub fn new(config: &UpdaterConfig, publisher: P) -> Self {
        WaypointUpdater {
            calculator: WaypointWindowCalculator::new(&config.window_config),
            routes: RouteStore::new(),
            poses: PoseTracker::new(),
            publisher,
            publish_on_route_update: config.window_config.publish_on_route_update,
            windows_published: 0,
            last_start_index: None,
        }
    }

    /// Handle a pose update: store it and publish a fresh window if a route is loaded.
    ///
    /// Returns the start index of the published window.
    pub fn on_pose(&mut self, pose: Pose) -> Option<usize> {
        self.poses.update(pose);
        self.publish_window()
    }

    /// Handle a route update: replace the stored route.
    ///
    /// Empty routes are rejected and the previous route stays in place. No
    /// window is published unless `publish_on_route_update` is set.
    pub fn on_route(&mut self, waypoints: Vec<Waypoint>) -> Option<usize> {
        let route = match Route::new(waypoints) {
            Ok(route) => route,
            Err(e) => {
                warn!("Ignoring route update: {}", e);
                return None;
            }
        };

        info!("Loaded route with {} waypoints", route.len());
        self.routes.load(route);

        if self.publish_on_route_update {
            self.publish_window()
        } else {
            None
        }
    }

    /// Traffic light stop index; accepted and ignored
    pub fn on_traffic(&mut self, stop_index: i32) {
        trace!("Traffic waypoint {} ignored", stop_index);
    }

    /// Obstacle index; accepted and ignored
    pub fn on_obstacle(&mut self, obstacle_index: i32) {
        trace!("Obstacle waypoint {} ignored", obstacle_index);
    }

    /// Current state summary
    pub fn get_status(&self) -> UpdaterStatus {
        UpdaterStatus {
            route_len: self.routes.current().map(|route| route.len()),
            has_pose: self.poses.current().is_some(),
            windows_published: self.windows_published,
            last_start_index: self.last_start_index,
        }
    }

    /// The window calculator in use
    pub fn calculator(&self) -> &WaypointWindowCalculator {
        &self.calculator
    }

    fn publish_window(&mut self) -> Option<usize> {
        let (route, pose) = match (self.routes.current(), self.poses.current()) {
            (Some(route), Some(pose)) => (route, pose),
            _ => {
                trace!("Route or pose missing, nothing to publish");
                return None;
            }
        };

        let window = self.calculator.compute(&pose, &route);
        debug!(
            "Window starts at {} with {} of {} waypoints",
            window.start_index,
            window.len(),
            route.len()
        );

        match self.publisher.publish(&window) {
            Ok(()) => {
                self.windows_published += 1;
                self.last_start_index = Some(window.start_index);
                Some(window.start_index)
            }
            Err(e) => {
                error!("Failed to publish window: {}", e);
                None
            }
        }
    }
}
