// state/store.rs

// Last-writer-wins containers for the route and the vehicle pose. Neither one
// triggers any computation; the updater decides when to read them.

use std::sync::Arc;

use super::waypoint::{Pose, Route};

/// Holds the most recently loaded route.
///
/// The route is kept behind an `Arc` so a window computation that already took
/// a snapshot keeps using it even if a new route is loaded meanwhile.
#[derive(Debug, Default)]
pub struct RouteStore {
    route: Option<Arc<Route>>,
}

impl RouteStore {
    /// Empty store, no route loaded yet
    pub fn new() -> Self {
        RouteStore { route: None }
    }

    /// Replace any previously stored route
    pub fn load(&mut self, route: Route) {
        self.route = Some(Arc::new(route));
    }

    /// Snapshot of the current route, if one has arrived
    pub fn current(&self) -> Option<Arc<Route>> {
        self.route.clone()
    }

    /// Whether a route has been loaded
    pub fn is_loaded(&self) -> bool {
        self.route.is_some()
    }
}

/// Holds the latest vehicle pose; older poses are discarded.
#[derive(Debug, Default)]
pub struct PoseTracker {
    pose: Option<Pose>,
}

impl PoseTracker {
    /// Tracker with no pose received yet
    pub fn new() -> Self {
        PoseTracker { pose: None }
    }

    /// Overwrite the current pose
    pub fn update(&mut self, pose: Pose) {
        self.pose = Some(pose);
    }

    /// Latest pose, if any
    pub fn current(&self) -> Option<Pose> {
        self.pose
    }
}
