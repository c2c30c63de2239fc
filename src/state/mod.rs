// state/mod.rs

// Route and pose state for the waypoint updater. The route and the latest pose are
// each held by a small owned container; the navigation module only ever reads them.

/// Route and pose containers
pub mod store;
/// Waypoint, route and pose types
pub mod waypoint;

pub use store::{PoseTracker, RouteStore};
pub use waypoint::{Pose, Route, Waypoint};
