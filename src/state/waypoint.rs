// state/waypoint.rs

// Geometric types shared by the stores and the window calculator. Positions are
// nalgebra points in the map frame, orientations are unit quaternions.

use nalgebra::{Point3, UnitQuaternion};
use serde::{Deserialize, Serialize};

use crate::UpdaterError;

/// One point on the global route.
///
/// The orientation is carried through to the published window untouched; only
/// the position takes part in the search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Position in the map frame (meters)
    pub position: Point3<f64>,
    /// Orientation of the route at this point
    pub orientation: UnitQuaternion<f64>,
    /// Target linear velocity (m/s)
    pub velocity: f64,
}

impl Waypoint {
    /// Waypoint at `(x, y, z)` with identity orientation
    pub fn new(x: f64, y: f64, z: f64, velocity: f64) -> Self {
        Waypoint {
            position: Point3::new(x, y, z),
            orientation: UnitQuaternion::identity(),
            velocity,
        }
    }

    /// Target velocity of this waypoint
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Overwrite the target velocity
    pub fn set_velocity(&mut self, velocity: f64) {
        self.velocity = velocity;
    }
}

/// Instantaneous vehicle state: position and attitude in the map frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position in the map frame (meters)
    pub position: Point3<f64>,
    /// Attitude of the vehicle
    pub orientation: UnitQuaternion<f64>,
}

impl Pose {
    /// Pose from a position and an orientation
    pub fn new(position: Point3<f64>, orientation: UnitQuaternion<f64>) -> Self {
        Pose { position, orientation }
    }

    /// Planar pose: level vehicle at `(x, y, z)` rotated by `yaw` about the vertical axis
    pub fn from_xyz_yaw(x: f64, y: f64, z: f64, yaw: f64) -> Self {
        Pose {
            position: Point3::new(x, y, z),
            orientation: UnitQuaternion::from_euler_angles(0.0, 0.0, yaw),
        }
    }

    /// Rotation about the vertical axis in radians, in `[-pi, pi]`
    pub fn yaw(&self) -> f64 {
        self.orientation.euler_angles().2
    }
}

/// Ordered, non-empty sequence of waypoints. Insertion order is traversal order.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    waypoints: Vec<Waypoint>,
}

impl Route {
    /// Build a route, rejecting an empty waypoint list
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, UpdaterError> {
        if waypoints.is_empty() {
            return Err(UpdaterError::EmptyRoute);
        }
        Ok(Route { waypoints })
    }

    /// Number of waypoints (always at least one)
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false for a constructed route
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// All waypoints in traversal order
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Waypoint at `index`, if any
    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn empty_route_is_rejected() {
        assert!(matches!(Route::new(Vec::new()), Err(UpdaterError::EmptyRoute)));
    }

    #[test]
    fn route_keeps_insertion_order() {
        let route = Route::new(vec![Waypoint::new(3.0, 0.0, 0.0, 1.0), Waypoint::new(1.0, 0.0, 0.0, 2.0)]).unwrap();
        assert_eq!(route.len(), 2);
        assert!(!route.is_empty());
        assert_eq!(route.get(0).unwrap().position.x, 3.0);
        assert_eq!(route.get(1).unwrap().velocity(), 2.0);
        assert!(route.get(2).is_none());
    }

    #[test]
    fn yaw_is_recovered_from_orientation() {
        assert!((Pose::from_xyz_yaw(0.0, 0.0, 0.0, FRAC_PI_2).yaw() - FRAC_PI_2).abs() < 1e-9);
        assert!(Pose::from_xyz_yaw(0.0, 0.0, 0.0, 0.0).yaw().abs() < 1e-12);
        // pi and -pi describe the same attitude
        assert!((Pose::from_xyz_yaw(0.0, 0.0, 0.0, PI).yaw().abs() - PI).abs() < 1e-9);
    }

    #[test]
    fn velocity_accessors() {
        let mut wp = Waypoint::new(0.0, 0.0, 0.0, 4.5);
        assert_eq!(wp.velocity(), 4.5);
        wp.set_velocity(11.0);
        assert_eq!(wp.velocity(), 11.0);
    }
}
