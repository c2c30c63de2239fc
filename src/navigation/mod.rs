//! Waypoint window computation
//!
//! This module finds the route waypoint closest to the vehicle and ahead of
//! its heading, and cuts the bounded window of waypoints published from there.
//! The calculator holds only configuration; all state lives in the stores.

mod updater;
mod window;

pub use updater::*;
pub use window::Window;

use log::info;
use nalgebra::distance as point_distance;
use std::f64::consts::FRAC_PI_4;
use std::time::Duration;

use crate::{Pose, Route, Waypoint, WindowConfig};

/// Finds the closest-ahead waypoint and builds windows from it
#[derive(Debug, Clone)]
pub struct WaypointWindowCalculator {
    lookahead: usize,
    debug: bool,
    frame_id: String,
}

impl WaypointWindowCalculator {
    /// Create a calculator from the window configuration
    pub fn new(config: &WindowConfig) -> Self {
        WaypointWindowCalculator {
            lookahead: config.lookahead,
            debug: config.debug,
            frame_id: config.frame_id.clone(),
        }
    }

    /// Configured maximum window length
    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    /// Index of the waypoint nearest to the pose position (3D Euclidean).
    ///
    /// Linear scan over the whole route; on exact ties the earliest index wins.
    pub fn closest_waypoint(pose: &Pose, route: &Route) -> usize {
        let waypoints = route.waypoints();
        if waypoints.len() == 1 {
            return 0;
        }

        let mut closest_len = f64::INFINITY;
        let mut closest_index = 0;
        for (i, wp) in waypoints.iter().enumerate() {
            let dist = point_distance(&pose.position, &wp.position);
            if dist < closest_len {
                closest_len = dist;
                closest_index = i;
            }
        }
        closest_index
    }

    /// Index of the first waypoint to publish.
    ///
    /// Starts from the closest waypoint and moves one step forward if the
    /// bearing to it differs from the vehicle yaw by more than pi/4. The
    /// difference is not wrapped and the step is taken at most once, so the
    /// result may be `route.len()` when the closest waypoint is the last one.
    pub fn next_waypoint(&self, pose: &Pose, route: &Route) -> usize {
        let mut index = Self::closest_waypoint(pose, route);
        // closest_waypoint never leaves the route
        let closest = &route.waypoints()[index];

        let heading = Self::heading(pose, closest);
        let yaw = pose.yaw();
        let angle = (heading - yaw).abs();

        if self.debug {
            info!(
                "current_pose - x: {:.3}, y: {:.3}, z: {:.3}",
                pose.position.x, pose.position.y, pose.position.z
            );
            info!("ego yaw: {:.4}", yaw);
            info!("heading: {:.4}, angle: {:.4}", heading, angle);
            info!(
                "closest wp: {}; {:.3}-{:.3}",
                index, closest.position.x, closest.position.y
            );
        }

        if angle > FRAC_PI_4 {
            index += 1;
            if self.debug {
                match route.get(index) {
                    Some(wp) => info!("corrected wp: {}; {:.3}-{:.3}", index, wp.position.x, wp.position.y),
                    None => info!("corrected wp: {}; past the end of the route", index),
                }
            }
        }

        index
    }

    /// Bearing from the vehicle to `waypoint` in the horizontal plane
    pub fn heading(pose: &Pose, waypoint: &Waypoint) -> f64 {
        (waypoint.position.y - pose.position.y).atan2(waypoint.position.x - pose.position.x)
    }

    /// Up to `lookahead` consecutive waypoints starting at `start_index`.
    ///
    /// Clipped at the end of the route, never wraps; empty when `start_index`
    /// is at or past the end.
    pub fn build_window(&self, route: &Route, start_index: usize, lookahead: usize) -> Window {
        let waypoints = route.waypoints();
        let start = start_index.min(waypoints.len());
        let end = start.saturating_add(lookahead).min(waypoints.len());

        Window {
            frame_id: self.frame_id.clone(),
            stamp: Duration::ZERO,
            start_index,
            waypoints: waypoints[start..end].to_vec(),
        }
    }

    /// Window of the configured length ahead of `pose`
    pub fn compute(&self, pose: &Pose, route: &Route) -> Window {
        let start_index = self.next_waypoint(pose, route);
        self.build_window(route, start_index, self.lookahead)
    }

    /// Path length along the route from waypoint `from` to waypoint `to`, inclusive.
    ///
    /// `to` is clamped to the last waypoint; an empty or reversed range is 0.
    pub fn distance(route: &Route, from: usize, to: usize) -> f64 {
        let waypoints = route.waypoints();
        let to = to.min(waypoints.len() - 1);
        if from >= to {
            return 0.0;
        }

        waypoints[from..=to]
            .windows(2)
            .map(|pair| point_distance(&pair[0].position, &pair[1].position))
            .sum()
    }

    /// Target velocity of a waypoint
    pub fn get_velocity(waypoint: &Waypoint) -> f64 {
        waypoint.velocity()
    }

    /// Set the target velocity of a waypoint
    pub fn set_velocity(waypoint: &mut Waypoint, velocity: f64) {
        waypoint.set_velocity(velocity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn straight_route(n: usize) -> Route {
        Route::new((0..n).map(|i| Waypoint::new(i as f64, 0.0, 0.0, 10.0)).collect()).unwrap()
    }

    fn calculator(lookahead: usize) -> WaypointWindowCalculator {
        WaypointWindowCalculator::new(&WindowConfig {
            lookahead,
            ..WindowConfig::default()
        })
    }

    #[test]
    fn single_waypoint_route_is_its_own_closest() {
        let route = Route::new(vec![Waypoint::new(100.0, 100.0, 0.0, 5.0)]).unwrap();
        let pose = Pose::from_xyz_yaw(0.0, 0.0, 0.0, 0.0);
        assert_eq!(WaypointWindowCalculator::closest_waypoint(&pose, &route), 0);
    }

    #[test]
    fn closest_uses_all_three_axes() {
        let route = Route::new(vec![
            Waypoint::new(0.0, 0.0, 5.0, 0.0),
            Waypoint::new(2.0, 0.0, 0.0, 0.0),
        ])
        .unwrap();
        let pose = Pose::from_xyz_yaw(0.0, 0.0, 0.0, 0.0);
        assert_eq!(WaypointWindowCalculator::closest_waypoint(&pose, &route), 1);
    }

    #[test]
    fn closest_tie_goes_to_first_index() {
        // Both waypoints are exactly 1m away
        let route = Route::new(vec![
            Waypoint::new(5.0, 0.0, 0.0, 0.0),
            Waypoint::new(-1.0, 0.0, 0.0, 0.0),
            Waypoint::new(1.0, 0.0, 0.0, 0.0),
        ])
        .unwrap();
        let pose = Pose::from_xyz_yaw(0.0, 0.0, 0.0, 0.0);
        assert_eq!(WaypointWindowCalculator::closest_waypoint(&pose, &route), 1);
    }

    #[test]
    fn waypoint_ahead_is_kept() {
        let pose = Pose::from_xyz_yaw(3.6, 0.0, 0.0, 0.0);
        assert_eq!(calculator(3).next_waypoint(&pose, &straight_route(10)), 4);
    }

    #[test]
    fn waypoint_behind_is_skipped() {
        let pose = Pose::from_xyz_yaw(4.2, 0.0, 0.0, 0.0);
        assert_eq!(calculator(3).next_waypoint(&pose, &straight_route(10)), 5);
    }

    #[test]
    fn off_heading_threshold_is_pi_over_four() {
        let calc = calculator(3);
        let pose = Pose::from_xyz_yaw(0.0, 0.0, 0.0, 0.0);

        // bearing atan2(0.9, 1.0) ~ 0.733 rad, inside the threshold
        let inside = Route::new(vec![Waypoint::new(1.0, 0.9, 0.0, 0.0), Waypoint::new(10.0, 10.0, 0.0, 0.0)]).unwrap();
        assert_eq!(calc.next_waypoint(&pose, &inside), 0);

        // bearing atan2(1.1, 1.0) ~ 0.833 rad, outside the threshold
        let outside = Route::new(vec![Waypoint::new(1.0, 1.1, 0.0, 0.0), Waypoint::new(10.0, 10.0, 0.0, 0.0)]).unwrap();
        assert_eq!(calc.next_waypoint(&pose, &outside), 1);
    }

    #[test]
    fn angle_is_not_wrapped() {
        // Waypoint straight ahead of a vehicle facing -x: bearing is +pi, yaw may be
        // reported as -pi, giving a raw difference of 2*pi
        let route = Route::new(vec![Waypoint::new(-1.0, 0.0, 0.0, 0.0), Waypoint::new(-2.0, 0.0, 0.0, 0.0)]).unwrap();
        let pose = Pose::from_xyz_yaw(-0.5, 0.0, 0.0, -PI + 1e-6);
        assert_eq!(calculator(3).next_waypoint(&pose, &route), 1);
    }

    #[test]
    fn overrun_past_last_waypoint_gives_empty_window() {
        let calc = calculator(5);
        let route = straight_route(3);
        let pose = Pose::from_xyz_yaw(2.5, 0.0, 0.0, 0.0);
        let start = calc.next_waypoint(&pose, &route);
        assert_eq!(start, 3);
        let window = calc.build_window(&route, start, 5);
        assert!(window.is_empty());
        assert_eq!(window.start_index, 3);
    }

    #[test]
    fn window_is_tagged_with_frame() {
        let window = calculator(3).compute(&Pose::from_xyz_yaw(0.0, 0.0, 0.0, 0.0), &straight_route(10));
        assert_eq!(window.frame_id, "/world");
        assert_eq!(window.stamp, Duration::ZERO);
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn window_far_past_the_end_is_empty() {
        let window = calculator(3).build_window(&straight_route(4), usize::MAX, usize::MAX);
        assert!(window.is_empty());
    }

    #[test]
    fn distance_sums_segments() {
        let route = Route::new(vec![
            Waypoint::new(0.0, 0.0, 0.0, 0.0),
            Waypoint::new(3.0, 4.0, 0.0, 0.0),
            Waypoint::new(3.0, 4.0, 12.0, 0.0),
            Waypoint::new(3.0, 4.0, 13.0, 0.0),
        ])
        .unwrap();
        assert!((WaypointWindowCalculator::distance(&route, 0, 1) - 5.0).abs() < 1e-12);
        assert!((WaypointWindowCalculator::distance(&route, 0, 2) - 17.0).abs() < 1e-12);
        assert!((WaypointWindowCalculator::distance(&route, 1, 3) - 13.0).abs() < 1e-12);
        assert_eq!(WaypointWindowCalculator::distance(&route, 2, 2), 0.0);
        assert_eq!(WaypointWindowCalculator::distance(&route, 3, 1), 0.0);
        // end index past the route is clamped
        assert!((WaypointWindowCalculator::distance(&route, 0, 99) - 18.0).abs() < 1e-12);
    }

    #[test]
    fn velocity_accessors_touch_only_the_target() {
        let mut wp = Waypoint::new(1.0, 2.0, 3.0, 8.0);
        assert_eq!(WaypointWindowCalculator::get_velocity(&wp), 8.0);
        WaypointWindowCalculator::set_velocity(&mut wp, 0.0);
        assert_eq!(WaypointWindowCalculator::get_velocity(&wp), 0.0);
        assert_eq!(wp.position.z, 3.0);
    }
}
