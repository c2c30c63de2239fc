// src/ros_interface/publisher.rs
// Publishes computed windows as styx_msgs/Lane messages.

use r2r::builtin_interfaces::msg::Time;
use r2r::geometry_msgs::msg::{Point, PoseStamped, Quaternion, TwistStamped};
use r2r::std_msgs::msg::Header;
use r2r::styx_msgs::msg::{Lane, Waypoint as WaypointMsg};
use r2r::{Clock, ClockType, QosProfile};

use crate::{UpdaterError, Waypoint, Window, WindowPublisher};

/// Publishes windows as styx_msgs/Lane on the output topic
pub struct LanePublisher {
    inner: r2r::Publisher<Lane>,
    clock: Option<Clock>,
}

impl LanePublisher {
    /// Create a new publisher on the given topic with specified QoS.
    /// With `stamp_with_clock` the header carries the current ROS time instead of
    /// the window's own stamp.
    pub fn new(
        node: &mut r2r::Node,
        topic: &str,
        qos: QosProfile,
        stamp_with_clock: bool,
    ) -> Result<Self, UpdaterError> {
        let inner = node.create_publisher::<Lane>(topic, qos)?;
        let clock = if stamp_with_clock {
            Some(Clock::create(ClockType::RosTime)?)
        } else {
            None
        };
        Ok(LanePublisher { inner, clock })
    }
}

impl WindowPublisher for LanePublisher {
    fn publish(&mut self, window: &Window) -> Result<(), UpdaterError> {
        let stamp = match self.clock.as_mut() {
            Some(clock) => Clock::to_builtin_time(&clock.get_now()?),
            None => Time {
                sec: window.stamp.as_secs() as i32,
                nanosec: window.stamp.subsec_nanos(),
            },
        };

        let msg = lane_from_window(window, stamp);
        self.inner
            .publish(&msg)
            .map_err(|e| UpdaterError::PublishError(e.to_string()))
    }
}

/// Window to a Lane message with the given header stamp
pub fn lane_from_window(window: &Window, stamp: Time) -> Lane {
    let header = Header {
        stamp,
        frame_id: window.frame_id.clone(),
    };

    Lane {
        header: header.clone(),
        waypoints: window
            .waypoints
            .iter()
            .map(|wp| waypoint_to_msg(wp, &header))
            .collect(),
    }
}

fn waypoint_to_msg(wp: &Waypoint, header: &Header) -> WaypointMsg {
    let mut msg = WaypointMsg::default();
    msg.pose = PoseStamped {
        header: header.clone(),
        ..PoseStamped::default()
    };
    msg.pose.pose.position = Point {
        x: wp.position.x,
        y: wp.position.y,
        z: wp.position.z,
    };
    let q = wp.orientation.quaternion();
    msg.pose.pose.orientation = Quaternion {
        x: q.i,
        y: q.j,
        z: q.k,
        w: q.w,
    };
    msg.twist = TwistStamped {
        header: header.clone(),
        ..TwistStamped::default()
    };
    msg.twist.twist.linear.x = wp.velocity;
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn lane_carries_frame_positions_and_velocities() {
        let window = Window {
            frame_id: "/world".to_string(),
            stamp: Duration::ZERO,
            start_index: 4,
            waypoints: vec![Waypoint::new(4.0, 0.0, 0.0, 10.0), Waypoint::new(5.0, 1.0, 0.0, 7.5)],
        };

        let lane = lane_from_window(&window, Time { sec: 0, nanosec: 0 });
        assert_eq!(lane.header.frame_id, "/world");
        assert_eq!(lane.waypoints.len(), 2);
        assert_eq!(lane.waypoints[1].pose.pose.position.y, 1.0);
        assert_eq!(lane.waypoints[1].twist.twist.linear.x, 7.5);
        assert_eq!(lane.waypoints[0].pose.pose.orientation.w, 1.0);
    }
}
