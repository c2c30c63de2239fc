// src/ros_interface/subscriber.rs
// Converts incoming ROS 2 messages into the updater's own types.

use nalgebra::{Point3, Quaternion, UnitQuaternion};
use r2r::geometry_msgs::msg::{Point, PoseStamped, Quaternion as QuaternionMsg};
use r2r::styx_msgs::msg::Lane;

use crate::{Pose, Waypoint};

/// Quaternions with a norm below this are treated as unset
const MIN_QUATERNION_NORM: f64 = 1e-9;

/// Point message to a nalgebra point
pub fn point_from_msg(msg: &Point) -> Point3<f64> {
    Point3::new(msg.x, msg.y, msg.z)
}

/// Orientation message to a unit quaternion.
/// A zero quaternion (the message default) maps to the identity.
pub fn orientation_from_msg(msg: &QuaternionMsg) -> UnitQuaternion<f64> {
    UnitQuaternion::try_new(Quaternion::new(msg.w, msg.x, msg.y, msg.z), MIN_QUATERNION_NORM)
        .unwrap_or_else(UnitQuaternion::identity)
}

/// Vehicle pose from `/current_pose`
pub fn pose_from_msg(msg: &PoseStamped) -> Pose {
    Pose::new(
        point_from_msg(&msg.pose.position),
        orientation_from_msg(&msg.pose.orientation),
    )
}

/// Route waypoints from `/base_waypoints`; the target velocity is the twist's linear x
pub fn waypoints_from_lane(msg: &Lane) -> Vec<Waypoint> {
    msg.waypoints
        .iter()
        .map(|wp| Waypoint {
            position: point_from_msg(&wp.pose.pose.position),
            orientation: orientation_from_msg(&wp.pose.pose.orientation),
            velocity: wp.twist.twist.linear.x,
        })
        .collect()
}
