//! ROS 2 interface for the waypoint updater
//!
//! This module handles all communication with ROS 2, including:
//! - Subscribing to the vehicle pose, the global route and the (ignored)
//!   traffic and obstacle indices
//! - Publishing the computed window
//! - Spinning the node so every callback runs on a single thread

mod publisher;
mod subscriber;

use futures::executor::LocalPool;
use futures::future;
use futures::stream::StreamExt;
use futures::task::LocalSpawnExt;
use log::info;
use r2r::geometry_msgs::msg::PoseStamped;
use r2r::std_msgs::msg::Int32;
use r2r::styx_msgs::msg::Lane;
use r2r::{Context, Node, QosProfile};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

pub use publisher::*;
pub use subscriber::*;

use crate::{RosConfig, UpdaterError, WaypointUpdater};

/// ROS 2 interface manager
pub struct RosInterface {
    node: Node,
    config: RosConfig,
}

impl RosInterface {
    /// Create the ROS context and node
    pub fn new(config: &RosConfig) -> Result<Self, UpdaterError> {
        let context = Context::create()?;
        let node = Node::create(context, &config.node_name, &config.namespace)?;
        info!("ROS 2 node '{}' created", config.node_name);

        Ok(RosInterface {
            node,
            config: config.clone(),
        })
    }

    /// Publisher for the window topic
    pub fn create_publisher(&mut self) -> Result<LanePublisher, UpdaterError> {
        let qos = QosProfile::default().keep_last(self.config.qos_depth);
        let publisher = LanePublisher::new(
            &mut self.node,
            &self.config.window_topic,
            qos,
            self.config.stamp_with_clock,
        )?;
        info!("Publishing windows to {}", self.config.window_topic);
        Ok(publisher)
    }

    /// Subscribe to all inputs and spin forever.
    ///
    /// Subscription streams run on a single-threaded pool that is drained after
    /// every spin, so route and pose events never overlap.
    pub fn run(mut self, updater: WaypointUpdater<LanePublisher>) -> Result<(), UpdaterError> {
        // Every stream task runs on the same LocalPool thread
        let updater = Rc::new(RefCell::new(updater));

        let pose_sub = self
            .node
            .subscribe::<PoseStamped>(&self.config.pose_topic, QosProfile::default())?;
        let route_sub = self
            .node
            .subscribe::<Lane>(&self.config.route_topic, QosProfile::default())?;
        let traffic_sub = self
            .node
            .subscribe::<Int32>(&self.config.traffic_topic, QosProfile::default())?;
        let obstacle_sub = self
            .node
            .subscribe::<Int32>(&self.config.obstacle_topic, QosProfile::default())?;
        info!(
            "Subscribed to {}, {}, {}, {}",
            self.config.pose_topic,
            self.config.route_topic,
            self.config.traffic_topic,
            self.config.obstacle_topic
        );

        let mut pool = LocalPool::new();
        let spawner = pool.spawner();

        let u = Rc::clone(&updater);
        spawner
            .spawn_local(pose_sub.for_each(move |msg| {
                u.borrow_mut().on_pose(pose_from_msg(&msg));
                future::ready(())
            }))
            .map_err(|e| UpdaterError::RosError(e.to_string()))?;

        let u = Rc::clone(&updater);
        spawner
            .spawn_local(route_sub.for_each(move |msg| {
                u.borrow_mut().on_route(waypoints_from_lane(&msg));
                future::ready(())
            }))
            .map_err(|e| UpdaterError::RosError(e.to_string()))?;

        let u = Rc::clone(&updater);
        spawner
            .spawn_local(traffic_sub.for_each(move |msg| {
                u.borrow_mut().on_traffic(msg.data);
                future::ready(())
            }))
            .map_err(|e| UpdaterError::RosError(e.to_string()))?;

        let u = Rc::clone(&updater);
        spawner
            .spawn_local(obstacle_sub.for_each(move |msg| {
                u.borrow_mut().on_obstacle(msg.data);
                future::ready(())
            }))
            .map_err(|e| UpdaterError::RosError(e.to_string()))?;

        let period = Duration::from_millis(self.config.spin_period_ms);
        info!("Waypoint updater running");
        loop {
            self.node.spin_once(period);
            pool.run_until_stalled();
        }
    }
}
