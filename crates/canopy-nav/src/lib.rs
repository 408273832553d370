//! Spatial and navigation leaf behaviors (distance checks, look-at, path following).
//!
//! The crate only consumes world collaborators: agent transforms through [`SpatialView`] /
//! [`SpatialMut`] and path queries through an opaque [`Navigator`]. Transform math beyond simple
//! 2D vectors and path-finding itself are the host's business.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod leaves;
pub mod math;
pub mod navigator;
pub mod world;

pub use leaves::{
    register_nav_leaves, register_spatial_leaves, DistanceToTarget, LookAtTarget, MoveToTarget,
    Translate,
};
pub use math::Vec2;
pub use navigator::{DirectNavigator, NavPath, Navigator};
pub use world::{NavWorldView, SpatialMut, SpatialView};
