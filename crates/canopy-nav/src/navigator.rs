use crate::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered waypoints from the query start to the goal. An empty path means "no path".
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavPath {
    pub points: Vec<Vec2>,
}

impl NavPath {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Opaque, synchronous path query supplied by the host.
pub trait Navigator {
    /// Waypoints towards `goal`, ending at it. A leading `start` point is optional.
    fn find_path(&self, start: Vec2, goal: Vec2) -> NavPath;
}

/// Navigator for open space: every path is the straight segment from start to goal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectNavigator;

impl Navigator for DirectNavigator {
    fn find_path(&self, start: Vec2, goal: Vec2) -> NavPath {
        NavPath::new(vec![start, goal])
    }
}
