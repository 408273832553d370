use canopy_core::{WorldMut, WorldView};

use crate::{Navigator, Vec2};

/// Read access to agent transforms.
pub trait SpatialView: WorldView {
    fn position(&self, agent: Self::Agent) -> Option<Vec2>;

    /// Facing angle in radians, counter-clockwise from +x.
    fn heading(&self, agent: Self::Agent) -> Option<f32>;
}

pub trait SpatialMut: WorldMut + SpatialView {
    fn set_position(&mut self, agent: Self::Agent, position: Vec2);
    fn set_heading(&mut self, agent: Self::Agent, heading: f32);
}

pub trait NavWorldView: SpatialView {
    fn navigator(&self) -> &dyn Navigator;
}
