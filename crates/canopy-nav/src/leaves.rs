//! Leaves that act on agent transforms.
//!
//! Every leaf addresses one of the context's targets by index. A missing target, a missing
//! transform or an unreachable goal is a plain [`Status::Failure`], with a `warn!` for the cases
//! that point at a misconfigured world.

use canopy::{Comparator, Context, Leaf, LeafRegistry, Params, Status};
use tracing::{trace, warn};

use crate::{NavPath, NavWorldView, SpatialMut, SpatialView, Vec2};

fn agent_and_target<W>(ctx: &Context<W>, world: &W, index: usize) -> Option<(Vec2, Vec2)>
where
    W: SpatialView,
{
    let target = ctx.target_at(index)?;
    let Some(from) = world.position(ctx.agent()) else {
        warn!(agent = ?ctx.agent(), "agent has no position");
        return None;
    };
    let Some(to) = world.position(target) else {
        warn!(target = ?target, "target has no position");
        return None;
    };
    Some((from, to))
}

/// Compares the distance between the agent and one of its targets against a threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceToTarget {
    comparator: Comparator,
    threshold: f32,
    target_index: usize,
}

impl DistanceToTarget {
    pub const TAG: &'static str = "distance_to_target";

    pub fn new(comparator: Comparator, threshold: f32) -> Self {
        Self {
            comparator,
            threshold,
            target_index: 0,
        }
    }

    pub fn with_target_index(mut self, index: usize) -> Self {
        self.target_index = index;
        self
    }
}

impl<W> Leaf<W> for DistanceToTarget
where
    W: SpatialMut + 'static,
{
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn step(&mut self, ctx: &mut Context<W>, world: &mut W) -> Status {
        let Some((from, to)) = agent_and_target(ctx, world, self.target_index) else {
            return Status::Failure;
        };
        let distance = from.distance(to);
        if self
            .comparator
            .compare(f64::from(distance), f64::from(self.threshold))
        {
            Status::Success
        } else {
            Status::Failure
        }
    }

    fn encode(&self, params: &mut Params) {
        params.encode("comparator", self.comparator);
        params.encode("threshold", self.threshold);
        params.encode("target_index", self.target_index);
    }

    fn clone_leaf(&self) -> Box<dyn Leaf<W>> {
        Box::new(self.clone())
    }
}

/// Turns the agent to face one of its targets. Succeeds immediately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookAtTarget {
    target_index: usize,
}

impl LookAtTarget {
    pub const TAG: &'static str = "look_at_target";

    pub fn new(target_index: usize) -> Self {
        Self { target_index }
    }
}

impl<W> Leaf<W> for LookAtTarget
where
    W: SpatialMut + 'static,
{
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn step(&mut self, ctx: &mut Context<W>, world: &mut W) -> Status {
        let Some((from, to)) = agent_and_target(ctx, world, self.target_index) else {
            return Status::Failure;
        };
        // Co-located: keep the current heading.
        if let Some(dir) = (to - from).normalized() {
            world.set_heading(ctx.agent(), dir.angle());
        }
        Status::Success
    }

    fn encode(&self, params: &mut Params) {
        params.encode("target_index", self.target_index);
    }

    fn clone_leaf(&self) -> Box<dyn Leaf<W>> {
        Box::new(*self)
    }
}

/// Follows a navigator path towards one of the agent's targets at `speed` units per second of
/// agent clock time.
///
/// The path is requested on the first step after `init` and replanned when it runs out before the
/// agent arrives (the target moved). Succeeds once within `arrival_distance`; fails when the
/// navigator has no path.
#[derive(Debug, Clone)]
pub struct MoveToTarget {
    speed: f32,
    arrival_distance: f32,
    target_index: usize,
    path: Option<NavPath>,
    next_index: usize,
}

impl MoveToTarget {
    pub const TAG: &'static str = "move_to_target";

    pub fn new(speed: f32, arrival_distance: f32) -> Self {
        Self {
            speed,
            arrival_distance,
            target_index: 0,
            path: None,
            next_index: 0,
        }
    }

    pub fn with_target_index(mut self, index: usize) -> Self {
        self.target_index = index;
        self
    }

    /// The path currently being followed, if one was planned.
    pub fn path(&self) -> Option<&NavPath> {
        self.path.as_ref()
    }
}

impl<W> Leaf<W> for MoveToTarget
where
    W: SpatialMut + NavWorldView + 'static,
{
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn init(&mut self, _ctx: &mut Context<W>) {
        self.path = None;
        self.next_index = 0;
    }

    fn step(&mut self, ctx: &mut Context<W>, world: &mut W) -> Status {
        let Some((pos, goal)) = agent_and_target(ctx, world, self.target_index) else {
            return Status::Failure;
        };

        if pos.distance(goal) <= self.arrival_distance {
            self.path = None;
            return Status::Success;
        }

        let exhausted = self
            .path
            .as_ref()
            .is_some_and(|path| self.next_index >= path.len());
        if self.path.is_none() || exhausted {
            let path = world.navigator().find_path(pos, goal);
            trace!(waypoints = path.len(), "planned path");
            if path.is_empty() {
                warn!(agent = ?ctx.agent(), "no path to target");
                self.path = None;
                return Status::Failure;
            }
            self.path = Some(path);
            self.next_index = 0;
        }

        let Some(path) = &self.path else {
            return Status::Failure;
        };

        let dt = ctx.clock().delta_seconds();
        let mut remaining = self.speed.max(0.0) * dt;

        let mut current = pos;
        while self.next_index < path.len() && remaining > 0.0 {
            let waypoint = path.points[self.next_index];
            let to_waypoint = waypoint - current;
            let dist = to_waypoint.length();

            if dist <= f32::EPSILON {
                self.next_index += 1;
                continue;
            }

            if remaining >= dist {
                current = waypoint;
                self.next_index += 1;
                remaining -= dist;
                continue;
            }

            current += to_waypoint * (remaining / dist);
            break;
        }

        let agent = ctx.agent();
        if let Some(dir) = (current - pos).normalized() {
            world.set_heading(agent, dir.angle());
        }
        world.set_position(agent, current);
        Status::Running
    }

    fn encode(&self, params: &mut Params) {
        params.encode("speed", self.speed);
        params.encode("arrival_distance", self.arrival_distance);
        params.encode("target_index", self.target_index);
    }

    fn clone_leaf(&self) -> Box<dyn Leaf<W>> {
        Box::new(self.clone())
    }
}

/// Moves the agent by `offset`, spread linearly over `duration` seconds of agent clock time.
#[derive(Debug, Clone, PartialEq)]
pub struct Translate {
    offset: Vec2,
    duration: f32,
    elapsed: f32,
    applied: Vec2,
}

impl Translate {
    pub const TAG: &'static str = "translate";

    pub fn new(offset: Vec2, duration_seconds: f32) -> Self {
        Self {
            offset,
            duration: duration_seconds,
            elapsed: 0.0,
            applied: Vec2::ZERO,
        }
    }
}

impl<W> Leaf<W> for Translate
where
    W: SpatialMut + 'static,
{
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn init(&mut self, _ctx: &mut Context<W>) {
        self.elapsed = 0.0;
        self.applied = Vec2::ZERO;
    }

    fn step(&mut self, ctx: &mut Context<W>, world: &mut W) -> Status {
        let agent = ctx.agent();
        let Some(pos) = world.position(agent) else {
            warn!(agent = ?agent, "agent has no position");
            return Status::Failure;
        };

        self.elapsed += ctx.clock().delta_seconds();
        let t = if self.duration > 0.0 {
            (self.elapsed / self.duration).min(1.0)
        } else {
            1.0
        };

        let wanted = self.offset * t;
        world.set_position(agent, pos + (wanted - self.applied));
        self.applied = wanted;

        if t >= 1.0 {
            Status::Success
        } else {
            Status::Running
        }
    }

    fn encode(&self, params: &mut Params) {
        params.encode("offset_x", self.offset.x);
        params.encode("offset_y", self.offset.y);
        params.encode("duration", self.duration);
    }

    fn clone_leaf(&self) -> Box<dyn Leaf<W>> {
        Box::new(self.clone())
    }
}

/// Register the transform-only leaves.
pub fn register_spatial_leaves<W>(registry: &mut LeafRegistry<W>)
where
    W: SpatialMut + 'static,
{
    registry
        .register(DistanceToTarget::TAG, |p: &Params| {
            Ok(
                DistanceToTarget::new(p.decode("comparator")?, p.decode("threshold")?)
                    .with_target_index(p.decode_or("target_index", 0usize)?),
            )
        })
        .register(LookAtTarget::TAG, |p: &Params| {
            Ok(LookAtTarget::new(p.decode_or("target_index", 0usize)?))
        })
        .register(Translate::TAG, |p: &Params| {
            let offset = Vec2::new(p.decode("offset_x")?, p.decode("offset_y")?);
            Ok(Translate::new(offset, p.decode("duration")?))
        });
}

/// Register [`MoveToTarget`] for worlds that expose a navigator.
pub fn register_nav_leaves<W>(registry: &mut LeafRegistry<W>)
where
    W: SpatialMut + NavWorldView + 'static,
{
    registry.register(MoveToTarget::TAG, |p: &Params| {
        Ok(
            MoveToTarget::new(p.decode("speed")?, p.decode("arrival_distance")?)
                .with_target_index(p.decode_or("target_index", 0usize)?),
        )
    });
}
