#![allow(dead_code)]

use canopy::{Behavior, Context, Leaf, Params, Status};
use canopy_core::{Message, MessageBus, WorldMut, WorldView};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
pub struct TestWorld {
    /// Names of leaves in the order they were stepped.
    pub steps: Vec<&'static str>,
    pub messages: Vec<Message>,
}

impl TestWorld {
    pub fn steps_of(&self, name: &str) -> usize {
        self.steps.iter().filter(|s| **s == name).count()
    }
}

impl WorldView for TestWorld {
    type Agent = u64;
}

impl WorldMut for TestWorld {}

impl MessageBus for TestWorld {
    fn post(&mut self, message: Message) {
        self.messages.push(message);
    }
}

/// Returns the next status of its script on every step (repeating the last one when exhausted).
///
/// The script cursor survives `init`; inits are counted in the blackboard under `init.<name>`.
#[derive(Debug, Clone)]
pub struct Scripted {
    name: &'static str,
    script: Vec<Status>,
    cursor: usize,
}

impl Scripted {
    pub fn new(name: &'static str, script: &[Status]) -> Self {
        assert!(!script.is_empty());
        Self {
            name,
            script: script.to_vec(),
            cursor: 0,
        }
    }
}

impl Leaf<TestWorld> for Scripted {
    fn type_tag(&self) -> &'static str {
        "scripted"
    }

    fn init(&mut self, ctx: &mut Context<TestWorld>) {
        let key = format!("init.{}", self.name);
        let count = ctx.value(&key, 0i64);
        ctx.set_value(key, count + 1);
    }

    fn step(&mut self, _ctx: &mut Context<TestWorld>, world: &mut TestWorld) -> Status {
        world.steps.push(self.name);
        let status = self.script[self.cursor.min(self.script.len() - 1)];
        self.cursor += 1;
        status
    }

    fn encode(&self, params: &mut Params) {
        params.encode("name", self.name);
    }

    fn clone_leaf(&self) -> Box<dyn Leaf<TestWorld>> {
        Box::new(self.clone())
    }
}

pub fn scripted(name: &'static str, script: &[Status]) -> Behavior<TestWorld> {
    Behavior::action(name, Scripted::new(name, script))
}

pub fn inits(ctx: &Context<TestWorld>, name: &str) -> i64 {
    ctx.value(&format!("init.{name}"), 0i64)
}

/// Route `tracing` output through the test harness; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_test_writer()
        .try_init();
}
