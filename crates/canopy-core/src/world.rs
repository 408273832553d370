use core::fmt::Debug;

/// Non-owning handle to an entity (the controlled agent or one of its targets).
///
/// Handles are plain copyable ids; the world owns the entity itself. `stable_id` must not change
/// for the lifetime of the entity because brains are stepped in `stable_id` order.
pub trait AgentId: Copy + Ord + Eq + Debug {
    fn stable_id(self) -> u64;
}

impl AgentId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}

impl AgentId for u32 {
    fn stable_id(self) -> u64 {
        u64::from(self)
    }
}

impl AgentId for usize {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

/// Read-only access to the host simulation.
///
/// The engine itself never queries the world; leaf behaviors bound on extension traits
/// (spatial transforms, navigation, messaging) that the host implements.
pub trait WorldView {
    type Agent: AgentId;
}

/// Write access / effect sink handed to `step`.
pub trait WorldMut: WorldView {}
