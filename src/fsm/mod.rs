//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern, one row per arm position:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  StateTable                                               │
//! │  ┌──────────┬───────────┬──────────┬───────────────────┐  │
//! │  │ State    │ on_enter  │ on_exit  │ on_update         │  │
//! │  ├──────────┼───────────┼──────────┼───────────────────┤  │
//! │  │ Off      │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │  │
//! │  │ Primed0  │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  │ Primed1  │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  │ On       │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  │ Overload │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  └──────────┴───────────┴──────────┴───────────────────┘  │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.  If it
//! returns `Some(next)`, the engine runs `on_exit` for the current state,
//! records where it came from in the context, runs `on_enter` for the next
//! state and then gives the new state its steady-state update in the same
//! tick.  All handlers receive `&mut GeneratorContext`, which holds the input
//! snapshot, the light frame, timers and configuration.

pub mod context;
pub mod modes;
pub mod states;

use context::GeneratorContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Discrete arm position of the generator.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GeneratorState {
    Off = 0,
    Primed0 = 1,
    Primed1 = 2,
    On = 3,
    /// Arm at ON with the overload input held.
    Overload = 4,
}

impl GeneratorState {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 5;

    /// States backed by a position sensor, in scan order.  The first sensor
    /// found active wins.
    pub const POSITIONS: [GeneratorState; 4] = [
        GeneratorState::Off,
        GeneratorState::Primed0,
        GeneratorState::Primed1,
        GeneratorState::On,
    ];

    /// Convert an index back to a state.  Panics on out-of-range in debug
    /// builds; returns `Off` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Off,
            1 => Self::Primed0,
            2 => Self::Primed1,
            3 => Self::On,
            4 => Self::Overload,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Off
            }
        }
    }

    /// Whether the blue lights scroll in this state.
    pub fn is_scrolling(self) -> bool {
        matches!(self, Self::On | Self::Overload)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Primed0 => "PRIMED0",
            Self::Primed1 => "PRIMED1",
            Self::On => "ON",
            Self::Overload => "OVERLOAD",
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut GeneratorContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut GeneratorContext) -> Option<GeneratorState>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single generator state.
/// Stored in a fixed-size array: no heap and no `dyn`.
pub struct StateDescriptor {
    pub id: GeneratorState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table (array of [`StateDescriptor`]).  The mutable
/// [`GeneratorContext`] is threaded through every handler call.
pub struct Fsm {
    /// Fixed-size table indexed by `GeneratorState as usize`.
    table: [StateDescriptor; GeneratorState::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Monotonically increasing tick counter.
    tick_count: u64,
    /// Tick at which the current state was entered.
    state_entry_tick: u64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; GeneratorState::COUNT], initial: GeneratorState) -> Self {
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
            state_entry_tick: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut GeneratorContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        ctx.entered_from = self.current_state();
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    ///
    /// 1. Call `on_update` for the current state.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`, then run
    ///    `on_update(next)` once so the new state's steady-state work is
    ///    not deferred to the next poll.
    pub fn tick(&mut self, ctx: &mut GeneratorContext) {
        self.tick_count += 1;
        ctx.ticks_in_state = self.tick_count - self.state_entry_tick;
        ctx.total_ticks = self.tick_count;

        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
            // Same snapshot, so the new state resolves to itself.
            let again = (self.table[self.current].on_update)(ctx);
            debug_assert!(again.is_none(), "state resolved twice in one tick");
        }
    }

    /// Force an immediate transition.  Entering the state that is already
    /// current is a no-op.
    pub fn force_transition(&mut self, next: GeneratorState, ctx: &mut GeneratorContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> GeneratorState {
        GeneratorState::from_index(self.current)
    }

    /// How many ticks the FSM has been in the current state.
    pub fn ticks_in_current_state(&self) -> u64 {
        self.tick_count - self.state_entry_tick
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: GeneratorState, ctx: &mut GeneratorContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        ctx.entered_from = self.current_state();
        self.current = next_idx;
        self.state_entry_tick = self.tick_count;
        ctx.ticks_in_state = 0;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
