//! Native-to-custom adapters
//!
//! Each adapter watches one or more native hooks and derives custom event
//! firings from them. Three recurring patterns:
//!
//! - [`InitLateAdapter`] - fire once per object, on its first observed
//!   update frame (optionally after skipping the first N frames of its
//!   life).
//! - [`StateChangeAdapter`] - diff a per-object state axis against the
//!   previous frame and fire with (previous, current) on a change.
//! - [`GridLifecycleAdapter`] - diff the whole room grid per frame to
//!   derive init/update/remove/state-changed/broken events.
//!
//! Adapter state is owned by the adapter instance and scoped to a room or
//! run; the runtime resets it at the matching lifecycle boundary. Adapters
//! never treat a failed host lookup as an error: an object that does not
//! exist this frame is simply skipped.

mod grid;
mod init_late;
mod state_change;

pub use grid::GridLifecycleAdapter;
pub use init_late::InitLateAdapter;
pub use state_change::{
    machine_animation_adapter, npc_state_adapter, pickup_changed_adapter, StateChangeAdapter,
};

use modforge_sdk::Room;

use crate::events::{CallbackKind, CallbackRegistry};
use crate::host::{NativeEventData, NativeHookSpec};

/// One native-to-custom translation unit.
pub trait CallbackAdapter: Send + Sync {
    /// Name used in log output
    fn name(&self) -> &'static str;

    /// The custom event kinds this adapter can fire
    fn provides(&self) -> &[CallbackKind];

    /// The native hook slots this adapter needs
    fn native_hooks(&self) -> &[NativeHookSpec];

    /// Process one native callback invocation.
    fn on_native(&self, callbacks: &CallbackRegistry, room: &Room, data: &NativeEventData<'_>);

    /// Called after a new room's contents are loaded, once room-scoped
    /// state has been reset. Adapters that need an initial scan (grid
    /// detection) do it here.
    fn on_room_enter(&self, _callbacks: &CallbackRegistry, _room: &Room) {}

    /// Discard room-scoped state
    fn reset_room(&self) {}

    /// Discard run-scoped state
    fn reset_run(&self) {}
}
