//! Modforge - Custom Event Framework Core
//!
//! This crate turns the host's small fixed set of native callbacks into a
//! rich catalog of derived custom events: late-init notifications,
//! per-entity state change events, and full grid entity lifecycle tracking.
//!
//! A host embeds the framework by constructing a [`ModRuntime`] and
//! attaching it to an implementation of [`HookHost`]; mods subscribe to
//! custom events through the runtime's [`events::CallbackRegistry`].
//!
//! # Re-exports
//!
//! This crate re-exports the SDK crate for convenience:
//! - [`sdk`] - the host object model (entities, grid entities, rooms)

// Re-export the SDK crate
pub use modforge_sdk as sdk;

pub mod adapters;
pub mod config;
pub mod events;
pub mod host;
pub mod scheduler;

mod runtime;

// Re-export commonly used items
pub use events::{CallbackKind, CallbackRegistry, CustomCallback, SubscriptionKey};
pub use host::{HookError, HookHost, NativeCallback, NativeEventData, NativeHookFn, NativeHookSpec};
pub use runtime::ModRuntime;
pub use scheduler::{FrameScheduler, TaskFlags, TaskKey};

// Re-export config types
pub use config::{ConfigError, ConfigResult, CoreConfig, ModConfig};

#[cfg(test)]
mod tests {
    #[test]
    fn test_sdk_types_reexported() {
        use crate::sdk::{EntityType, RoomType};
        let _ = EntityType::Npc;
        let _ = RoomType::Default;
    }
}
