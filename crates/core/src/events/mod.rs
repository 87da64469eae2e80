//! Custom event system
//!
//! The host engine only offers a small fixed set of native callbacks; this
//! module layers a richer catalog of derived event kinds on top of them.
//!
//! # Architecture
//!
//! ```text
//! native callbacks → adapters → CustomCallback dispatch → mod handlers
//! ```
//!
//! # Example
//!
//! ```ignore
//! use modforge_core::events::EntityFilter;
//! use modforge_core::ModRuntime;
//! use modforge_sdk::EntityType;
//!
//! let runtime = ModRuntime::new();
//!
//! // Fire for every NPC that survives its first update frame.
//! runtime.callbacks().post_npc_init_late.subscribe(|npc| {
//!     tracing::info!("NPC appeared: {:?}", npc.handle);
//! });
//!
//! // Only fire for one specific enemy variant.
//! let filter = EntityFilter {
//!     entity_type: Some(EntityType::Npc),
//!     variant: Some(12),
//!     ..Default::default()
//! };
//! runtime
//!     .callbacks()
//!     .post_npc_state_changed
//!     .subscribe_filtered(filter, |change| {
//!         tracing::info!("state {} -> {}", change.previous_state, change.current_state);
//!     });
//! ```

mod catalog;
mod dispatcher;
pub mod should_fire;
mod types;

pub use catalog::{CallbackKind, CallbackRegistry, CallbackSpec, CALLBACK_SPECS};
pub use dispatcher::{CustomCallback, Handler, SubscriptionKey};
pub use should_fire::{
    EntityFilter, GridFilter, GridVariantFilter, PlayerFilter, RoomFilter, VariantFilter,
};
pub use types::{
    GridRemoved, GridStateChanged, MachineAnimationChanged, NpcStateChanged, PickupChanged,
    RoomEnter, RunStart,
};
