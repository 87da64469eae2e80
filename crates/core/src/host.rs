//! Native hook seam
//!
//! The host engine exposes a small, fixed set of per-frame and per-event
//! callbacks. The framework registers into them through [`HookHost`], which
//! the host-side driver implements. Registration is keyed by
//! [`NativeHookSpec`]; at most one hook may be active per spec.

use std::sync::Arc;

use modforge_sdk::{Entity, EntityType, Room};

/// The host's fixed native callback set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeCallback {
    /// Fired once per frame after all entities have updated
    PostUpdate,
    /// Fired once per live entity per frame; filterable by entity type
    PostEntityUpdate,
    /// Fired when a new room has finished loading
    PostNewRoom,
    /// Fired when a new run begins
    PostNewRun,
}

/// Identifies one native hook slot: a callback plus an optional entity-type
/// filter. The filter is only meaningful for [`NativeCallback::PostEntityUpdate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHookSpec {
    pub callback: NativeCallback,
    pub entity_filter: Option<EntityType>,
}

impl NativeHookSpec {
    /// A hook on a global (non-per-entity) callback
    pub const fn global(callback: NativeCallback) -> Self {
        Self {
            callback,
            entity_filter: None,
        }
    }

    /// A per-entity update hook filtered to one entity type
    pub const fn entity_update(entity_type: EntityType) -> Self {
        Self {
            callback: NativeCallback::PostEntityUpdate,
            entity_filter: Some(entity_type),
        }
    }
}

/// Payload delivered with a native callback invocation.
#[derive(Debug)]
pub enum NativeEventData<'a> {
    /// Global callbacks carry no object
    Global,
    /// Per-entity callbacks carry the entity being updated
    Entity(&'a Entity),
}

/// A registered native hook. Invoked synchronously by the host with the
/// current room and the event payload.
pub type NativeHookFn = Arc<dyn for<'a> Fn(&'a Room, NativeEventData<'a>) + Send + Sync>;

/// Hook registration errors
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// A hook is already active for this (callback, filter) slot
    #[error("hook already registered for {0:?}")]
    AlreadyRegistered(NativeHookSpec),

    /// An entity filter was given for a callback that is not per-entity
    #[error("entity filter is not valid for {0:?}")]
    InvalidFilter(NativeHookSpec),

    /// The runtime was already attached to a host
    #[error("runtime already attached")]
    AlreadyAttached,
}

/// The registration capability the host exposes to the framework.
pub trait HookHost {
    /// Register a hook for the given slot.
    ///
    /// # Errors
    /// - [`HookError::AlreadyRegistered`] if the slot is occupied
    /// - [`HookError::InvalidFilter`] if `spec` carries an entity filter for
    ///   a global callback
    fn register_hook(&mut self, spec: NativeHookSpec, hook: NativeHookFn) -> Result<(), HookError>;
}
