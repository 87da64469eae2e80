//! Native hook table
//!
//! [`HookTable`] is the host side of the registration seam: it validates
//! hook specs, enforces one hook per slot, and delivers invocations to the
//! registered hooks during the frame loop.

use std::collections::HashMap;

use modforge_core::host::{HookError, HookHost, NativeCallback, NativeEventData, NativeHookFn, NativeHookSpec};
use modforge_sdk::{Entity, Room};

/// Hook storage keyed by hook slot.
pub struct HookTable {
    hooks: HashMap<NativeHookSpec, NativeHookFn>,
}

impl HookTable {
    pub fn new() -> Self {
        Self {
            hooks: HashMap::new(),
        }
    }

    /// Number of registered hooks
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Invoke a global callback's hook, if one is registered.
    pub fn invoke_global(&self, callback: NativeCallback, room: &Room) {
        let spec = NativeHookSpec::global(callback);
        if let Some(hook) = self.hooks.get(&spec) {
            hook(room, NativeEventData::Global);
        }
    }

    /// Invoke the post-update hook, if registered.
    pub fn invoke_post_update(&self, room: &Room) {
        self.invoke_global(NativeCallback::PostUpdate, room);
    }

    /// Invoke the new-room hook, if registered.
    pub fn invoke_new_room(&self, room: &Room) {
        self.invoke_global(NativeCallback::PostNewRoom, room);
    }

    /// Invoke the new-run hook, if registered.
    pub fn invoke_new_run(&self, room: &Room) {
        self.invoke_global(NativeCallback::PostNewRun, room);
    }

    /// Invoke the per-entity update hook matching the entity's type, if one
    /// is registered.
    pub fn invoke_entity_update(&self, room: &Room, entity: &Entity) {
        let spec = NativeHookSpec::entity_update(entity.entity_type);
        if let Some(hook) = self.hooks.get(&spec) {
            hook(room, NativeEventData::Entity(entity));
        }
    }
}

impl Default for HookTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HookHost for HookTable {
    fn register_hook(&mut self, spec: NativeHookSpec, hook: NativeHookFn) -> Result<(), HookError> {
        if spec.entity_filter.is_some() && spec.callback != NativeCallback::PostEntityUpdate {
            return Err(HookError::InvalidFilter(spec));
        }
        if self.hooks.contains_key(&spec) {
            return Err(HookError::AlreadyRegistered(spec));
        }
        tracing::debug!("Registered native hook for {:?}", spec);
        self.hooks.insert(spec, hook);
        Ok(())
    }
}
