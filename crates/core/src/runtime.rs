//! Runtime assembly and lifecycle
//!
//! [`ModRuntime`] owns every piece of the framework: the callback registry,
//! the adapter set, the frame scheduler, and the core config. Nothing lives
//! in a global; a host embeds the framework by constructing a runtime and
//! attaching it to its [`HookHost`] implementation.
//!
//! Attachment registers one native hook per slot the framework needs:
//! the global frame pump plus one per-entity-type update hook for each
//! entity type some adapter watches. From then on the host drives the
//! runtime purely through those hooks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use modforge_sdk::Room;

use crate::adapters::{
    machine_animation_adapter, npc_state_adapter, pickup_changed_adapter, CallbackAdapter,
    GridLifecycleAdapter, InitLateAdapter,
};
use crate::config::CoreConfig;
use crate::events::{CallbackRegistry, RoomEnter, RunStart};
use crate::host::{HookError, HookHost, NativeCallback, NativeEventData, NativeHookFn, NativeHookSpec};
use crate::scheduler::FrameScheduler;

type AdapterSet = Vec<Arc<dyn CallbackAdapter>>;

struct RuntimeInner {
    callbacks: CallbackRegistry,
    /// Every adapter, in registration order (used for lifecycle resets)
    adapters: AdapterSet,
    /// Adapters driven by the global frame pump
    frame_adapters: AdapterSet,
    /// Adapters driven by per-entity update hooks, grouped by hook slot
    entity_routes: Vec<(NativeHookSpec, AdapterSet)>,
    scheduler: FrameScheduler,
    config: CoreConfig,
    frame: AtomicU64,
    run_count: AtomicU32,
    attached: AtomicBool,
}

impl RuntimeInner {
    fn on_post_update(&self, room: &Room, data: &NativeEventData<'_>) {
        let frame = self.frame.fetch_add(1, Ordering::Relaxed) + 1;
        let started = Instant::now();

        self.scheduler.process(frame);
        for adapter in &self.frame_adapters {
            adapter.on_native(&self.callbacks, room, data);
        }

        let elapsed_us = started.elapsed().as_micros() as u64;
        if elapsed_us > self.config.frame_budget_warn_us {
            tracing::warn!(
                "Frame {} dispatch took {}us (budget {}us)",
                frame,
                elapsed_us,
                self.config.frame_budget_warn_us
            );
        }
    }

    fn on_new_room(&self, room: &Room) {
        tracing::debug!("Entering {:?} room", room.room_type);

        // Room-scoped state goes first so no handler observes leftovers
        // from the previous room.
        for adapter in &self.adapters {
            adapter.reset_room();
        }
        self.scheduler.clear_room_scoped();

        self.callbacks.post_room_enter.fire(&RoomEnter {
            room_type: room.room_type,
        });

        // Initial scans run after the room-enter event, so handlers
        // subscribed during it still see the room's starting contents.
        for adapter in &self.adapters {
            adapter.on_room_enter(&self.callbacks, room);
        }
    }

    fn on_new_run(&self, _room: &Room) {
        let run_count = self.run_count.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!("Run {} starting", run_count);

        for adapter in &self.adapters {
            adapter.reset_run();
            adapter.reset_room();
        }

        self.callbacks.post_run_start.fire(&RunStart { run_count });
    }
}

/// The assembled framework. Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct ModRuntime {
    inner: Arc<RuntimeInner>,
}

impl ModRuntime {
    /// Construct a runtime with the default core config.
    pub fn new() -> Self {
        Self::with_config(CoreConfig::default())
    }

    /// Construct a runtime with an explicit core config.
    pub fn with_config(config: CoreConfig) -> Self {
        let adapters: AdapterSet = vec![
            Arc::new(InitLateAdapter::npc()),
            Arc::new(InitLateAdapter::player()),
            Arc::new(InitLateAdapter::pickup(config.pickup_init_skip_frames)),
            Arc::new(npc_state_adapter()),
            Arc::new(machine_animation_adapter()),
            Arc::new(pickup_changed_adapter()),
            Arc::new(GridLifecycleAdapter::new()),
        ];

        let mut frame_adapters: AdapterSet = Vec::new();
        let mut by_entity_spec: HashMap<NativeHookSpec, AdapterSet> = HashMap::new();
        for adapter in &adapters {
            for spec in adapter.native_hooks() {
                match spec.callback {
                    NativeCallback::PostUpdate => frame_adapters.push(Arc::clone(adapter)),
                    NativeCallback::PostEntityUpdate => by_entity_spec
                        .entry(*spec)
                        .or_default()
                        .push(Arc::clone(adapter)),
                    NativeCallback::PostNewRoom | NativeCallback::PostNewRun => {}
                }
            }
        }
        let entity_routes: Vec<_> = by_entity_spec.into_iter().collect();

        Self {
            inner: Arc::new(RuntimeInner {
                callbacks: CallbackRegistry::new(),
                adapters,
                frame_adapters,
                entity_routes,
                scheduler: FrameScheduler::new(),
                config,
                frame: AtomicU64::new(0),
                run_count: AtomicU32::new(0),
                attached: AtomicBool::new(false),
            }),
        }
    }

    /// The callback registry; subscribe to custom events through this.
    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.inner.callbacks
    }

    /// The frame scheduler
    pub fn scheduler(&self) -> &FrameScheduler {
        &self.inner.scheduler
    }

    /// The core config this runtime was built with
    pub fn config(&self) -> &CoreConfig {
        &self.inner.config
    }

    /// Frames processed since attachment
    pub fn current_frame(&self) -> u64 {
        self.inner.frame.load(Ordering::Relaxed)
    }

    /// Runs started since attachment
    pub fn run_count(&self) -> u32 {
        self.inner.run_count.load(Ordering::Relaxed)
    }

    /// Register the runtime's hooks with the host.
    ///
    /// Registers the global frame pump, the room and run lifecycle hooks,
    /// and one per-entity update hook for each entity type some adapter
    /// watches. May be called at most once per runtime.
    ///
    /// # Errors
    /// - [`HookError::AlreadyAttached`] on a second attach
    /// - Registration errors from the host are passed through; the runtime
    ///   is not usable after a failed attach.
    pub fn attach(&self, host: &mut dyn HookHost) -> Result<(), HookError> {
        if self.inner.attached.swap(true, Ordering::SeqCst) {
            return Err(HookError::AlreadyAttached);
        }

        {
            let inner = Arc::clone(&self.inner);
            let hook: NativeHookFn = Arc::new(move |room: &Room, data: NativeEventData<'_>| {
                inner.on_post_update(room, &data)
            });
            host.register_hook(NativeHookSpec::global(NativeCallback::PostUpdate), hook)?;
        }
        {
            let inner = Arc::clone(&self.inner);
            let hook: NativeHookFn =
                Arc::new(move |room: &Room, _data: NativeEventData<'_>| inner.on_new_room(room));
            host.register_hook(NativeHookSpec::global(NativeCallback::PostNewRoom), hook)?;
        }
        {
            let inner = Arc::clone(&self.inner);
            let hook: NativeHookFn =
                Arc::new(move |room: &Room, _data: NativeEventData<'_>| inner.on_new_run(room));
            host.register_hook(NativeHookSpec::global(NativeCallback::PostNewRun), hook)?;
        }

        for (spec, route) in &self.inner.entity_routes {
            let inner = Arc::clone(&self.inner);
            let route = route.clone();
            let hook: NativeHookFn = Arc::new(move |room: &Room, data: NativeEventData<'_>| {
                for adapter in &route {
                    adapter.on_native(&inner.callbacks, room, &data);
                }
            });
            host.register_hook(*spec, hook)?;
        }

        tracing::info!(
            "Attached: {} adapters across {} entity hook(s)",
            self.inner.adapters.len(),
            self.inner.entity_routes.len()
        );
        Ok(())
    }
}

impl Default for ModRuntime {
    fn default() -> Self {
        Self::new()
    }
}
