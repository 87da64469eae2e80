//! Frame scheduler for delayed and repeating callbacks
//!
//! Tasks are processed once per frame and can be configured to:
//! - Fire once after a frame delay
//! - Repeat at a fixed frame interval
//! - Be automatically cleaned up when a new room is entered
//!
//! The host has no wall-clock timer facility, so everything is counted in
//! frames of the runtime's own frame counter.
//!
//! # Example
//!
//! ```ignore
//! use modforge_core::scheduler::TaskFlags;
//! use modforge_core::ModRuntime;
//!
//! let runtime = ModRuntime::new();
//!
//! // One-shot task
//! let key = runtime.scheduler().run_in_frames(30, || {
//!     tracing::info!("30 frames passed");
//! });
//!
//! // Repeating task that stops when the room changes
//! runtime.scheduler().run_with_flags(
//!     10,
//!     TaskFlags::REPEAT | TaskFlags::STOP_ON_NEW_ROOM,
//!     || { /* ... */ },
//! );
//!
//! // Cancel a task
//! runtime.scheduler().cancel(key);
//! ```

mod task;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use slotmap::SlotMap;

use task::Task;
pub use task::{TaskFlags, TaskKey};

/// Frame-counted task scheduler. Owned by the runtime; not a global.
pub struct FrameScheduler {
    frame: AtomicU64,
    tasks: RwLock<SlotMap<TaskKey, Arc<Task>>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            frame: AtomicU64::new(0),
            tasks: RwLock::new(SlotMap::with_key()),
        }
    }

    /// The frame most recently passed to [`FrameScheduler::process`]
    pub fn current_frame(&self) -> u64 {
        self.frame.load(Ordering::Relaxed)
    }

    /// Add a one-shot task that fires after the specified frame delay
    ///
    /// # Arguments
    /// * `delay` - How many frames to wait before firing
    /// * `callback` - Function to call when the task fires
    ///
    /// # Returns
    /// A key that can be used to cancel the task via `cancel`
    pub fn run_in_frames<F>(&self, delay: u64, callback: F) -> TaskKey
    where
        F: FnMut() + Send + 'static,
    {
        self.run_with_flags(delay, TaskFlags::empty(), callback)
    }

    /// Add a repeating task that fires at the specified frame interval
    ///
    /// The task will continue firing until cancelled via `cancel`.
    pub fn run_repeating<F>(&self, interval: u64, callback: F) -> TaskKey
    where
        F: FnMut() + Send + 'static,
    {
        self.run_with_flags(interval, TaskFlags::REPEAT, callback)
    }

    /// Add a task with custom flags
    ///
    /// # Arguments
    /// * `interval` - Delay (one-shot) or frames between executions (repeating)
    /// * `flags` - Combination of `TaskFlags` to control behavior
    /// * `callback` - Function to call when the task fires
    ///
    /// # Returns
    /// A key that can be used to cancel the task via `cancel`
    pub fn run_with_flags<F>(&self, interval: u64, flags: TaskFlags, callback: F) -> TaskKey
    where
        F: FnMut() + Send + 'static,
    {
        let task = Task::new(self.current_frame(), interval, flags, callback);
        self.tasks.write().insert(Arc::new(task))
    }

    /// Cancel a task
    ///
    /// # Returns
    /// `true` if the task was found and removed, `false` if not found
    pub fn cancel(&self, key: TaskKey) -> bool {
        self.tasks.write().remove(key).is_some()
    }

    /// Number of pending tasks
    pub fn task_count(&self) -> usize {
        self.tasks.read().len()
    }

    /// Process all tasks for the given frame (called once per PostUpdate)
    ///
    /// Due tasks are executed without holding the table lock, so a callback
    /// may schedule or cancel tasks. One-shot tasks are removed after firing;
    /// repeating tasks are rescheduled relative to the current frame.
    pub fn process(&self, frame: u64) {
        self.frame.store(frame, Ordering::Relaxed);

        let due: Vec<(TaskKey, Arc<Task>)> = self
            .tasks
            .read()
            .iter()
            .filter(|(_, task)| frame >= task.next_fire.load(Ordering::Relaxed))
            .map(|(key, task)| (key, Arc::clone(task)))
            .collect();

        for (key, task) in due {
            // A callback earlier in this pass may have cancelled this task.
            if !self.tasks.read().contains_key(key) {
                continue;
            }
            {
                let mut callback = task.callback.lock();
                (*callback)();
            }

            if task.flags.contains(TaskFlags::REPEAT) {
                task.next_fire.store(frame + task.interval, Ordering::Relaxed);
            } else {
                self.tasks.write().remove(key);
            }
        }
    }

    /// Remove all tasks with the STOP_ON_NEW_ROOM flag
    ///
    /// Called by the runtime when a new room is entered.
    pub(crate) fn clear_room_scoped(&self) {
        let mut tasks = self.tasks.write();
        let before = tasks.len();
        tasks.retain(|_, task| !task.flags.contains(TaskFlags::STOP_ON_NEW_ROOM));
        let removed = before - tasks.len();
        if removed > 0 {
            tracing::debug!("Removed {} tasks on room change", removed);
        }
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}
