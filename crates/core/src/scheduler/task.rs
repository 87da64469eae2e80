//! Task struct and flags

use std::sync::atomic::AtomicU64;

use bitflags::bitflags;
use parking_lot::Mutex;
use slotmap::new_key_type;

new_key_type! {
    /// Key for scheduled tasks
    pub struct TaskKey;
}

bitflags! {
    /// Flags that control task behavior
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TaskFlags: u32 {
        /// Task repeats at the specified interval until cancelled
        const REPEAT = 0x01;
        /// Task is automatically removed when a new room is entered
        const STOP_ON_NEW_ROOM = 0x02;
    }
}

/// A scheduled task that fires a callback after a frame delay
pub(crate) struct Task {
    /// Frames between executions (or delay for one-shot tasks)
    pub interval: u64,
    /// The callback to execute (wrapped in Mutex for FnMut support)
    pub callback: Mutex<Box<dyn FnMut() + Send + 'static>>,
    /// Behavior flags
    pub flags: TaskFlags,
    /// The frame on which this task should next fire
    pub next_fire: AtomicU64,
}

impl Task {
    /// Create a new task relative to the given frame
    pub fn new<F>(now: u64, interval: u64, flags: TaskFlags, callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        Self {
            interval,
            callback: Mutex::new(Box::new(callback)),
            flags,
            next_fire: AtomicU64::new(now + interval),
        }
    }
}
