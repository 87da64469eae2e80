//! Modforge host driver
//!
//! The host side of the framework: a [`HookTable`] implementing the
//! registration seam, a simulated [`GameWorld`] that drives the native
//! callback sequence the way the engine does, and tracing setup.
//!
//! # Example
//!
//! ```ignore
//! use modforge_core::ModRuntime;
//! use modforge_host::{init_logging, GameWorld};
//! use modforge_sdk::{Room, RoomType};
//!
//! let runtime = ModRuntime::new();
//! init_logging(runtime.config().debug);
//!
//! let mut world = GameWorld::new();
//! runtime.attach(world.hooks_mut()).expect("fresh world has free hook slots");
//!
//! runtime.callbacks().post_room_enter.subscribe(|enter| {
//!     tracing::info!("entered a {:?} room", enter.room_type);
//! });
//!
//! world.start_run(Room::new(RoomType::Default));
//! world.tick_frames(60);
//! ```

mod hooks;
mod logging;
mod world;

pub use hooks::HookTable;
pub use logging::init_logging;
pub use world::GameWorld;
