//! Infinite-mode session lifecycle for MathRush.
//!
//! An infinite session is a single-player run with no fixed end. The only
//! lifecycle event handled here is the player walking away from it:
//!
//! 1. **Status**: a read-only [`InfiniteGameView`] of the stored session
//! 2. **Abandonment**: stamping `abandoned_at` exactly once
//!
//! # How it fits in the stack
//!
//! ```text
//! Facade (above)  ← validates ids, maps SessionError into the public taxonomy
//!     ↕
//! Session Layer (this crate)  ← InfiniteSessionManager
//!     ↕
//! Store Layer (below)  ← InfiniteGameStore with versioned writes
//! ```

mod error;
mod manager;
mod view;

pub use error::SessionError;
pub use manager::InfiniteSessionManager;
pub use view::InfiniteGameView;
