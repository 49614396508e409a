//! Matchmaking for MathRush.
//!
//! Pairs arriving players into head-to-head games by skill rating.
//!
//! # Key types
//!
//! - [`MatchAllocator`]: finds a compatible open game or opens a new one
//! - [`MatchConfig`] / [`ToleranceBands`]: capacity and rating bands
//! - [`PowerUpGrantor`]: the starting bonus hook ([`CatalogGrantor`] by
//!   default)
//! - [`select_first_compatible`]: the pure candidate selection rule
//!
//! The game lifecycle itself ([`Game`](mathrush_model::Game),
//! [`GameStatus`](mathrush_model::GameStatus)) lives in `mathrush-model`.

mod allocator;
mod config;
mod error;
mod grantor;
mod selection;

pub use allocator::MatchAllocator;
pub use config::{MatchConfig, ToleranceBand, ToleranceBands};
pub use error::MatchError;
pub use grantor::{CatalogGrantor, PowerUpGrantor};
pub use selection::{Selection, is_compatible, open_candidates, select_first_compatible};
