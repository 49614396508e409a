//! # MathRush
//!
//! Matchmaking and infinite-mode session core for a competitive math game.
//!
//! An HTTP or RPC layer calls into the [`MathRush`] service, which validates
//! caller input, drives the matchmaking and session components, and maps
//! their failures onto one [`MathRushError`] taxonomy.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mathrush::prelude::*;
//!
//! # async fn run() -> Result<(), MathRushError> {
//! mathrush::telemetry::init_tracing();
//!
//! let backend = InMemoryBackend::default();
//! let service = backend.service(MathRushConfig::load())?;
//!
//! let game = service.find_match("conn-1", "player-1").await?;
//! println!("{} is {}", game.id(), game.status());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod service;
pub mod telemetry;

pub use config::MathRushConfig;
pub use error::MathRushError;
pub use service::{InMemoryBackend, InMemoryMathRush, MathRush};

pub use mathrush_match as matchmaking;
pub use mathrush_model as model;
pub use mathrush_session as session;
pub use mathrush_store as store;

pub mod prelude {
    pub use crate::{InMemoryBackend, InMemoryMathRush, MathRush, MathRushConfig, MathRushError};
    pub use mathrush_match::{CatalogGrantor, MatchConfig, PowerUpGrantor, ToleranceBands};
    pub use mathrush_model::{
        ConnectionId, Game, GameId, GameStatus, InfiniteGame, InfiniteGameId, PlayerProfile,
        PlayerUid,
    };
    pub use mathrush_session::InfiniteGameView;
    pub use mathrush_store::{GameStore, InfiniteGameStore, PlayerDirectory, QuestionSupply};
}
