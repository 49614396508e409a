//! The `PowerUpGrantor` trait: the hook for starting bonuses.
//!
//! The allocator calls it once per admitted player when the game has
//! power-ups enabled, and attaches whatever it returns to the new
//! participant. A grantor only computes; it never writes profiles or games.

use mathrush_model::{PlayerUid, PowerUp, PowerUpKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

/// Computes the power-ups a newly admitted player starts with.
///
/// Implementations may look at anything they like to decide (progress,
/// promotions), but must not fail for a player the caller already
/// resolved, and must not mutate state as a side effect.
///
/// # Example
///
/// ```rust
/// use mathrush_match::PowerUpGrantor;
/// use mathrush_model::{PlayerUid, PowerUp, PowerUpKind};
///
/// /// Everyone starts with one shield.
/// struct ShieldOnly;
///
/// impl PowerUpGrantor for ShieldOnly {
///     fn grant_initial_power_ups(&self, _player: &PlayerUid) -> Vec<PowerUp> {
///         vec![PowerUp::from_kind(PowerUpKind::Shield)]
///     }
/// }
/// ```
pub trait PowerUpGrantor: Send + Sync + 'static {
    /// Returns the starting grant for `player`.
    fn grant_initial_power_ups(&self, player: &PlayerUid) -> Vec<PowerUp>;
}

/// Grants a fixed number of distinct catalog entries per player.
///
/// The pick is seeded from the uid, so the same player always gets the
/// same starting hand while different players get different ones.
#[derive(Debug, Clone)]
pub struct CatalogGrantor {
    catalog: Vec<PowerUp>,
    grant_size: usize,
}

impl CatalogGrantor {
    /// Grants `grant_size` entries from the full catalog.
    pub fn new(grant_size: usize) -> Self {
        Self::with_catalog(PowerUpKind::ALL.map(PowerUp::from_kind).to_vec(), grant_size)
    }

    /// Grants `grant_size` entries from a custom catalog. Sizes larger
    /// than the catalog hand out the whole catalog.
    pub fn with_catalog(catalog: Vec<PowerUp>, grant_size: usize) -> Self {
        Self {
            grant_size: grant_size.min(catalog.len()),
            catalog,
        }
    }

    pub fn catalog(&self) -> &[PowerUp] {
        &self.catalog
    }

    pub fn grant_size(&self) -> usize {
        self.grant_size
    }
}

impl PowerUpGrantor for CatalogGrantor {
    fn grant_initial_power_ups(&self, player: &PlayerUid) -> Vec<PowerUp> {
        let mut rng = StdRng::seed_from_u64(uid_seed(player));
        self.catalog
            .choose_multiple(&mut rng, self.grant_size)
            .cloned()
            .collect()
    }
}

/// FNV-1a over the uid bytes. Unlike `DefaultHasher` its output is fixed
/// across Rust releases, so grants survive toolchain upgrades.
fn uid_seed(uid: &PlayerUid) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    uid.as_str()
        .bytes()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}
