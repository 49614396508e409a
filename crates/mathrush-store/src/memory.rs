//! In-memory implementations of every store capability.
//!
//! All of them are cheap to clone. Clones share the same underlying data,
//! the way a connection pool handle would. Each one also keeps a
//! [`StoreStats`] tally so tests can assert exactly how many reads and
//! writes a use case issued.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use mathrush_model::{
    Game, GameId, InfiniteGame, InfiniteGameId, PlayerProfile, PlayerUid, Question,
};
use tokio::sync::{Mutex, RwLock};

use crate::{
    GameStore, InfiniteGameStore, PlayerDirectory, QuestionContext, QuestionSupply,
    StoreError, StoreResult,
};

/// Operation counts observed by an in-memory store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Lookups and listings.
    pub reads: usize,
    /// Successful `create`/`insert` calls.
    pub creates: usize,
    /// Successful `update` calls.
    pub updates: usize,
    /// `update` calls rejected by the version check.
    pub conflicts: usize,
}

impl StoreStats {
    /// Total committed writes.
    pub fn writes(&self) -> usize {
        self.creates + self.updates
    }
}

/// A versioned map plus its tally, guarded by one lock so a version check
/// and the write it guards can't interleave with another writer.
struct Shelf<K, V> {
    items: BTreeMap<K, V>,
    stats: StoreStats,
}

impl<K, V> Default for Shelf<K, V> {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
            stats: StoreStats::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Player directory
// ---------------------------------------------------------------------------

/// Profile directory backed by a hash map.
#[derive(Clone, Default)]
pub struct InMemoryPlayerDirectory {
    profiles: Arc<RwLock<HashMap<PlayerUid, PlayerProfile>>>,
    lookups: Arc<AtomicUsize>,
}

impl InMemoryPlayerDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory pre-loaded with `profiles`.
    pub fn with_profiles(profiles: impl IntoIterator<Item = PlayerProfile>) -> Self {
        let map = profiles
            .into_iter()
            .map(|profile| (profile.uid.clone(), profile))
            .collect();
        Self {
            profiles: Arc::new(RwLock::new(map)),
            lookups: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Adds or replaces a profile.
    pub async fn insert(&self, profile: PlayerProfile) {
        self.profiles.write().await.insert(profile.uid.clone(), profile);
    }

    /// Number of `get_by_uid` calls served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl PlayerDirectory for InMemoryPlayerDirectory {
    async fn get_by_uid(&self, uid: &PlayerUid) -> StoreResult<Option<PlayerProfile>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.profiles.read().await.get(uid).cloned())
    }
}

// ---------------------------------------------------------------------------
// Game store
// ---------------------------------------------------------------------------

/// Game store backed by an ordered map, so `list_all` returns games in id
/// (creation) order.
#[derive(Clone, Default)]
pub struct InMemoryGameStore {
    shelf: Arc<Mutex<Shelf<GameId, Game>>>,
    last_id: Arc<AtomicU64>,
}

impl InMemoryGameStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a fixture game as-is, bypassing versioning and the tally.
    pub async fn seed(&self, game: Game) {
        self.last_id.fetch_max(game.id().0, Ordering::SeqCst);
        self.shelf.lock().await.items.insert(game.id(), game);
    }

    /// Operation counts so far.
    pub async fn stats(&self) -> StoreStats {
        self.shelf.lock().await.stats
    }
}

impl GameStore for InMemoryGameStore {
    async fn next_id(&self) -> StoreResult<GameId> {
        Ok(GameId(self.last_id.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn list_all(&self) -> StoreResult<Vec<Game>> {
        let mut shelf = self.shelf.lock().await;
        shelf.stats.reads += 1;
        Ok(shelf.items.values().cloned().collect())
    }

    async fn get_by_id(&self, id: GameId) -> StoreResult<Option<Game>> {
        let mut shelf = self.shelf.lock().await;
        shelf.stats.reads += 1;
        Ok(shelf.items.get(&id).cloned())
    }

    async fn create(&self, game: Game) -> StoreResult<Game> {
        let mut shelf = self.shelf.lock().await;
        if shelf.items.contains_key(&game.id()) {
            return Err(StoreError::Duplicate(format!("game {}", game.id())));
        }
        let stored = game.clone().with_version(game.version() + 1);
        shelf.items.insert(stored.id(), stored.clone());
        shelf.stats.creates += 1;
        Ok(stored)
    }

    async fn update(&self, game: Game) -> StoreResult<Game> {
        let mut shelf = self.shelf.lock().await;
        let found = shelf
            .items
            .get(&game.id())
            .map(Game::version)
            .ok_or_else(|| StoreError::Missing(format!("game {}", game.id())))?;
        if found != game.version() {
            shelf.stats.conflicts += 1;
            tracing::debug!(
                game_id = %game.id(),
                expected = game.version(),
                found,
                "game write rejected by version check"
            );
            return Err(StoreError::Conflict {
                entity: format!("game {}", game.id()),
                expected: game.version(),
                found,
            });
        }
        let stored = game.with_version(found + 1);
        shelf.items.insert(stored.id(), stored.clone());
        shelf.stats.updates += 1;
        Ok(stored)
    }
}

// ---------------------------------------------------------------------------
// Infinite game store
// ---------------------------------------------------------------------------

/// Infinite-session store backed by an ordered map.
#[derive(Clone, Default)]
pub struct InMemoryInfiniteGameStore {
    shelf: Arc<Mutex<Shelf<InfiniteGameId, InfiniteGame>>>,
}

impl InMemoryInfiniteGameStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a fixture session as-is, bypassing versioning and the tally.
    pub async fn seed(&self, game: InfiniteGame) {
        self.shelf.lock().await.items.insert(game.id(), game);
    }

    /// Operation counts so far.
    pub async fn stats(&self) -> StoreStats {
        self.shelf.lock().await.stats
    }
}

impl InfiniteGameStore for InMemoryInfiniteGameStore {
    async fn get_by_id(&self, id: InfiniteGameId) -> StoreResult<Option<InfiniteGame>> {
        let mut shelf = self.shelf.lock().await;
        shelf.stats.reads += 1;
        Ok(shelf.items.get(&id).cloned())
    }

    async fn insert(&self, game: InfiniteGame) -> StoreResult<InfiniteGame> {
        let mut shelf = self.shelf.lock().await;
        if shelf.items.contains_key(&game.id()) {
            return Err(StoreError::Duplicate(format!("infinite game {}", game.id())));
        }
        let stored = game.clone().with_version(game.version() + 1);
        shelf.items.insert(stored.id(), stored.clone());
        shelf.stats.creates += 1;
        Ok(stored)
    }

    async fn update(&self, game: InfiniteGame) -> StoreResult<InfiniteGame> {
        let mut shelf = self.shelf.lock().await;
        let found = shelf
            .items
            .get(&game.id())
            .map(InfiniteGame::version)
            .ok_or_else(|| StoreError::Missing(format!("infinite game {}", game.id())))?;
        if found != game.version() {
            shelf.stats.conflicts += 1;
            tracing::debug!(
                game_id = %game.id(),
                expected = game.version(),
                found,
                "infinite game write rejected by version check"
            );
            return Err(StoreError::Conflict {
                entity: format!("infinite game {}", game.id()),
                expected: game.version(),
                found,
            });
        }
        let stored = game.with_version(found + 1);
        shelf.items.insert(stored.id(), stored.clone());
        shelf.stats.updates += 1;
        Ok(stored)
    }
}

// ---------------------------------------------------------------------------
// Question supply
// ---------------------------------------------------------------------------

/// Hands out a fixed question list, cycling when a batch is larger than
/// the list. Every batch starts from the first question, so the output
/// only depends on the requested size.
#[derive(Clone)]
pub struct FixedQuestionSupply {
    questions: Arc<Vec<Question>>,
    batches: Arc<AtomicUsize>,
}

impl FixedQuestionSupply {
    /// Creates a supply over `questions`.
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: Arc::new(questions),
            batches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of batches handed out so far.
    pub fn batches_served(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }
}

impl Default for FixedQuestionSupply {
    fn default() -> Self {
        let sample = [("7 + 5", 12), ("9 × 3", 27), ("18 − 11", 7), ("36 ÷ 4", 9)];
        let questions = sample
            .into_iter()
            .map(|(equation, answer)| Question {
                equation: equation.to_string(),
                options: vec![
                    (answer - 1).to_string(),
                    answer.to_string(),
                    (answer + 2).to_string(),
                ],
                correct_index: 1,
            })
            .collect();
        Self::new(questions)
    }
}

impl QuestionSupply for FixedQuestionSupply {
    async fn next_batch(&self, context: QuestionContext) -> StoreResult<Vec<Question>> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .questions
            .iter()
            .cycle()
            .take(context.batch_size)
            .cloned()
            .collect())
    }
}
