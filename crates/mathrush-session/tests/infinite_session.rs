//! Integration tests for infinite session status and abandonment.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use mathrush_model::{Comparison, InfiniteGame, InfiniteGameId, InfiniteQuestion, PlayerUid};
use mathrush_session::{InfiniteSessionManager, SessionError};
use mathrush_store::{InMemoryInfiniteGameStore, InfiniteGameStore, StoreError, StoreResult};
use time::{Duration, OffsetDateTime};

fn question(equation: &str, expected: Comparison) -> InfiniteQuestion {
    InfiniteQuestion {
        equation: equation.to_string(),
        options: vec!["MAYOR".to_string(), "MENOR".to_string()],
        correct_index: usize::from(expected == Comparison::Lesser),
        expected,
    }
}

/// Session 1 from the product scenario: batch 2, question 5, 10 correct.
fn scenario_session() -> InfiniteGame {
    InfiniteGame::new(
        InfiniteGameId(1),
        PlayerUid::new("player-1"),
        vec![
            question("7 + 5 ? 10", Comparison::Greater),
            question("3 x 3 ? 12", Comparison::Lesser),
        ],
        OffsetDateTime::now_utc() - Duration::minutes(30),
    )
    .with_progress(2, 5, 10)
    .and_then(|game| game.with_difficulty(2, 3))
    .unwrap()
}

async fn setup() -> (
    InfiniteSessionManager<InMemoryInfiniteGameStore>,
    InMemoryInfiniteGameStore,
) {
    let store = InMemoryInfiniteGameStore::new();
    store.seed(scenario_session()).await;
    (InfiniteSessionManager::new(store.clone()), store)
}

// ---------------------------------------------------------------------------
// get_status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_get_status_active_session_reports_counters() {
    let (manager, _) = setup().await;

    let view = manager.get_status(InfiniteGameId(1)).await.unwrap();

    assert!(view.is_active);
    assert_eq!(view.abandoned_at, None);
    assert_eq!(view.current_batch, 2);
    assert_eq!(view.current_question_index, 5);
    assert_eq!(view.correct_answers, 10);
    assert_eq!(view.total_questions, 2);
}

#[tokio::test]
async fn test_get_status_missing_session_names_id() {
    let (manager, _) = setup().await;

    let err = manager.get_status(InfiniteGameId(999)).await.unwrap_err();

    assert!(matches!(err, SessionError::NotFound(InfiniteGameId(999))));
    assert!(err.to_string().contains("999"));
}

// ---------------------------------------------------------------------------
// abandon
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_abandon_active_session_stamps_time_and_keeps_progress() {
    let (manager, store) = setup().await;
    let before = store.get_by_id(InfiniteGameId(1)).await.unwrap().unwrap();

    let call_start = OffsetDateTime::now_utc();
    let view = manager.abandon(InfiniteGameId(1)).await.unwrap();
    let call_end = OffsetDateTime::now_utc();

    let abandoned_at = view.abandoned_at.expect("abandoned_at must be set");
    assert!(call_start <= abandoned_at && abandoned_at <= call_end);
    assert!(!view.is_active);
    assert_eq!(view.correct_answers, 10);
    assert_eq!(view.current_batch, 2);
    assert_eq!(view.current_question_index, 5);

    let after = store.get_by_id(InfiniteGameId(1)).await.unwrap().unwrap();
    assert_eq!(after.abandoned_at(), Some(abandoned_at));
    assert_eq!(after.questions(), before.questions());
    assert_eq!(after.current_world_id(), before.current_world_id());
    assert_eq!(after.current_difficulty_step(), before.current_difficulty_step());
    assert_eq!(after.game_started_at(), before.game_started_at());
}

#[tokio::test]
async fn test_abandon_twice_is_rejected_and_keeps_first_timestamp() {
    let (manager, store) = setup().await;
    let first = manager.abandon(InfiniteGameId(1)).await.unwrap();
    let writes_after_first = store.stats().await.writes();

    let err = manager.abandon(InfiniteGameId(1)).await.unwrap_err();

    assert!(matches!(err, SessionError::AlreadyAbandoned(InfiniteGameId(1))));
    assert!(err.to_string().contains("has already been abandoned"));
    assert_eq!(store.stats().await.writes(), writes_after_first);
    let status = manager.get_status(InfiniteGameId(1)).await.unwrap();
    assert_eq!(status.abandoned_at, first.abandoned_at);
}

#[tokio::test]
async fn test_abandon_then_progress_rewrite_is_refused() {
    let (manager, store) = setup().await;
    manager.abandon(InfiniteGameId(1)).await.unwrap();
    let abandoned = store.get_by_id(InfiniteGameId(1)).await.unwrap().unwrap();

    let rewrite = abandoned.with_progress(9, 9, 99);

    assert!(rewrite.is_err());
    let stored = store.get_by_id(InfiniteGameId(1)).await.unwrap().unwrap();
    assert!(!stored.is_active());
    assert_eq!(stored.correct_answers(), 10);
    assert_eq!(stored.current_question_index(), 5);
}

#[tokio::test]
async fn test_abandon_missing_session_names_id() {
    let (manager, store) = setup().await;

    let err = manager.abandon(InfiniteGameId(404)).await.unwrap_err();

    assert!(err.to_string().contains("404"));
    assert_eq!(store.stats().await.writes(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_abandon_concurrent_calls_succeed_once() {
    let (manager, store) = setup().await;
    let manager = Arc::new(manager);

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.abandon(InfiniteGameId(1)).await })
        })
        .collect();
    let mut successes = 0;
    let mut rejections = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => successes += 1,
            Err(SessionError::AlreadyAbandoned(_)) => rejections += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(rejections, 7);
    assert_eq!(store.stats().await.updates, 1);
}

// ---------------------------------------------------------------------------
// Racing writers
// ---------------------------------------------------------------------------

/// Applies a gameplay progress update right before the first write, as if
/// the player answered a question while the abandon was in flight.
struct ProgressRace {
    inner: InMemoryInfiniteGameStore,
    armed: AtomicBool,
}

impl InfiniteGameStore for ProgressRace {
    async fn get_by_id(&self, id: InfiniteGameId) -> StoreResult<Option<InfiniteGame>> {
        self.inner.get_by_id(id).await
    }

    async fn insert(&self, game: InfiniteGame) -> StoreResult<InfiniteGame> {
        self.inner.insert(game).await
    }

    async fn update(&self, game: InfiniteGame) -> StoreResult<InfiniteGame> {
        if self.armed.swap(false, Ordering::SeqCst) {
            let current = self.inner.get_by_id(game.id()).await?.expect("seeded");
            let answered = current.with_progress(2, 6, 11).expect("active");
            self.inner.update(answered).await?;
        }
        self.inner.update(game).await
    }
}

#[tokio::test]
async fn test_abandon_losing_to_progress_update_surfaces_conflict() {
    let inner = InMemoryInfiniteGameStore::new();
    inner.seed(scenario_session()).await;
    let manager = InfiniteSessionManager::new(ProgressRace {
        inner: inner.clone(),
        armed: AtomicBool::new(true),
    });

    let err = manager.abandon(InfiniteGameId(1)).await.unwrap_err();

    assert!(matches!(err, SessionError::Store(StoreError::Conflict { .. })));
    let stored = inner.get_by_id(InfiniteGameId(1)).await.unwrap().unwrap();
    assert!(stored.is_active());
    assert_eq!(stored.correct_answers(), 11);
}

/// An infinite store whose backend is down.
struct DownStore;

impl InfiniteGameStore for DownStore {
    async fn get_by_id(&self, _id: InfiniteGameId) -> StoreResult<Option<InfiniteGame>> {
        Err(down())
    }

    async fn insert(&self, _game: InfiniteGame) -> StoreResult<InfiniteGame> {
        Err(down())
    }

    async fn update(&self, _game: InfiniteGame) -> StoreResult<InfiniteGame> {
        Err(down())
    }
}

fn down() -> StoreError {
    StoreError::unavailable(
        "infinite games",
        std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out"),
    )
}

#[tokio::test]
async fn test_get_status_store_failure_is_passed_through() {
    let manager = InfiniteSessionManager::new(DownStore);

    let err = manager.get_status(InfiniteGameId(1)).await.unwrap_err();

    assert!(matches!(err, SessionError::Store(StoreError::Unavailable { .. })));
}
