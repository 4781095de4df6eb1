//! The engine handle every client operation runs through.

use std::sync::{Arc, Mutex, PoisonError};

use challengers_rules::{BoardLayout, Game, GameRules};
use tracing::{debug, info, instrument, warn};

use crate::commit::{Committed, Plan, commit};
use crate::completion::{FallbackCompletion, TextCompletion};
use crate::config::EngineConfig;
use crate::error::GameError;
use crate::random::{RandomSource, SeededRandom};
use crate::store::{
    GameEvent, GameStore, MemoryStore, ProfileStore, StoreError, SubscriptionHandle, UserProfile,
};

/// One client's view of the shared store, plus the collaborators it needs.
///
/// There is no server: any number of engines may run against the same
/// store concurrently, each acting for its own user. Clones share
/// collaborators.
#[derive(Clone)]
pub struct GameEngine {
    games: Arc<dyn GameStore>,
    profiles: Arc<dyn ProfileStore>,
    completion: FallbackCompletion,
    random: Arc<Mutex<Box<dyn RandomSource>>>,
    config: Arc<EngineConfig>,
    layout: BoardLayout,
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("config", &self.config)
            .field("board_size", &self.layout.size())
            .finish_non_exhaustive()
    }
}

impl GameEngine {
    /// Engine over the given stores, with offline text completion.
    #[instrument(skip_all)]
    pub fn new(
        games: Arc<dyn GameStore>,
        profiles: Arc<dyn ProfileStore>,
        config: EngineConfig,
    ) -> Self {
        let random: Box<dyn RandomSource> = match config.seed() {
            Some(seed) => Box::new(SeededRandom::seeded(*seed)),
            None => Box::new(SeededRandom::from_entropy()),
        };
        let completion = FallbackCompletion::new(
            Arc::new(crate::completion::OfflineCompletion),
            config.completion_timeout(),
        );
        let layout = config.layout();
        info!(
            board_size = layout.size(),
            commit_attempts = config.commit_attempts(),
            "Creating game engine"
        );
        Self {
            games,
            profiles,
            completion,
            random: Arc::new(Mutex::new(random)),
            config: Arc::new(config),
            layout,
        }
    }

    /// Engine over a fresh in-memory store, returned alongside it.
    pub fn in_memory(config: EngineConfig) -> (Self, MemoryStore) {
        let store = MemoryStore::new();
        let engine = Self::new(Arc::new(store.clone()), Arc::new(store.clone()), config);
        (engine, store)
    }

    /// Uses `completion` for hints and summaries, bounded by the configured timeout.
    pub fn with_completion(mut self, completion: Arc<dyn TextCompletion>) -> Self {
        self.completion = FallbackCompletion::new(completion, self.config.completion_timeout());
        self
    }

    /// Draws dice, equations and rewards from `random`.
    pub fn with_random(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Arc::new(Mutex::new(Box::new(random)));
        self
    }

    /// Plays on `layout` instead of the configured board.
    pub fn with_layout(mut self, layout: BoardLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Game constants.
    pub fn rules(&self) -> &GameRules {
        self.config.rules()
    }

    /// Full configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The board being played.
    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    /// Game documents.
    pub fn games(&self) -> &dyn GameStore {
        self.games.as_ref()
    }

    /// Account records.
    pub fn profiles(&self) -> &dyn ProfileStore {
        self.profiles.as_ref()
    }

    pub(crate) fn completion(&self) -> &FallbackCompletion {
        &self.completion
    }

    /// Runs `draw` against the shared random source.
    pub(crate) fn draw<T>(&self, draw: impl FnOnce(&mut dyn RandomSource) -> T) -> T {
        let mut random = self.random.lock().unwrap_or_else(PoisonError::into_inner);
        draw(&mut **random)
    }

    /// Optimistic read-plan-write with the configured retry budget.
    pub(crate) async fn commit<F>(&self, game_id: &str, plan: F) -> Result<Committed, GameError>
    where
        F: FnMut(&Game) -> Result<Plan, GameError>,
    {
        commit(
            self.games.as_ref(),
            game_id,
            *self.config.commit_attempts(),
            plan,
        )
        .await
    }

    /// Creates an account record if none exists; returns the stored profile.
    #[instrument(skip(self, display_name))]
    pub async fn register_profile(
        &self,
        user_id: &str,
        display_name: &str,
    ) -> Result<UserProfile, GameError> {
        if let Some(existing) = self.profiles.profile(user_id).await? {
            debug!("Profile already registered");
            return Ok(existing);
        }
        let profile = UserProfile::new(user_id, display_name);
        self.profiles.put_profile(profile.clone()).await?;
        info!("Profile registered");
        Ok(profile)
    }

    /// The caller's account, required for every acting operation.
    pub(crate) async fn acting_profile(&self, user_id: &str) -> Result<UserProfile, GameError> {
        self.profiles
            .profile(user_id)
            .await?
            .ok_or_else(|| GameError::UnknownUser(user_id.to_string()))
    }

    /// Points (or clears) a back-reference. A missing account is not an error.
    #[instrument(skip(self))]
    pub(crate) async fn point_room(
        &self,
        user_id: &str,
        room: Option<&str>,
    ) -> Result<(), GameError> {
        match self
            .profiles
            .set_current_room(user_id, room.map(str::to_string))
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_missing() => {
                warn!("No profile to update back-reference on");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Current state of a game.
    #[instrument(skip(self))]
    pub async fn game(&self, game_id: &str) -> Result<Option<Game>, GameError> {
        Ok(self.games.get(game_id).await?)
    }

    /// Calls `on_update` with every snapshot of a game (starting with the
    /// current one) and `on_error` on delivery failures, until the handle is
    /// dropped.
    #[instrument(skip(self, on_update, on_error))]
    pub async fn subscribe<U, E>(
        &self,
        game_id: &str,
        on_update: U,
        on_error: E,
    ) -> Result<SubscriptionHandle, GameError>
    where
        U: FnMut(GameEvent) + Send + 'static,
        E: FnMut(StoreError) + Send + 'static,
    {
        let subscription = self.games.subscribe(game_id).await?;
        Ok(subscription.on_update(on_update, on_error))
    }

    /// Calls `on_update` with every listing of waiting games.
    #[instrument(skip(self, on_update, on_error))]
    pub async fn subscribe_waiting<U, E>(
        &self,
        on_update: U,
        on_error: E,
    ) -> Result<SubscriptionHandle, GameError>
    where
        U: FnMut(Vec<Game>) + Send + 'static,
        E: FnMut(StoreError) + Send + 'static,
    {
        let subscription = self.games.subscribe_waiting().await?;
        Ok(subscription.on_update(on_update, on_error))
    }
}
