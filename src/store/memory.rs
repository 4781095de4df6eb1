//! In-process reactive store.

use std::collections::HashMap;
use std::sync::Arc;

use challengers_rules::{Game, GameId, GameStatus, GameUpdate};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, instrument, warn};

use crate::store::{
    GameEvent, GameStore, Precondition, ProfileStore, Reward, StoreError, Subscription,
    UserProfile,
};

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Default)]
struct Documents {
    games: HashMap<GameId, Game>,
    profiles: HashMap<String, UserProfile>,
    channels: HashMap<GameId, broadcast::Sender<GameEvent>>,
}

impl Documents {
    fn waiting(&self) -> Vec<Game> {
        let mut waiting: Vec<Game> = self
            .games
            .values()
            .filter(|g| g.status == GameStatus::Waiting)
            .cloned()
            .collect();
        waiting.sort_by(|a, b| a.id.cmp(&b.id));
        waiting
    }

    fn channel(&mut self, game_id: &str, capacity: usize) -> broadcast::Sender<GameEvent> {
        self.channels
            .entry(game_id.to_string())
            .or_insert_with(|| broadcast::channel(capacity).0)
            .clone()
    }

    /// Drops channels whose subscribers have all gone away.
    fn prune_channels(&mut self) {
        let before = self.channels.len();
        self.channels.retain(|_, sender| sender.receiver_count() > 0);
        let pruned = before - self.channels.len();
        if pruned > 0 {
            debug!(pruned, "Dropped idle game channels");
        }
    }
}

/// Game and profile documents held in memory, fanned out over broadcast
/// channels.
///
/// Clones share the same documents, so every clone behaves like another
/// connected client of one backend.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    docs: Arc<RwLock<Documents>>,
    lobby: broadcast::Sender<Vec<Game>>,
    capacity: usize,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates an empty store whose subscribers buffer `capacity` snapshots.
    #[instrument]
    pub fn with_capacity(capacity: usize) -> Self {
        info!(capacity, "Creating in-memory store");
        let capacity = capacity.max(1);
        Self {
            docs: Arc::new(RwLock::new(Documents::default())),
            lobby: broadcast::channel(capacity).0,
            capacity,
        }
    }

    /// Number of games that currently have a live snapshot channel.
    pub async fn open_channels(&self) -> usize {
        self.docs.read().await.channels.len()
    }

    fn publish(&self, docs: &mut Documents, event: GameEvent, lobby_changed: bool) {
        let game_id = match &event {
            GameEvent::Snapshot(game) => game.id.clone(),
            GameEvent::Deleted(id) => id.clone(),
        };
        let delivered = docs
            .channels
            .get(&game_id)
            .map_or(0, |sender| sender.send(event).unwrap_or(0));
        debug!(game_id = %game_id, delivered, "Snapshot published");
        docs.prune_channels();
        if lobby_changed {
            let _ = self.lobby.send(docs.waiting());
        }
    }

    fn commit(&self, docs: &mut Documents, mut game: Game, previous: Option<&Game>) -> Game {
        game.revision = previous.map_or(game.revision, |p| p.revision) + 1;
        let lobby_changed = game.status == GameStatus::Waiting
            || previous.is_some_and(|p| p.status == GameStatus::Waiting);
        docs.games.insert(game.id.clone(), game.clone());
        self.publish(docs, GameEvent::Snapshot(game.clone()), lobby_changed);
        game
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn check(precondition: Precondition, game: &Game) -> Result<(), StoreError> {
    match precondition {
        Precondition::Revision(expected) if expected != game.revision => {
            Err(StoreError::conflict(format!(
                "game {} is at revision {}, write expected {}",
                game.id, game.revision, expected
            )))
        }
        _ => Ok(()),
    }
}

#[async_trait::async_trait]
impl GameStore for MemoryStore {
    #[instrument(skip(self, game), fields(game_id = %game.id))]
    async fn create(&self, game: Game) -> Result<Game, StoreError> {
        let mut docs = self.docs.write().await;
        if docs.games.contains_key(&game.id) {
            warn!("Game id already taken");
            return Err(StoreError::conflict(format!("game {} already exists", game.id)));
        }
        let created = self.commit(&mut docs, game, None);
        info!(revision = created.revision, "Game created");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn get(&self, game_id: &str) -> Result<Option<Game>, StoreError> {
        let docs = self.docs.read().await;
        Ok(docs.games.get(game_id).cloned())
    }

    #[instrument(skip(self, game), fields(game_id = %game.id))]
    async fn set(&self, game: Game) -> Result<Game, StoreError> {
        let mut docs = self.docs.write().await;
        let previous = docs.games.get(&game.id).cloned();
        Ok(self.commit(&mut docs, game, previous.as_ref()))
    }

    #[instrument(skip(self, update), fields(writes = update.fields().len()))]
    async fn update(
        &self,
        game_id: &str,
        update: GameUpdate,
        precondition: Precondition,
    ) -> Result<Game, StoreError> {
        let mut docs = self.docs.write().await;
        let previous = docs
            .games
            .get(game_id)
            .cloned()
            .ok_or_else(|| StoreError::missing(format!("game {} not found", game_id)))?;
        check(precondition, &previous)?;
        let next = previous.clone().applied(&update);
        let written = self.commit(&mut docs, next, Some(&previous));
        debug!(revision = written.revision, "Game updated");
        Ok(written)
    }

    #[instrument(skip(self))]
    async fn delete(&self, game_id: &str, precondition: Precondition) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        let previous = docs
            .games
            .get(game_id)
            .ok_or_else(|| StoreError::missing(format!("game {} not found", game_id)))?;
        check(precondition, previous)?;
        let was_waiting = previous.status == GameStatus::Waiting;
        docs.games.remove(game_id);
        self.publish(&mut docs, GameEvent::Deleted(game_id.to_string()), was_waiting);
        info!("Game deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_waiting(&self) -> Result<Vec<Game>, StoreError> {
        let docs = self.docs.read().await;
        let waiting = docs.waiting();
        debug!(count = waiting.len(), "Listed waiting games");
        Ok(waiting)
    }

    #[instrument(skip(self))]
    async fn subscribe(&self, game_id: &str) -> Result<Subscription<GameEvent>, StoreError> {
        let mut docs = self.docs.write().await;
        docs.prune_channels();
        let rx = docs.channel(game_id, self.capacity).subscribe();
        let initial = match docs.games.get(game_id) {
            Some(game) => GameEvent::Snapshot(game.clone()),
            None => GameEvent::Deleted(game_id.to_string()),
        };
        Ok(Subscription::new(format!("game:{}", game_id), Some(initial), rx))
    }

    #[instrument(skip(self))]
    async fn subscribe_waiting(&self) -> Result<Subscription<Vec<Game>>, StoreError> {
        let docs = self.docs.read().await;
        let rx = self.lobby.subscribe();
        Ok(Subscription::new("lobby", Some(docs.waiting()), rx))
    }
}

#[async_trait::async_trait]
impl ProfileStore for MemoryStore {
    #[instrument(skip(self))]
    async fn profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let docs = self.docs.read().await;
        Ok(docs.profiles.get(user_id).cloned())
    }

    #[instrument(skip(self, profile), fields(user_id = %profile.id))]
    async fn put_profile(&self, profile: UserProfile) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        docs.profiles.insert(profile.id.clone(), profile);
        debug!("Profile stored");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_current_room(
        &self,
        user_id: &str,
        room: Option<GameId>,
    ) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        let profile = docs
            .profiles
            .get_mut(user_id)
            .ok_or_else(|| StoreError::missing(format!("profile {} not found", user_id)))?;
        profile.current_room_id = room;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn grant_reward(&self, user_id: &str, reward: Reward) -> Result<bool, StoreError> {
        let mut docs = self.docs.write().await;
        let profile = docs
            .profiles
            .get_mut(user_id)
            .ok_or_else(|| StoreError::missing(format!("profile {} not found", user_id)))?;
        let granted = profile.rewards.insert(reward);
        if granted {
            info!(%reward, "Reward granted");
        }
        Ok(granted)
    }
}
