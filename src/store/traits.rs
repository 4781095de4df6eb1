//! Store interfaces the engine is written against.

use challengers_rules::{Game, GameId, GameUpdate, UserId};

use crate::store::{GameEvent, Reward, StoreError, Subscription, UserProfile};

/// Guard on a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Last writer wins.
    None,
    /// Reject unless the stored revision equals this one.
    Revision(u64),
}

/// Shared game documents with near-real-time fan-out.
///
/// Every write bumps the document revision and is pushed to subscribers as a
/// full snapshot.
#[async_trait::async_trait]
pub trait GameStore: Send + Sync {
    /// Inserts a new game. Fails with a conflict if the id is taken.
    async fn create(&self, game: Game) -> Result<Game, StoreError>;

    /// Reads a game.
    async fn get(&self, game_id: &str) -> Result<Option<Game>, StoreError>;

    /// Overwrites or inserts a whole game unconditionally.
    async fn set(&self, game: Game) -> Result<Game, StoreError>;

    /// Applies every write in `update` as one write call.
    async fn update(
        &self,
        game_id: &str,
        update: GameUpdate,
        precondition: Precondition,
    ) -> Result<Game, StoreError>;

    /// Removes a game.
    async fn delete(&self, game_id: &str, precondition: Precondition) -> Result<(), StoreError>;

    /// Games currently accepting players.
    async fn list_waiting(&self) -> Result<Vec<Game>, StoreError>;

    /// Snapshots of one game, starting with its current state.
    async fn subscribe(&self, game_id: &str) -> Result<Subscription<GameEvent>, StoreError>;

    /// Lobby listings of waiting games, starting with the current listing.
    async fn subscribe_waiting(&self) -> Result<Subscription<Vec<Game>>, StoreError>;
}

/// Account records.
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// Reads a profile.
    async fn profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError>;

    /// Inserts or replaces a profile.
    async fn put_profile(&self, profile: UserProfile) -> Result<(), StoreError>;

    /// Points the profile at a game, or clears the pointer.
    async fn set_current_room(
        &self,
        user_id: &str,
        room: Option<GameId>,
    ) -> Result<(), StoreError>;

    /// Adds a reward; returns whether it was newly granted.
    async fn grant_reward(&self, user_id: &str, reward: Reward) -> Result<bool, StoreError>;
}

/// Profiles for a whole roster, in roster order; missing accounts are skipped.
pub async fn profiles_for(
    store: &dyn ProfileStore,
    user_ids: &[UserId],
) -> Result<Vec<UserProfile>, StoreError> {
    let mut profiles = Vec::with_capacity(user_ids.len());
    for user_id in user_ids {
        if let Some(profile) = store.profile(user_id).await? {
            profiles.push(profile);
        }
    }
    Ok(profiles)
}
