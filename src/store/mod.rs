//! Shared state store: the only path by which the engine reads or writes a
//! game or an account.

mod error;
mod memory;
mod profile;
mod subscription;
mod traits;

pub use error::{StoreError, StoreErrorKind};
pub use memory::MemoryStore;
pub use profile::{Reward, UserProfile};
pub use subscription::{GameEvent, Subscription, SubscriptionHandle};
pub use traits::{GameStore, Precondition, ProfileStore, profiles_for};
