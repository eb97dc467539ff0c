//! Data models for Washbay

pub mod addon;
pub mod building;
pub mod order;
pub mod pagination;
pub mod pitch;
pub mod slot;
pub mod user;

// Re-export commonly used types
pub use addon::AddOn;
pub use building::Building;
pub use order::{NewOrder, OrderSummary};
pub use pagination::{PageInfo, Pagination};
pub use pitch::Pitch;
pub use slot::{Slot, SlotAvailability};
pub use user::{OrderScope, Role, UserClaims};
