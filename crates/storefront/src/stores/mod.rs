//! Client-side state stores.
//!
//! Each store is an explicit handle (cheap to clone, shared state behind
//! `Arc`) rather than a process-wide global. Mutable state sits behind a
//! `parking_lot::RwLock`; every public mutation takes the write lock once,
//! changes state, persists the new record and releases the lock. Stores
//! rehydrate once, in their constructor.

mod auth;
mod cart;
mod wishlist;

pub use auth::{AuthStore, Session};
pub use cart::{CartLine, CartStore, Pulse};
pub use wishlist::WishlistStore;
