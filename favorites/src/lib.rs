//! Admin configuration and admin-gated favorites.
//!
//! Each authority may register one `AdminConfig`. Each owner has at most one
//! `Favorite`. Once committed, a favorite only changes through
//! request → approve → apply:
//!
//! ```text
//! (none) --commit_initial--> Committed
//! Committed --new_rq_update_favorites--> Pending(unapproved)
//! Pending(unapproved) --approve_update (admin)--> Pending(approved)
//! Pending(approved) --apply_approved_update--> Committed
//! ```
//!
//! A new request at any pending stage replaces the staged values and drops any
//! approval.

pub mod engine;
pub mod error;
pub mod records;
pub mod seeds;

pub use engine::FavoritesEngine;
pub use error::FavoriteError;
pub use records::{AdminConfig, Favorite, FavoriteValues};
