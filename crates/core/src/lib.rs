//! `staybook-core`: shared types for the Staybook crates.
//!
//! Document model, timestamp and money normalization, and the document
//! store seam. No aggregation logic lives here.

pub mod auth;
pub mod lenient;
pub mod memory;
pub mod model;
pub mod money;
pub mod store;
pub mod time;

pub use auth::{AuthProvider, AuthUser, StaticAuth};
pub use memory::MemoryStore;
pub use model::{
    collections, decode_all, DocumentModel, Listing, Notification, PointsAccount, PointsTransaction,
    Pricing, RedeemedReward, Reservation, ReservationStatus, WalletTransaction,
};
pub use store::{
    documents_from_json, CommitReceipt, Document, DocumentStore, Query, StoreError, Subscription,
    WriteBatch,
};
pub use time::Timestamp;
