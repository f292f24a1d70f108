//! Boundary to the platform's JSON API.
//!
//! The API is an external collaborator: every response is a
//! `{ success, data?, error? }` envelope, and raw payloads are normalized
//! into canonical types before anything downstream sees them.

mod client;
mod endpoints;
mod envelope;
pub mod normalize;
mod pagination;

pub use client::ApiClient;
pub use endpoints::{Reaction, ReactionTarget};
pub use envelope::{ApiErrorBody, Envelope};
pub use normalize::{
    Comment, FlashSale, FollowState, FromWire, LikeState, LiveStream, PinState, PurchaseReceipt,
    StockState,
};
pub use pagination::{Page, PagedList};
