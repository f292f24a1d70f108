//! Client-side state synchronization for a creator platform.
//!
//! View-models keep UI-displayed values consistent with the platform API
//! under asynchronous, possibly failing requests:
//!
//! - [`optimistic`]: apply a change immediately, commit or roll back on
//!   response.
//! - [`polling`]: refresh time-sensitive collections on a fixed interval
//!   while a view is mounted.
//! - [`virtual_list`]: render only the visible slice of long lists.

pub mod api;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod notify;
pub mod optimistic;
pub mod polling;
pub mod session;
pub mod views;
pub mod virtual_list;

pub use error::SyncError;
