//! View-models for the interactive parts of the platform.
//!
//! Each view-model owns its own local state, receives its session and API
//! client explicitly, and routes every server mutation through
//! [`Optimistic`](crate::optimistic::Optimistic).

pub mod comments;
pub mod flash_sale;
pub mod follow;
pub mod live;
pub mod mvi;
pub mod reactions;

use crate::optimistic::MutationOutcome;

pub use comments::{CommentNode, CommentThread};
pub use flash_sale::{FlashSaleBoard, StockIntent, StockReducer};
pub use follow::{FollowButton, FollowIntent, FollowReducer};
pub use live::LiveStreamList;
pub use reactions::{LikeButton, ReactionIntent, ReactionReducer};

/// Result of a user-triggered action on a control.
#[derive(Debug)]
pub enum ActionResult<T> {
    /// No signed-in user; show the sign-in view instead.
    SignInRequired,
    /// The signed-in user may not do this here.
    NotPermitted,
    /// The target is missing or cannot take the action (sold out).
    Unavailable,
    /// The mutation ran (or was ignored as a double submit).
    Done(MutationOutcome<T>),
}

impl<T> ActionResult<T> {
    pub fn outcome(&self) -> Option<&MutationOutcome<T>> {
        match self {
            ActionResult::Done(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_committed(&self) -> bool {
        self.outcome().is_some_and(MutationOutcome::is_committed)
    }
}
