//! Like/dislike control for videos, comments and community posts.

use std::sync::Arc;

use crate::api::{ApiClient, LikeState, Reaction, ReactionTarget};
use crate::lifecycle::ScopeHandle;
use crate::notify::Notifier;
use crate::optimistic::Optimistic;
use crate::session::Session;
use crate::views::mvi::{Intent, Reducer, UiState};
use crate::views::ActionResult;

impl UiState for LikeState {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionIntent {
    ToggleLike,
    ToggleDislike,
}

impl Intent for ReactionIntent {}

/// Like and dislike are mutually exclusive.
pub struct ReactionReducer;

impl Reducer for ReactionReducer {
    type State = LikeState;
    type Intent = ReactionIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        let mut next = state;
        match intent {
            ReactionIntent::ToggleLike => {
                if state.liked {
                    next.liked = false;
                    next.likes = state.likes.saturating_sub(1);
                } else {
                    next.liked = true;
                    next.likes = state.likes + 1;
                    if state.disliked {
                        next.disliked = false;
                        next.dislikes = state.dislikes.saturating_sub(1);
                    }
                }
            }
            ReactionIntent::ToggleDislike => {
                if state.disliked {
                    next.disliked = false;
                    next.dislikes = state.dislikes.saturating_sub(1);
                } else {
                    next.disliked = true;
                    next.dislikes = state.dislikes + 1;
                    if state.liked {
                        next.liked = false;
                        next.likes = state.likes.saturating_sub(1);
                    }
                }
            }
        }
        next
    }
}

/// Like button bound to one target.
#[derive(Clone)]
pub struct LikeButton {
    target: ReactionTarget,
    api: Arc<ApiClient>,
    session: Session,
    state: Optimistic<LikeState>,
}

impl LikeButton {
    pub fn new(
        target: ReactionTarget,
        initial: LikeState,
        api: Arc<ApiClient>,
        session: Session,
        scope: ScopeHandle,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            target,
            api,
            session,
            state: Optimistic::new(initial, scope, notifier),
        }
    }

    pub fn target(&self) -> &ReactionTarget {
        &self.target
    }

    pub fn state(&self) -> LikeState {
        self.state.value()
    }

    /// The control is disabled while a request is in flight.
    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// Take counters from a refreshed listing.
    pub fn sync(&self, state: LikeState) {
        self.state.sync(state);
    }

    pub async fn toggle_like(&self) -> ActionResult<LikeState> {
        self.react(ReactionIntent::ToggleLike).await
    }

    pub async fn toggle_dislike(&self) -> ActionResult<LikeState> {
        self.react(ReactionIntent::ToggleDislike).await
    }

    async fn react(&self, intent: ReactionIntent) -> ActionResult<LikeState> {
        if self.session.require_user().is_err() {
            tracing::debug!(target_noun = self.target.noun(), "Reaction requires sign-in");
            return ActionResult::SignInRequired;
        }

        let current = self.state.value();
        let (reaction, undo) = match intent {
            ReactionIntent::ToggleLike => (Reaction::Like, current.liked),
            ReactionIntent::ToggleDislike => (Reaction::Dislike, current.disliked),
        };
        let action = format!(
            "{}{} {}",
            if undo { "un" } else { "" },
            match reaction {
                Reaction::Like => "like",
                Reaction::Dislike => "dislike",
            },
            self.target.noun()
        );

        let api = Arc::clone(&self.api);
        let target = self.target.clone();
        let outcome = self
            .state
            .mutate(
                &action,
                |state| ReactionReducer::reduce(*state, intent),
                move |next| async move {
                    let active = match reaction {
                        Reaction::Like => next.liked,
                        Reaction::Dislike => next.disliked,
                    };
                    api.react(&target, reaction, active).await
                },
            )
            .await;
        ActionResult::Done(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_increments() {
        let next = ReactionReducer::reduce(LikeState::new(false, 10), ReactionIntent::ToggleLike);
        assert_eq!(next, LikeState::new(true, 11));
    }

    #[test]
    fn unlike_decrements() {
        let next = ReactionReducer::reduce(LikeState::new(true, 11), ReactionIntent::ToggleLike);
        assert_eq!(next, LikeState::new(false, 10));
    }

    #[test]
    fn unlike_never_underflows() {
        let next = ReactionReducer::reduce(LikeState::new(true, 0), ReactionIntent::ToggleLike);
        assert_eq!(next.likes, 0);
    }

    #[test]
    fn dislike_clears_like() {
        let state = LikeState::new(true, 5);
        let next = ReactionReducer::reduce(state, ReactionIntent::ToggleDislike);
        assert!(!next.liked);
        assert_eq!(next.likes, 4);
        assert!(next.disliked);
        assert_eq!(next.dislikes, 1);
    }

    #[test]
    fn like_clears_dislike() {
        let state = LikeState {
            liked: false,
            likes: 2,
            disliked: true,
            dislikes: 3,
        };
        let next = ReactionReducer::reduce(state, ReactionIntent::ToggleLike);
        assert_eq!(
            next,
            LikeState {
                liked: true,
                likes: 3,
                disliked: false,
                dislikes: 2,
            }
        );
    }
}
