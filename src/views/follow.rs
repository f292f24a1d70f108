//! Follow/unfollow control for a creator.

use std::sync::Arc;

use crate::api::{ApiClient, FollowState};
use crate::lifecycle::ScopeHandle;
use crate::notify::Notifier;
use crate::optimistic::Optimistic;
use crate::session::Session;
use crate::views::mvi::{Intent, Reducer, UiState};
use crate::views::ActionResult;

impl UiState for FollowState {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowIntent {
    Toggle,
}

impl Intent for FollowIntent {}

pub struct FollowReducer;

impl Reducer for FollowReducer {
    type State = FollowState;
    type Intent = FollowIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            FollowIntent::Toggle => {
                if state.following {
                    FollowState {
                        following: false,
                        followers: state.followers.saturating_sub(1),
                    }
                } else {
                    FollowState {
                        following: true,
                        followers: state.followers + 1,
                    }
                }
            }
        }
    }
}

#[derive(Clone)]
pub struct FollowButton {
    creator_id: String,
    api: Arc<ApiClient>,
    session: Session,
    state: Optimistic<FollowState>,
}

impl FollowButton {
    pub fn new(
        creator_id: impl Into<String>,
        initial: FollowState,
        api: Arc<ApiClient>,
        session: Session,
        scope: ScopeHandle,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            creator_id: creator_id.into(),
            api,
            session,
            state: Optimistic::new(initial, scope, notifier),
        }
    }

    pub fn state(&self) -> FollowState {
        self.state.value()
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// Creators never see a follow button on their own channel.
    pub fn is_visible(&self) -> bool {
        self.session
            .user()
            .map_or(true, |user| user.id != self.creator_id)
    }

    pub async fn toggle(&self) -> ActionResult<FollowState> {
        let user = match self.session.require_user() {
            Ok(user) => user,
            Err(_) => return ActionResult::SignInRequired,
        };
        if user.id == self.creator_id {
            return ActionResult::NotPermitted;
        }

        let action = if self.state.value().following {
            "unfollow creator"
        } else {
            "follow creator"
        };
        let api = Arc::clone(&self.api);
        let creator_id = self.creator_id.clone();
        let outcome = self
            .state
            .mutate(
                action,
                |state| FollowReducer::reduce(*state, FollowIntent::Toggle),
                move |next| async move { api.set_following(&creator_id, next.following).await },
            )
            .await;
        ActionResult::Done(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_follow_and_unfollow() {
        let start = FollowState {
            following: false,
            followers: 41,
        };
        let followed = FollowReducer::reduce(start, FollowIntent::Toggle);
        assert_eq!(
            followed,
            FollowState {
                following: true,
                followers: 42
            }
        );
        assert_eq!(FollowReducer::reduce(followed, FollowIntent::Toggle), start);
    }
}
