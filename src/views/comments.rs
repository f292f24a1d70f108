//! Comment section: paged loading, reply trees, likes, pins, submission.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::api::{ApiClient, Comment, LikeState, PagedList, PinState, ReactionTarget};
use crate::error::SyncError;
use crate::lifecycle::ScopeHandle;
use crate::notify::{Notifier, Toast};
use crate::optimistic::{MutationOutcome, Optimistic};
use crate::session::Session;
use crate::views::mvi::UiState;
use crate::views::reactions::LikeButton;
use crate::views::ActionResult;

impl UiState for PinState {}

/// A comment with its replies, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    /// This comment plus all nested replies.
    pub fn count(&self) -> usize {
        1 + self.replies.iter().map(CommentNode::count).sum::<usize>()
    }
}

/// Arrange a flat comment list into reply trees.
///
/// Pinned top-level comments come first; otherwise the incoming order is
/// kept. Replies whose parent is not loaded are shown at the top level.
pub fn build_threads(comments: &[Comment]) -> Vec<CommentNode> {
    let known: HashSet<&str> = comments.iter().map(|c| c.id.as_str()).collect();
    let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut roots = Vec::new();

    for (index, comment) in comments.iter().enumerate() {
        match comment.parent_id.as_deref() {
            Some(parent) if parent != comment.id && known.contains(parent) => {
                children.entry(parent).or_default().push(index);
            }
            _ => roots.push(index),
        }
    }

    roots.sort_by_key(|&index| !comments[index].pinned);

    let mut visited = HashSet::new();
    let mut threads: Vec<CommentNode> = roots
        .into_iter()
        .filter_map(|index| build_node(index, comments, &children, &mut visited))
        .collect();

    // Comments caught in a parent cycle are never reached from a root.
    for (index, comment) in comments.iter().enumerate() {
        if !visited.contains(comment.id.as_str()) {
            if let Some(node) = build_node(index, comments, &children, &mut visited) {
                threads.push(node);
            }
        }
    }
    threads
}

fn build_node<'a>(
    index: usize,
    comments: &'a [Comment],
    children: &HashMap<&str, Vec<usize>>,
    visited: &mut HashSet<&'a str>,
) -> Option<CommentNode> {
    let comment = &comments[index];
    if !visited.insert(comment.id.as_str()) {
        return None;
    }
    let replies = children
        .get(comment.id.as_str())
        .map(|kids| {
            kids.iter()
                .filter_map(|&kid| build_node(kid, comments, children, visited))
                .collect()
        })
        .unwrap_or_default();
    Some(CommentNode {
        comment: comment.clone(),
        replies,
    })
}

/// Comment section under one piece of content.
pub struct CommentThread {
    content_id: String,
    owner_id: Option<String>,
    api: Arc<ApiClient>,
    session: Session,
    scope: ScopeHandle,
    notifier: Arc<dyn Notifier>,
    comments: Mutex<PagedList<Comment>>,
    likes: Mutex<HashMap<String, LikeButton>>,
    pins: Mutex<HashMap<String, Optimistic<PinState>>>,
}

impl CommentThread {
    /// `owner_id` is the creator of the content; only they may pin.
    pub fn new(
        content_id: impl Into<String>,
        owner_id: Option<String>,
        page_size: u32,
        api: Arc<ApiClient>,
        session: Session,
        scope: ScopeHandle,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            content_id: content_id.into(),
            owner_id,
            api,
            session,
            scope,
            notifier,
            comments: Mutex::new(PagedList::new(page_size)),
            likes: Mutex::new(HashMap::new()),
            pins: Mutex::new(HashMap::new()),
        }
    }

    pub fn has_more(&self) -> bool {
        self.comments.lock().has_more()
    }

    pub fn total(&self) -> u64 {
        self.comments.lock().total()
    }

    /// Fetch the next page. Returns how many comments were added.
    pub async fn load_more(&self) -> Result<usize, SyncError> {
        let (page, limit) = {
            let comments = self.comments.lock();
            if !comments.has_more() {
                return Ok(0);
            }
            (comments.next_page(), comments.limit())
        };

        match self.api.list_comments(&self.content_id, page, limit).await {
            Ok(page) => Ok(self
                .scope
                .run_if_mounted(|| {
                    self.comments
                        .lock()
                        .extend_unique(page, |comment| comment.id.as_str())
                })
                .unwrap_or(0)),
            Err(err) => {
                tracing::warn!(
                    content_id = %self.content_id,
                    error = %err,
                    "Failed to load comments"
                );
                self.notifier
                    .notify(Toast::error(err.user_message("load comments")));
                Err(err)
            }
        }
    }

    /// Loaded comments with the latest like and pin state applied.
    pub fn comments(&self) -> Vec<Comment> {
        let likes = self.likes.lock();
        let pins = self.pins.lock();
        self.comments
            .lock()
            .items()
            .iter()
            .map(|comment| {
                let mut comment = comment.clone();
                if let Some(button) = likes.get(&comment.id) {
                    let state = button.state();
                    comment.liked = state.liked;
                    comment.likes = state.likes;
                }
                if let Some(pin) = pins.get(&comment.id) {
                    comment.pinned = pin.value().pinned;
                }
                comment
            })
            .collect()
    }

    pub fn threads(&self) -> Vec<CommentNode> {
        build_threads(&self.comments())
    }

    fn find(&self, comment_id: &str) -> Option<Comment> {
        self.comments
            .lock()
            .items()
            .iter()
            .find(|c| c.id == comment_id)
            .cloned()
    }

    /// Like control for a loaded comment, created on first use.
    pub fn like_button(&self, comment_id: &str) -> Option<LikeButton> {
        let comment = self.find(comment_id)?;
        let mut likes = self.likes.lock();
        let button = likes.entry(comment.id.clone()).or_insert_with(|| {
            LikeButton::new(
                ReactionTarget::Comment(comment.id.clone()),
                comment.like_state(),
                Arc::clone(&self.api),
                self.session.clone(),
                self.scope.clone(),
                Arc::clone(&self.notifier),
            )
        });
        Some(button.clone())
    }

    pub async fn toggle_like(&self, comment_id: &str) -> ActionResult<LikeState> {
        match self.like_button(comment_id) {
            Some(button) => button.toggle_like().await,
            None => ActionResult::Unavailable,
        }
    }

    fn pin_control(&self, comment: &Comment) -> Optimistic<PinState> {
        self.pins
            .lock()
            .entry(comment.id.clone())
            .or_insert_with(|| {
                Optimistic::new(
                    PinState {
                        pinned: comment.pinned,
                    },
                    self.scope.clone(),
                    Arc::clone(&self.notifier),
                )
            })
            .clone()
    }

    /// Pin or unpin a comment. Only the content owner may do this; at most
    /// one comment stays pinned.
    pub async fn toggle_pin(&self, comment_id: &str) -> ActionResult<PinState> {
        let user = match self.session.require_user() {
            Ok(user) => user,
            Err(_) => return ActionResult::SignInRequired,
        };
        if self.owner_id.as_deref() != Some(user.id.as_str()) {
            return ActionResult::NotPermitted;
        }
        let Some(comment) = self.find(comment_id) else {
            return ActionResult::Unavailable;
        };

        let control = self.pin_control(&comment);
        let action = if control.value().pinned {
            "unpin comment"
        } else {
            "pin comment"
        };
        let api = Arc::clone(&self.api);
        let id = comment.id.clone();
        let outcome = control
            .mutate(
                action,
                |state| PinState {
                    pinned: !state.pinned,
                },
                move |next| async move { api.set_pinned(&id, next.pinned).await },
            )
            .await;

        if let MutationOutcome::Committed(state) = &outcome {
            self.scope
                .run_if_mounted(|| self.settle_pin(&comment.id, state.pinned));
        }
        ActionResult::Done(outcome)
    }

    fn settle_pin(&self, comment_id: &str, pinned: bool) {
        if pinned {
            for (id, control) in self.pins.lock().iter() {
                if id != comment_id && control.value().pinned {
                    control.sync(PinState { pinned: false });
                }
            }
        }
        for comment in self.comments.lock().items_mut().iter_mut() {
            if comment.id == comment_id {
                comment.pinned = pinned;
            } else if pinned {
                comment.pinned = false;
            }
        }
    }

    /// Post a new comment or reply.
    ///
    /// Failures are toasted and also returned so the caller can reset its
    /// own submitting state.
    pub async fn submit(&self, body: &str, parent_id: Option<&str>) -> Result<Comment, SyncError> {
        self.session.require_user()?;
        let body = body.trim();
        if body.is_empty() {
            return Err(SyncError::Validation("Comment cannot be empty".to_string()));
        }

        match self.api.post_comment(&self.content_id, body, parent_id).await {
            Ok(comment) => {
                tracing::info!(
                    content_id = %self.content_id,
                    comment_id = %comment.id,
                    "Comment posted"
                );
                self.scope
                    .run_if_mounted(|| self.comments.lock().prepend(comment.clone()));
                Ok(comment)
            }
            Err(err) => {
                tracing::warn!(
                    content_id = %self.content_id,
                    error = %err,
                    "Failed to post comment"
                );
                self.notifier
                    .notify(Toast::error(err.user_message("post comment")));
                Err(err)
            }
        }
    }
}
