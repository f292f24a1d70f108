//! Typed endpoint adapters. Each one returns canonical types only.

use reqwest::Method;
use serde_json::{json, Value};

use crate::api::client::{ApiClient, Deadline};
use crate::api::normalize::{
    list_from_wire, page_from_wire, Comment, FlashSale, FollowState, FromWire, LikeState,
    LiveStream, PinState, PurchaseReceipt,
};
use crate::api::pagination::Page;
use crate::error::SyncError;

/// Something that can be liked or disliked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReactionTarget {
    Content(String),
    Comment(String),
    Post(String),
}

impl ReactionTarget {
    /// Collection segment and id, e.g. `["comments", id]`.
    fn segments(&self) -> [&str; 2] {
        match self {
            ReactionTarget::Content(id) => ["content", id.as_str()],
            ReactionTarget::Comment(id) => ["comments", id.as_str()],
            ReactionTarget::Post(id) => ["posts", id.as_str()],
        }
    }

    /// Noun used in user-facing messages.
    pub fn noun(&self) -> &'static str {
        match self {
            ReactionTarget::Content(_) => "video",
            ReactionTarget::Comment(_) => "comment",
            ReactionTarget::Post(_) => "post",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Like,
    Dislike,
}

impl Reaction {
    fn segment(self) -> &'static str {
        match self {
            Reaction::Like => "like",
            Reaction::Dislike => "dislike",
        }
    }
}

fn decode_opt<T: FromWire>(data: Option<Value>) -> Result<Option<T>, SyncError> {
    data.as_ref().map(T::from_wire).transpose()
}

fn toggle_method(on: bool) -> Method {
    if on {
        Method::POST
    } else {
        Method::DELETE
    }
}

impl ApiClient {
    /// Set or clear a reaction. Returns the server's counters when sent.
    pub async fn react(
        &self,
        target: &ReactionTarget,
        reaction: Reaction,
        active: bool,
    ) -> Result<Option<LikeState>, SyncError> {
        let [collection, id] = target.segments();
        let url = self.endpoint(&[collection, id, reaction.segment()], &[]);
        let action = format!(
            "{}{} {}",
            if active { "" } else { "un" },
            reaction.segment(),
            target.noun()
        );
        let data = self
            .call(toggle_method(active), url, None, &action, Deadline::None)
            .await?;
        decode_opt(data)
    }

    pub async fn set_following(
        &self,
        creator_id: &str,
        follow: bool,
    ) -> Result<Option<FollowState>, SyncError> {
        let url = self.endpoint(&["creators", creator_id, "follow"], &[]);
        let action = if follow { "follow creator" } else { "unfollow creator" };
        let data = self
            .call(toggle_method(follow), url, None, action, Deadline::None)
            .await?;
        decode_opt(data)
    }

    pub async fn set_pinned(
        &self,
        comment_id: &str,
        pinned: bool,
    ) -> Result<Option<PinState>, SyncError> {
        let url = self.endpoint(&["comments", comment_id, "pin"], &[]);
        let action = if pinned { "pin comment" } else { "unpin comment" };
        let data = self
            .call(toggle_method(pinned), url, None, action, Deadline::None)
            .await?;
        decode_opt(data)
    }

    pub async fn purchase_flash_sale(
        &self,
        sale_id: &str,
        quantity: u64,
    ) -> Result<Option<PurchaseReceipt>, SyncError> {
        let url = self.endpoint(&["flash-sales", sale_id, "purchase"], &[]);
        let body = json!({ "quantity": quantity });
        let data = self
            .call(Method::POST, url, Some(body), "purchase item", Deadline::None)
            .await?;
        decode_opt(data)
    }

    pub async fn list_flash_sales(&self) -> Result<Vec<FlashSale>, SyncError> {
        let url = self.endpoint(&["flash-sales"], &[]);
        let data = self
            .call(Method::GET, url, None, "load flash sales", Deadline::Read)
            .await?;
        match data {
            Some(raw) => list_from_wire(&raw, &["sales", "flashSales", "items"]),
            None => Ok(Vec::new()),
        }
    }

    pub async fn list_live_streams(&self) -> Result<Vec<LiveStream>, SyncError> {
        let url = self.endpoint(&["live-streams"], &[]);
        let data = self
            .call(Method::GET, url, None, "load live streams", Deadline::Read)
            .await?;
        match data {
            Some(raw) => list_from_wire(&raw, &["streams", "liveStreams", "items"]),
            None => Ok(Vec::new()),
        }
    }

    pub async fn list_comments(
        &self,
        content_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Page<Comment>, SyncError> {
        let url = self.endpoint(
            &["content", content_id, "comments"],
            &[("page", page.to_string()), ("limit", limit.to_string())],
        );
        let data = self
            .call(Method::GET, url, None, "load comments", Deadline::Read)
            .await?;
        match data {
            Some(raw) => page_from_wire(&raw, &["comments", "items"]),
            None => Ok(Page {
                items: Vec::new(),
                page,
                limit,
                total: 0,
                total_pages: page,
            }),
        }
    }

    pub async fn post_comment(
        &self,
        content_id: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<Comment, SyncError> {
        let url = self.endpoint(&["content", content_id, "comments"], &[]);
        let payload = json!({ "body": body, "parentId": parent_id });
        let data = self
            .call(Method::POST, url, Some(payload), "post comment", Deadline::None)
            .await?;
        let raw = data
            .ok_or_else(|| SyncError::Decode("comment response has no data".to_string()))?;
        Comment::from_wire(&raw)
    }
}
