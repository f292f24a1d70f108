//! Normalization boundary between raw wire JSON and canonical view types.
//!
//! Endpoints disagree on field names for the same concept (`likes`,
//! `likeCount`, `like_count`). Each canonical type below knows every
//! spelling it accepts, so code past this module sees one shape only.

use serde::Serialize;
use serde_json::Value;

use crate::api::pagination::Page;
use crate::error::SyncError;

/// Conversion from a raw JSON payload to a canonical type.
pub trait FromWire: Sized {
    fn from_wire(raw: &Value) -> Result<Self, SyncError>;
}

fn field<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| !value.is_null())
}

fn u64_field(raw: &Value, keys: &[&str]) -> Option<u64> {
    field(raw, keys).and_then(|value| match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn bool_field(raw: &Value, keys: &[&str]) -> Option<bool> {
    field(raw, keys).and_then(|value| match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_u64().map(|n| n != 0),
        _ => None,
    })
}

fn string_field(raw: &Value, keys: &[&str]) -> Option<String> {
    field(raw, keys).and_then(|value| match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn require<T>(value: Option<T>, what: &str, key: &str) -> Result<T, SyncError> {
    value.ok_or_else(|| SyncError::Decode(format!("{} is missing '{}'", what, key)))
}

/// Unwraps payloads nested one level under a named key
/// (`{ "comment": {...} }` vs `{...}`).
fn unwrap_named<'a>(raw: &'a Value, keys: &[&str]) -> &'a Value {
    field(raw, keys).filter(|v| v.is_object()).unwrap_or(raw)
}

/// Reaction state of a video, comment or community post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LikeState {
    pub liked: bool,
    pub likes: u64,
    pub disliked: bool,
    pub dislikes: u64,
}

impl LikeState {
    pub fn new(liked: bool, likes: u64) -> Self {
        Self {
            liked,
            likes,
            ..Self::default()
        }
    }
}

impl FromWire for LikeState {
    fn from_wire(raw: &Value) -> Result<Self, SyncError> {
        let liked = bool_field(raw, &["liked", "isLiked", "is_liked", "hasLiked"]);
        let likes = u64_field(raw, &["likes", "likeCount", "like_count", "likesCount"]);
        if liked.is_none() && likes.is_none() {
            return Err(SyncError::Decode(
                "like payload has neither a flag nor a count".to_string(),
            ));
        }
        Ok(Self {
            liked: liked.unwrap_or(false),
            likes: likes.unwrap_or(0),
            disliked: bool_field(raw, &["disliked", "isDisliked", "is_disliked"]).unwrap_or(false),
            dislikes: u64_field(raw, &["dislikes", "dislikeCount", "dislike_count"]).unwrap_or(0),
        })
    }
}

/// Follow relationship to a creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FollowState {
    pub following: bool,
    pub followers: u64,
}

impl FromWire for FollowState {
    fn from_wire(raw: &Value) -> Result<Self, SyncError> {
        let following = bool_field(raw, &["following", "isFollowing", "is_following", "followed"]);
        let followers = u64_field(
            raw,
            &["followers", "followerCount", "follower_count", "followersCount"],
        );
        Ok(Self {
            following: require(following, "follow payload", "following")?,
            followers: followers.unwrap_or(0),
        })
    }
}

/// Whether a comment is pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PinState {
    pub pinned: bool,
}

impl FromWire for PinState {
    fn from_wire(raw: &Value) -> Result<Self, SyncError> {
        let raw = unwrap_named(raw, &["comment"]);
        let pinned = bool_field(raw, &["pinned", "isPinned", "is_pinned"]);
        Ok(Self {
            pinned: require(pinned, "pin payload", "pinned")?,
        })
    }
}

/// Stock counters of a flash sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StockState {
    pub stock: u64,
    pub sold: u64,
}

impl StockState {
    pub fn remaining(&self) -> u64 {
        self.stock.saturating_sub(self.sold)
    }

    pub fn is_sold_out(&self) -> bool {
        self.remaining() == 0
    }

    pub fn label(&self) -> String {
        if self.is_sold_out() {
            "Sold out".to_string()
        } else {
            format!("{} left", self.remaining())
        }
    }
}

fn stock_from(raw: &Value, what: &str) -> Result<StockState, SyncError> {
    let stock = u64_field(raw, &["stock", "totalStock", "total_stock", "quantity"]);
    let sold = u64_field(raw, &["sold", "soldCount", "sold_count"]);
    let remaining = u64_field(raw, &["remaining", "remainingStock", "remaining_stock"]);
    let stock = require(stock, what, "stock")?;
    let sold = match (sold, remaining) {
        (Some(sold), _) => sold,
        (None, Some(remaining)) => stock.saturating_sub(remaining),
        (None, None) => 0,
    };
    Ok(StockState { stock, sold })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlashSale {
    pub id: String,
    pub title: String,
    pub price_cents: Option<u64>,
    pub stock: StockState,
    pub ends_at: Option<String>,
}

impl FromWire for FlashSale {
    fn from_wire(raw: &Value) -> Result<Self, SyncError> {
        Ok(Self {
            id: require(string_field(raw, &["id", "_id", "saleId"]), "flash sale", "id")?,
            title: string_field(raw, &["title", "name", "productName"]).unwrap_or_default(),
            price_cents: u64_field(raw, &["priceCents", "price_cents", "salePriceCents"]),
            stock: stock_from(raw, "flash sale")?,
            ends_at: string_field(raw, &["endsAt", "ends_at", "endTime", "end_time"]),
        })
    }
}

/// Result of a flash-sale purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub sale_id: Option<String>,
    pub stock: StockState,
}

impl FromWire for PurchaseReceipt {
    fn from_wire(raw: &Value) -> Result<Self, SyncError> {
        let sale = unwrap_named(raw, &["sale", "flashSale"]);
        Ok(Self {
            sale_id: string_field(sale, &["id", "saleId", "sale_id"]),
            stock: stock_from(sale, "purchase receipt")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveStream {
    pub id: String,
    pub title: String,
    pub creator: String,
    pub viewer_count: u64,
    pub is_live: bool,
}

impl FromWire for LiveStream {
    fn from_wire(raw: &Value) -> Result<Self, SyncError> {
        let creator = field(raw, &["creator", "user", "channel"])
            .and_then(|c| match c {
                Value::Object(_) => {
                    string_field(c, &["displayName", "display_name", "name", "username"])
                }
                Value::String(s) => Some(s.clone()),
                _ => None,
            })
            .or_else(|| string_field(raw, &["creatorName", "creator_name"]))
            .unwrap_or_default();
        Ok(Self {
            id: require(string_field(raw, &["id", "_id", "streamId"]), "live stream", "id")?,
            title: string_field(raw, &["title", "name"]).unwrap_or_default(),
            creator,
            viewer_count: u64_field(raw, &["viewerCount", "viewer_count", "viewers", "currentViewers"])
                .unwrap_or(0),
            is_live: bool_field(raw, &["isLive", "is_live", "live"]).unwrap_or(true),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: String,
    pub parent_id: Option<String>,
    pub author_id: String,
    pub author: String,
    pub body: String,
    pub likes: u64,
    pub liked: bool,
    pub pinned: bool,
    pub created_at: Option<String>,
}

impl Comment {
    pub fn like_state(&self) -> LikeState {
        LikeState::new(self.liked, self.likes)
    }
}

impl FromWire for Comment {
    fn from_wire(raw: &Value) -> Result<Self, SyncError> {
        let raw = unwrap_named(raw, &["comment"]);
        let author = field(raw, &["author", "user"]);
        let (author_id, author_name) = match author {
            Some(a) if a.is_object() => (
                string_field(a, &["id", "_id"]),
                string_field(a, &["displayName", "display_name", "name", "username"]),
            ),
            Some(Value::String(s)) => (None, Some(s.clone())),
            _ => (None, None),
        };
        Ok(Self {
            id: require(string_field(raw, &["id", "_id", "commentId"]), "comment", "id")?,
            parent_id: string_field(raw, &["parentId", "parent_id", "replyTo"]),
            author_id: author_id
                .or_else(|| string_field(raw, &["authorId", "author_id", "userId"]))
                .unwrap_or_default(),
            author: author_name.unwrap_or_default(),
            body: string_field(raw, &["body", "content", "text"]).unwrap_or_default(),
            likes: u64_field(raw, &["likes", "likeCount", "like_count", "likesCount"]).unwrap_or(0),
            liked: bool_field(raw, &["liked", "isLiked", "is_liked"]).unwrap_or(false),
            pinned: bool_field(raw, &["pinned", "isPinned", "is_pinned"]).unwrap_or(false),
            created_at: string_field(raw, &["createdAt", "created_at"]),
        })
    }
}

/// Decode a list payload: either a bare array or an object holding the
/// array under one of `keys`.
pub fn list_from_wire<T: FromWire>(raw: &Value, keys: &[&str]) -> Result<Vec<T>, SyncError> {
    let array = match raw {
        Value::Array(items) => items,
        _ => match field(raw, keys) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(SyncError::Decode(format!(
                    "expected a list under one of {:?}",
                    keys
                )))
            }
        },
    };
    array.iter().map(T::from_wire).collect()
}

/// Decode a paginated list payload.
///
/// Pagination metadata may sit next to the items or under `pagination`.
pub fn page_from_wire<T: FromWire>(raw: &Value, keys: &[&str]) -> Result<Page<T>, SyncError> {
    let items: Vec<T> = list_from_wire(raw, keys)?;
    let meta = field(raw, &["pagination", "meta"]).unwrap_or(raw);
    let page = u64_field(meta, &["page", "currentPage"]).unwrap_or(1) as u32;
    let limit = u64_field(meta, &["limit", "pageSize", "perPage"]).unwrap_or(items.len() as u64) as u32;
    let total = u64_field(meta, &["total", "totalCount", "total_count"]).unwrap_or(items.len() as u64);
    let total_pages = u64_field(meta, &["totalPages", "total_pages", "pages"])
        .map(|p| p as u32)
        .unwrap_or_else(|| {
            if limit == 0 {
                page
            } else {
                total.div_ceil(limit as u64) as u32
            }
        });
    Ok(Page {
        items,
        page,
        limit,
        total,
        total_pages,
    })
}
