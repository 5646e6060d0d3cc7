//! Comment-forest materialization over the item API.
//!
//! Two disclosure modes share one fetch/filter primitive:
//! a full depth-bounded traversal for small threads, and a paged lazy
//! traversal that prefetches only a shallow slice of each subtree so
//! large threads render quickly and load the rest on demand.

use super::HnClient;
use crate::internal::models::Comment;
use futures::FutureExt;
use futures::future::{BoxFuture, join_all};

/// Top-level comments fetched per page in lazy mode.
pub const COMMENT_BATCH_SIZE: usize = 20;
/// Replies prefetched (and paged) per comment in lazy mode.
pub const REPLY_BATCH_SIZE: usize = 10;
/// Recursion bound for the full traversal; guards against pathological
/// reply chains and runaway request fan-out.
pub const MAX_COMMENT_DEPTH: usize = 10;

/// A fully materialized comment with all of its (non-tombstoned) replies
/// down to the traversal depth bound.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentNode {
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
}

/// A comment whose subtree is materialized incrementally.
///
/// `replies_loaded` is true once every known child id has been fetched;
/// until then `has_more_replies` reports whether a further
/// `more_replies` call would yield anything.
#[derive(Debug, Clone, PartialEq)]
pub struct LazyComment {
    pub comment: Comment,
    pub replies: Vec<LazyComment>,
    pub reply_ids: Vec<u32>,
    pub replies_loaded: bool,
    pub has_more_replies: bool,
}

impl LazyComment {
    /// Wrap a comment with no replies materialized yet.
    fn unexpanded(comment: Comment) -> Self {
        let reply_ids = comment.reply_ids();
        let has_more_replies = !reply_ids.is_empty();
        Self {
            comment,
            replies: Vec::new(),
            reply_ids,
            replies_loaded: false,
            has_more_replies,
        }
    }
}

/// One page of top-level comments plus pagination bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentBatch {
    pub comments: Vec<LazyComment>,
    pub has_more: bool,
    pub total: usize,
}

/// One page of a specific comment's children.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyPage {
    pub replies: Vec<LazyComment>,
    pub has_more: bool,
}

fn slice_page(ids: &[u32], offset: usize, limit: usize) -> &[u32] {
    let end = offset.saturating_add(limit).min(ids.len());
    if offset >= end { &[] } else { &ids[offset..end] }
}

impl HnClient {
    /// The shared fetch/filter primitive: fetch every id concurrently,
    /// drop tombstones and failed leaves, keep source order.
    async fn fetch_comment_page(&self, ids: &[u32]) -> Vec<Comment> {
        let fetched = join_all(ids.iter().map(|id| self.get_comment(*id))).await;
        fetched
            .into_iter()
            .flatten()
            .filter(|comment| !comment.is_tombstone())
            .collect()
    }

    /// Materialize a full comment forest from `ids`, recursing on each
    /// comment's kids until `max_depth`. Each tree level is fetched with a
    /// full fan-out across siblings; the traversal suspends until the
    /// whole level settles before descending.
    ///
    /// Returns an empty forest whenever `depth >= max_depth` or `ids` is
    /// empty.
    pub fn comment_tree<'a>(
        &'a self,
        ids: &'a [u32],
        depth: usize,
        max_depth: usize,
    ) -> BoxFuture<'a, Vec<CommentNode>> {
        async move {
            if depth >= max_depth || ids.is_empty() {
                return Vec::new();
            }

            let comments = self.fetch_comment_page(ids).await;

            join_all(comments.into_iter().map(|comment| async move {
                let kid_ids = comment.reply_ids();
                let replies = self.comment_tree(&kid_ids, depth + 1, max_depth).await;
                CommentNode { comment, replies }
            }))
            .await
        }
        .boxed()
    }

    /// Fetch one page of top-level comments, eagerly pulling in only the
    /// first `REPLY_BATCH_SIZE` replies of each so the initial render
    /// already shows some depth without paying for whole subtrees.
    pub async fn comment_batch(&self, ids: &[u32], offset: usize, limit: usize) -> CommentBatch {
        let total = ids.len();
        let page = slice_page(ids, offset, limit);

        if page.is_empty() {
            return CommentBatch {
                comments: Vec::new(),
                has_more: false,
                total,
            };
        }

        let comments = self.fetch_comment_page(page).await;

        let comments = join_all(comments.into_iter().map(|comment| async move {
            let reply_ids = comment.reply_ids();
            let prefetch: Vec<u32> = reply_ids.iter().take(REPLY_BATCH_SIZE).copied().collect();

            let replies: Vec<LazyComment> = if prefetch.is_empty() {
                Vec::new()
            } else {
                self.fetch_comment_page(&prefetch)
                    .await
                    .into_iter()
                    .map(LazyComment::unexpanded)
                    .collect()
            };

            LazyComment {
                replies_loaded: reply_ids.len() <= REPLY_BATCH_SIZE,
                has_more_replies: reply_ids.len() > REPLY_BATCH_SIZE,
                comment,
                replies,
                reply_ids,
            }
        }))
        .await;

        CommentBatch {
            comments,
            has_more: offset.saturating_add(limit) < total,
            total,
        }
    }

    /// Fetch the next page of a specific comment's children, independent
    /// of the batch that produced the parent. Triggered by thread
    /// expansion in the consuming view.
    pub async fn more_replies(&self, reply_ids: &[u32], offset: usize, limit: usize) -> ReplyPage {
        let page = slice_page(reply_ids, offset, limit);

        if page.is_empty() {
            return ReplyPage {
                replies: Vec::new(),
                has_more: false,
            };
        }

        let replies = self
            .fetch_comment_page(page)
            .await
            .into_iter()
            .map(LazyComment::unexpanded)
            .collect();

        ReplyPage {
            replies,
            has_more: offset.saturating_add(limit) < reply_ids.len(),
        }
    }

    /// Hydrate a single comment for lazy loading; tombstones resolve to
    /// `None` like everywhere else.
    pub async fn lazy_comment(&self, id: u32) -> Option<LazyComment> {
        let comment = self.get_comment(id).await?;
        if comment.is_tombstone() {
            return None;
        }
        Some(LazyComment::unexpanded(comment))
    }
}
