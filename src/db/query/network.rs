//! Neighborhood and friend-list queries.

use serde::Serialize;

use crate::db::core::SocialGraph;
use crate::error::{GraphError, Result};
use crate::model::Timestamp;

/// A user's direct neighborhood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserNetwork {
    /// The user.
    pub name: String,
    /// First-registration timestamp.
    pub created_at: Timestamp,
    /// Direct friends, by name.
    pub friends: Vec<String>,
    /// Users this user referred.
    pub referred: Vec<String>,
    /// One referrer, if any. With several referrers any one may be
    /// returned; callers must not rely on which.
    pub referred_by: Option<String>,
}

/// One friend row in a paginated listing, carrying the friend edge's own
/// creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FriendEntry {
    /// Friend name.
    pub name: String,
    /// When the friendship edge was created.
    pub created_at: Timestamp,
}

/// One page of a friend listing, with its envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FriendPage {
    /// The page slice, ascending by name.
    pub data: Vec<FriendEntry>,
    /// Total friends across all pages.
    pub total: usize,
    /// The requested 1-indexed page.
    pub page: usize,
    /// The requested page size.
    pub page_size: usize,
    /// Total pages at this page size.
    pub total_pages: usize,
}

impl SocialGraph {
    /// The user's direct friends, referrals made, and (at most one) referrer.
    ///
    /// # Errors
    /// [`GraphError::NotFound`] if the user does not exist.
    pub fn find_user_network(&self, name: &str) -> Result<UserNetwork> {
        self.metrics.record_query();
        let inner = self.inner.read();
        let record = inner
            .get(name)
            .ok_or_else(|| GraphError::NotFound(name.to_string()))?;
        Ok(UserNetwork {
            name: name.to_string(),
            created_at: record.created_at,
            friends: record.friends_out.keys().cloned().collect(),
            referred: record.referrals_out.keys().cloned().collect(),
            referred_by: record.referrals_in.keys().next().cloned(),
        })
    }

    /// Count of the user's outgoing friend edges; 0 for an unknown user.
    pub fn count_total_friends(&self, name: &str) -> usize {
        self.metrics.record_query();
        self.inner
            .read()
            .get(name)
            .map_or(0, |record| record.friends_out.len())
    }

    /// One page of the user's friends, ascending by name, 1-indexed.
    /// A page past the end (or an unknown user) yields an empty slice.
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] if `page` or `page_size` is zero.
    pub fn fetch_friends_paginated(
        &self,
        name: &str,
        page: usize,
        page_size: usize,
    ) -> Result<FriendPage> {
        if page == 0 || page_size == 0 {
            return Err(GraphError::InvalidArgument(
                "page and page_size must be positive".to_string(),
            ));
        }
        self.metrics.record_query();
        let inner = self.inner.read();
        let (total, data) = match inner.get(name) {
            Some(record) => (
                record.friends_out.len(),
                record
                    .friends_out
                    .iter()
                    .skip((page - 1) * page_size)
                    .take(page_size)
                    .map(|(friend, created_at)| FriendEntry {
                        name: friend.clone(),
                        created_at: *created_at,
                    })
                    .collect(),
            ),
            None => (0, Vec::new()),
        };
        Ok(FriendPage {
            data,
            total,
            page,
            page_size,
            total_pages: total.div_ceil(page_size),
        })
    }
}
