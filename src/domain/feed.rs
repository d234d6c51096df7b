use time::Duration;

/// Which upvotes count toward a feed row's `upvote_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpvoteWindow {
    AllTime,
    /// Only upvotes cast within this long before now.
    Trailing(Duration),
}

impl UpvoteWindow {
    pub fn as_seconds(&self) -> Option<i64> {
        match self {
            Self::AllTime => None,
            Self::Trailing(duration) => Some(duration.whole_seconds()),
        }
    }
}

/// A single ranking query issued against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Trending,
    FollowedCommunities,
    FollowedUsers,
    Search { keyword: String },
    Saved,
    ByAuthor { author_id: i64 },
}

impl FeedSource {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Trending => "trending",
            Self::FollowedCommunities => "followed_communities",
            Self::FollowedUsers => "followed_users",
            Self::Search { .. } => "search",
            Self::Saved => "saved",
            Self::ByAuthor { .. } => "by_author",
        }
    }
}
