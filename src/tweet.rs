use chrono::DateTime;
use serde::{Deserialize, Serialize};

pub type TweetId = String;

/// Number of grid units in a full card row.
pub const GRID_COLUMNS: u16 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub username: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// A post as delivered by the feed. `liked` and `retweeted` are relative to
/// the current viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: TweetId,
    pub text: String,
    pub date: String,
    pub owner: Owner,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub retweeted: bool,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub retweets_count: u64,
    /// When present this is authoritative over `comments_count`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Tweet>>,
    #[serde(default)]
    pub comments_count: u64,
}

impl Tweet {
    pub fn comment_count(&self) -> u64 {
        match &self.comments {
            Some(comments) => comments.len() as u64,
            None => self.comments_count,
        }
    }

    pub fn is_owned_by(&self, user: &UserState) -> bool {
        self.owner.username == user.username
    }

    /// Overwrite the engagement fields from `action` when it targets this
    /// tweet. Returns whether anything was applied.
    pub fn reconcile(&mut self, action: Option<&ActionResult>) -> bool {
        match action {
            Some(result) if result.id == self.id => {
                self.liked = result.liked;
                self.retweeted = result.retweeted;
                self.likes_count = result.likes_count;
                self.retweets_count = result.retweets_count;
                true
            }
            _ => false,
        }
    }

    pub fn action_result(&self) -> ActionResult {
        ActionResult {
            id: self.id.clone(),
            liked: self.liked,
            retweeted: self.retweeted,
            likes_count: self.likes_count,
            retweets_count: self.retweets_count,
        }
    }
}

/// Outcome of the most recent like/retweet mutation, broadcast to every view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub id: TweetId,
    pub liked: bool,
    pub retweeted: bool,
    pub likes_count: u64,
    pub retweets_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    pub username: String,
}

impl UserState {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    #[default]
    Normal,
    Detail,
    /// Laid out exactly like `Normal`.
    Reply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameWidth {
    /// Span this many of the `GRID_COLUMNS` units.
    Span(u16),
    Auto,
}

/// Layout parameters a card derives from its display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLayout {
    pub name_width: NameWidth,
    pub top_date: bool,
    pub detail_footer: bool,
    pub navigable: bool,
}

impl DisplayMode {
    pub fn layout(self) -> CardLayout {
        match self {
            DisplayMode::Detail => CardLayout {
                name_width: NameWidth::Span(GRID_COLUMNS),
                top_date: false,
                detail_footer: true,
                navigable: false,
            },
            DisplayMode::Normal | DisplayMode::Reply => CardLayout {
                name_width: NameWidth::Auto,
                top_date: true,
                detail_footer: false,
                navigable: true,
            },
        }
    }
}

/// `Jun 15`, or the raw string when it is not RFC 3339.
pub fn format_short_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => date.format("%b %-d").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// `2:30 PM · Jun 15, 2023`, or the raw string when it is not RFC 3339.
pub fn format_long_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => date.format("%-I:%M %p · %b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_tweet(id: &str, owner: &str) -> Tweet {
        Tweet {
            id: id.to_string(),
            text: format!("Tweet number {}", id),
            date: "2023-06-15T14:30:00Z".to_string(),
            owner: Owner {
                username: owner.to_string(),
                name: format!("{} name", owner),
                profile_picture: None,
            },
            liked: false,
            retweeted: false,
            likes_count: 3,
            retweets_count: 1,
            comments: None,
            comments_count: 0,
        }
    }

    fn make_result(id: &str) -> ActionResult {
        ActionResult {
            id: id.to_string(),
            liked: true,
            retweeted: true,
            likes_count: 10,
            retweets_count: 7,
        }
    }

    #[test]
    fn test_comment_count_prefers_sequence() {
        let mut tweet = make_tweet("1", "alice");
        tweet.comments_count = 9;
        tweet.comments = Some(vec![make_tweet("2", "bob"), make_tweet("3", "carol")]);
        assert_eq!(tweet.comment_count(), 2);

        tweet.comments = Some(Vec::new());
        assert_eq!(tweet.comment_count(), 0);
    }

    #[test]
    fn test_comment_count_falls_back_to_counter() {
        let mut tweet = make_tweet("1", "alice");
        assert_eq!(tweet.comment_count(), 0);
        tweet.comments_count = 4;
        assert_eq!(tweet.comment_count(), 4);
    }

    #[test]
    fn test_reconcile_matching_result() {
        let mut tweet = make_tweet("1", "alice");
        assert!(tweet.reconcile(Some(&make_result("1"))));
        assert!(tweet.liked);
        assert!(tweet.retweeted);
        assert_eq!(tweet.likes_count, 10);
        assert_eq!(tweet.retweets_count, 7);
    }

    #[test]
    fn test_reconcile_skips_other_tweet_and_absent_result() {
        let original = make_tweet("1", "alice");
        let mut tweet = original.clone();
        assert!(!tweet.reconcile(Some(&make_result("2"))));
        assert!(!tweet.reconcile(None));
        assert_eq!(tweet, original);
    }

    #[test]
    fn test_ownership() {
        let tweet = make_tweet("1", "alice");
        assert!(tweet.is_owned_by(&UserState::new("alice")));
        assert!(!tweet.is_owned_by(&UserState::new("bob")));
    }

    #[test]
    fn test_layout_per_mode() {
        let detail = DisplayMode::Detail.layout();
        assert_eq!(detail.name_width, NameWidth::Span(12));
        assert!(!detail.top_date);
        assert!(detail.detail_footer);
        assert!(!detail.navigable);

        for mode in [DisplayMode::Normal, DisplayMode::Reply] {
            let layout = mode.layout();
            assert_eq!(layout.name_width, NameWidth::Auto);
            assert!(layout.top_date);
            assert!(!layout.detail_footer);
            assert!(layout.navigable);
        }
    }

    #[test]
    fn test_format_dates() {
        assert_eq!(format_short_date("2023-06-15T14:30:00Z"), "Jun 15");
        assert_eq!(
            format_long_date("2023-06-15T14:30:00Z"),
            "2:30 PM · Jun 15, 2023"
        );
        assert_eq!(format_short_date("yesterday"), "yesterday");
        assert_eq!(format_long_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_deserialize_with_counter_only() {
        let json = r#"{
            "id": "42",
            "text": "hello",
            "date": "2023-06-15T14:30:00Z",
            "owner": {"username": "alice", "name": "Alice"},
            "likes_count": 2,
            "comments_count": 5
        }"#;
        let tweet: Tweet = serde_json::from_str(json).unwrap();
        assert!(tweet.comments.is_none());
        assert_eq!(tweet.comment_count(), 5);
        assert!(!tweet.liked);
        assert_eq!(tweet.owner.profile_picture, None);
    }
}
