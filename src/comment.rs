use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

/// A comment ID.
#[allow(clippy::module_name_repetitions)]
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct CommentId(pub u64);

/// One comment from the moderation queue.
///
/// The `edit` context returns far more fields than this; only the ones the
/// sweeper acts on are deserialized, and the rest are ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct Comment {
    /// Unique identifier for the comment.
    pub id: CommentId,
    /// Display name of the comment author.
    #[serde(default = "unknown_author")]
    pub author_name: String,
}

fn unknown_author() -> String {
    "Unknown".into()
}

#[cfg(test)]
mod tests {
    use super::Comment;
    use serde_json::json;

    #[test]
    fn test_deserialize_comment() {
        let comment: Comment = serde_json::from_value(json!({
            "id": 42,
            "author_name": "Ava",
            "status": "hold",
            "content": { "raw": "nice post" },
        }))
        .unwrap();
        assert_eq!(comment.id.0, 42);
        assert_eq!(comment.author_name, "Ava");
    }

    #[test]
    fn test_missing_author_name_defaults_to_unknown() {
        let comment: Comment = serde_json::from_value(json!({ "id": 7 })).unwrap();
        assert_eq!(comment.author_name, "Unknown");
    }
}
