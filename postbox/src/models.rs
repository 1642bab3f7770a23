use serde::{Deserialize, Deserializer, Serialize};

/// A stored post. Field names are capitalized on disk and on the wire.
///
/// Missing and `null` fields read back as empty values, so one sparse record
/// never makes the whole collection unreadable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Post {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(deserialize_with = "null_as_default")]
    pub view_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub last_viewed: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Post {
    pub fn from_new(new_post: NewPost, today: &str) -> Self {
        Post {
            title: new_post.title,
            content: new_post.content,
            created_at: today.to_string(),
            author: new_post.author,
            view_count: 0,
            last_viewed: today.to_string(),
        }
    }

    /// The counter sticks at `u64::MAX` rather than wrapping.
    pub fn record_view(&mut self, today: &str) {
        self.view_count = self.view_count.saturating_add(1);
        self.last_viewed = today.to_string();
    }
}

/// Caller-supplied fields of a post being created.
///
/// Server-owned fields (`CreatedAt`, `ViewCount`, `LastViewed`) and anything
/// unknown are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewPost {
    #[serde(alias = "Title", deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(alias = "Content", deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(alias = "Author", deserialize_with = "null_as_default")]
    pub author: String,
}
