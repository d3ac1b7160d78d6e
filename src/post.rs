//! Post records as delivered by the scraper.
//!
//! These types are read-only input. Field names follow the scraped JSON, so a
//! record can be deserialized straight from the dataset file.

use serde::Deserialize;

use crate::{Error, Result};

/// A scraped post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Post {
    /// Permalink of the post, echoed back in the manifest
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub post_type: PostKind,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub posted_at: Option<PostedAt>,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub media: Option<Media>,
    /// Single image or video thumbnail reference supplied outside `media`
    #[serde(default, rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(default, rename = "isVideo")]
    pub is_video: bool,
    /// The post being reshared or quoted
    #[serde(default)]
    pub reshared_post: Option<OriginalPost>,
}

/// The post embedded in a reshare or quote.
///
/// It has no `reshared_post` of its own: only one level of nesting is modeled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OriginalPost {
    #[serde(default)]
    pub author: Author,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub media: Option<Media>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl Author {
    /// First and optional last name joined and trimmed.
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name,
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    pub fn bio(&self) -> &str {
        self.headline.as_deref().unwrap_or_default()
    }

    pub fn avatar_ref(&self) -> Option<&str> {
        non_empty(self.profile_picture.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostedAt {
    /// Names the card files, so it has to be a plain file name stem
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    /// Raw relative time such as `"2d • Edited"`
    #[serde(default)]
    pub relative: String,
}

/// Post timestamp. The scraper emits epoch milliseconds, but string ids are
/// accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timestamp::Number(n) => write!(f, "{}", n),
            Timestamp::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub total_reactions: u64,
    #[serde(default)]
    pub comments: u64,
}

/// The `post_type` tag. Unrecognized tags are kept as `Other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    #[default]
    Regular,
    Quote,
    Repost,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Media {
    #[serde(default, rename = "type")]
    pub kind: MediaKind,
    #[serde(default)]
    pub images: Vec<MediaRef>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Images,
    Video,
    #[default]
    #[serde(other)]
    Other,
}

impl MediaKind {
    pub fn is_image_set(self) -> bool {
        matches!(self, MediaKind::Image | MediaKind::Images)
    }
}

/// An image entry: either a bare URL or an object with a `url` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MediaRef {
    Url(String),
    Object { url: String },
}

impl MediaRef {
    pub fn url(&self) -> &str {
        match self {
            MediaRef::Url(url) => url,
            MediaRef::Object { url } => url,
        }
    }
}

impl Post {
    /// Parse one record or an array of records.
    ///
    /// Only input that is not a JSON object or array fails as a whole. Each
    /// record is converted on its own, so a malformed record becomes an
    /// `InvalidPost` entry next to the records that did parse.
    pub fn parse_many(json: &str) -> Result<Vec<Result<Post>>> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| Error::InvalidPost(format!("Failed to parse post records: {}", e)))?;
        match value {
            serde_json::Value::Array(records) => Ok(records
                .into_iter()
                .enumerate()
                .map(|(i, record)| Post::from_value(i, record))
                .collect()),
            record @ serde_json::Value::Object(_) => Ok(vec![Post::from_value(0, record)]),
            other => Err(Error::InvalidPost(format!(
                "expected a post object or an array of posts, found {}",
                other
            ))),
        }
    }

    /// Parse a single record.
    pub fn parse(json: &str) -> Result<Post> {
        serde_json::from_str(json)
            .map_err(|e| Error::InvalidPost(format!("Failed to parse post record: {}", e)))
    }

    fn from_value(index: usize, record: serde_json::Value) -> Result<Post> {
        serde_json::from_value(record)
            .map_err(|e| Error::InvalidPost(format!("record #{}: {}", index + 1, e)))
    }

    /// The author, or an error naming the malformed record.
    pub fn require_author(&self) -> Result<&Author> {
        self.author
            .as_ref()
            .ok_or_else(|| Error::InvalidPost(format!("post {} has no author", self.label())))
    }

    /// The timestamp the card files are named after.
    ///
    /// Fails when it is missing or is not usable as a file name inside the
    /// output directory.
    pub fn require_timestamp(&self) -> Result<String> {
        let timestamp = self
            .posted_at
            .as_ref()
            .and_then(|p| p.timestamp.as_ref())
            .ok_or_else(|| Error::InvalidPost(format!("post {} has no timestamp", self.label())))?
            .to_string();
        check_file_stem(&timestamp)
            .map_err(|reason| Error::InvalidPost(format!("post {}: {}", self.label(), reason)))?;
        Ok(timestamp)
    }

    /// Raw relative time, empty when absent.
    pub fn relative_time(&self) -> &str {
        self.posted_at
            .as_ref()
            .map(|p| p.relative.as_str())
            .unwrap_or_default()
    }

    fn label(&self) -> &str {
        self.url.as_deref().unwrap_or("<no url>")
    }
}

/// Reject stems that are empty or could leave the directory they are joined to.
pub(crate) fn check_file_stem(stem: &str) -> std::result::Result<(), String> {
    if stem.trim().is_empty() {
        return Err("timestamp is empty".to_string());
    }
    if stem.contains("..") || stem.contains(['/', '\\']) {
        return Err(format!("timestamp '{}' is not a plain file name", stem));
    }
    Ok(())
}

/// Treat empty strings as missing references.
pub(crate) fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
