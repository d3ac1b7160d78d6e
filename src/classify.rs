//! Post classification.
//!
//! Classification runs in two phases. The media reference of an embedded
//! original post is located first; the variant is selected second, from the
//! post kind tag and whether that lookup succeeded. A quote whose original
//! nominally carries media but yields no usable reference is a text quote.

use crate::post::{non_empty, MediaKind, OriginalPost, Post, PostKind};

/// Structural category a post is rendered as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    PlainText,
    MediaGallery,
    Video,
    SimpleReshare,
    QuotedText,
    QuotedMedia,
}

impl Variant {
    pub const ALL: [Variant; 6] = [
        Variant::PlainText,
        Variant::MediaGallery,
        Variant::Video,
        Variant::SimpleReshare,
        Variant::QuotedText,
        Variant::QuotedMedia,
    ];

    /// Directory under the template root holding this variant's themes
    pub fn template_dir(self) -> &'static str {
        match self {
            Variant::PlainText => "plain",
            Variant::MediaGallery => "media",
            Variant::Video => "video",
            Variant::SimpleReshare => "reshare-simple",
            Variant::QuotedText => "reshare-quote-text",
            Variant::QuotedMedia => "reshare-quote-media",
        }
    }

    pub fn is_reshare(self) -> bool {
        matches!(
            self,
            Variant::SimpleReshare | Variant::QuotedText | Variant::QuotedMedia
        )
    }

    /// Short tag used in log lines
    pub fn label(self) -> &'static str {
        match self {
            Variant::PlainText => "",
            Variant::MediaGallery => "(media)",
            Variant::Video => "(video)",
            Variant::SimpleReshare => "(simple-repost)",
            Variant::QuotedText => "(quote)",
            Variant::QuotedMedia => "(quote+media)",
        }
    }
}

/// Outcome of classifying one post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    pub variant: Variant,
    /// The single media reference of the embedded original, if any resolved
    pub original_media: Option<&'a str>,
}

/// Pick the one media reference shown for an embedded original post.
///
/// Preference: video thumbnail, then the first image of a set, then the
/// generic media URL. Empty references are skipped.
pub fn locate_original_media(original: &OriginalPost) -> Option<&str> {
    let media = original.media.as_ref()?;
    let thumbnail = if media.kind == MediaKind::Video {
        non_empty(media.thumbnail.as_deref())
    } else {
        None
    };
    thumbnail
        .or_else(|| media.images.first().and_then(|img| non_empty(Some(img.url()))))
        .or_else(|| non_empty(media.url.as_deref()))
}

/// Classify a post, resolving the original's media before picking a variant.
pub fn classify(post: &Post) -> Classification<'_> {
    let original_media = post.reshared_post.as_ref().and_then(locate_original_media);
    Classification {
        variant: select_variant(post, original_media.is_some()),
        original_media,
    }
}

/// Variant selection given the already resolved original-media flag.
pub fn select_variant(post: &Post, original_has_media: bool) -> Variant {
    let embedded = post.reshared_post.is_some();
    match post.post_type {
        PostKind::Repost if embedded => return Variant::SimpleReshare,
        PostKind::Quote if embedded => {
            return if original_has_media {
                Variant::QuotedMedia
            } else {
                Variant::QuotedText
            };
        }
        _ => {}
    }

    let media_kind = post.media.as_ref().map(|m| m.kind);
    let is_video = post.is_video || media_kind == Some(MediaKind::Video);
    if media_kind.is_some_and(MediaKind::is_image_set) {
        Variant::MediaGallery
    } else if is_video {
        Variant::Video
    } else if non_empty(post.image_url.as_deref()).is_some() {
        Variant::MediaGallery
    } else {
        Variant::PlainText
    }
}
