//! Resolves every display value of a post before any template is touched.
//!
//! All image fetches of one post are issued together and awaited as a group;
//! the resulting [`RenderContext`] is then shared by both theme passes.

use futures::future::try_join_all;

use crate::classify::{classify, Variant};
use crate::error::FetchRole;
use crate::post::{non_empty, OriginalPost, Post};
use crate::rendering::avatar::placeholder_avatar;
use crate::rendering::template::{Field, FieldValues};
use crate::services::{EmbeddedImage, ImageFetcher, TimeTranslator};
use crate::{Error, RenderOptions, Result};

/// Separator between the relative time and trailing decorations such as
/// "Edited" or a visibility marker
pub const RELATIVE_TIME_SEPARATOR: char = '•';

/// Media shown in the gallery region of a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryMedia {
    None,
    Video(EmbeddedImage),
    Images(Vec<EmbeddedImage>),
}

/// Resolved values of an embedded original post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalContext {
    pub name: String,
    pub bio: String,
    pub avatar: EmbeddedImage,
    pub text: String,
    pub media: Option<EmbeddedImage>,
}

/// Everything needed to render one post in any theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub variant: Variant,
    pub timestamp: String,
    pub url: Option<String>,
    pub name: String,
    pub bio: String,
    pub avatar: EmbeddedImage,
    pub text: String,
    pub time: String,
    pub reactions: u64,
    pub comments: String,
    pub gallery: GalleryMedia,
    pub original: Option<OriginalContext>,
}

impl RenderContext {
    pub fn field_values(&self) -> FieldValues {
        let mut values = FieldValues::new();
        values.insert(Field::Name, self.name.clone());
        values.insert(Field::Bio, self.bio.clone());
        values.insert(Field::ProfilePicture, self.avatar.as_str().to_string());
        values.insert(Field::Text, self.text.clone());
        values.insert(Field::Time, self.time.clone());
        values.insert(Field::Reactions, self.reactions.to_string());
        values.insert(Field::Comments, self.comments.clone());

        if let Some(original) = &self.original {
            values.insert(Field::OriginalName, original.name.clone());
            values.insert(Field::OriginalBio, original.bio.clone());
            values.insert(
                Field::OriginalProfilePicture,
                original.avatar.as_str().to_string(),
            );
            values.insert(Field::OriginalText, original.text.clone());
            if let Some(media) = &original.media {
                values.insert(Field::OriginalMedia, media.as_str().to_string());
            }
        }
        values
    }
}

/// Strip trailing `• ...` decorations from a raw relative time.
pub fn relative_time_core(raw: &str) -> &str {
    raw.split(RELATIVE_TIME_SEPARATOR)
        .next()
        .unwrap_or_default()
        .trim()
}

/// Media references of the post itself, in source order, capped.
///
/// Only gallery and video posts show their own media; reshare variants show
/// the original's.
pub fn primary_media_refs(post: &Post, variant: Variant, cap: usize) -> Vec<&str> {
    let media = post.media.as_ref();
    let image_url = non_empty(post.image_url.as_deref());
    let refs: Vec<&str> = match variant {
        Variant::Video => image_url
            .or_else(|| media.and_then(|m| non_empty(m.thumbnail.as_deref())))
            .into_iter()
            .collect(),
        Variant::MediaGallery => {
            let listed: Vec<&str> = media
                .map(|m| {
                    m.images
                        .iter()
                        .filter_map(|img| non_empty(Some(img.url())))
                        .collect()
                })
                .unwrap_or_default();
            if listed.is_empty() {
                image_url.into_iter().collect()
            } else {
                listed
            }
        }
        _ => Vec::new(),
    };
    refs.into_iter().take(cap).collect()
}

/// Builds [`RenderContext`]s from post records.
pub struct Assembler<'a> {
    fetcher: &'a dyn ImageFetcher,
    translator: &'a dyn TimeTranslator,
    options: &'a RenderOptions,
}

impl<'a> Assembler<'a> {
    pub fn new(
        fetcher: &'a dyn ImageFetcher,
        translator: &'a dyn TimeTranslator,
        options: &'a RenderOptions,
    ) -> Self {
        Self {
            fetcher,
            translator,
            options,
        }
    }

    pub async fn assemble(&self, post: &Post) -> Result<RenderContext> {
        let author = post.require_author()?;
        let timestamp = post.require_timestamp()?;
        let classification = classify(post);
        let variant = classification.variant;

        let name = author.display_name();
        let language = self.options.language.as_str();
        let translations = &self.options.translations;
        let time = self.translator.translate(
            relative_time_core(post.relative_time()),
            language,
            translations,
        );
        let comments = translations.comment_count(language, post.stats.comments);

        let media_refs = primary_media_refs(post, variant, self.options.max_gallery_images);
        let original_post = post.reshared_post.as_ref().filter(|_| variant.is_reshare());

        let avatar = async {
            match author.avatar_ref() {
                Some(url) => self.fetch(FetchRole::PrimaryAvatar, url).await,
                None => Err(Error::FetchError {
                    role: FetchRole::PrimaryAvatar,
                    url: String::new(),
                    reason: format!("author '{}' has no avatar reference", name),
                }),
            }
        };
        let images = try_join_all(
            media_refs
                .iter()
                .enumerate()
                .map(|(i, url)| self.fetch(FetchRole::PrimaryMedia(i), url)),
        );
        let original = async {
            match original_post {
                Some(original) => self
                    .assemble_original(original, classification.original_media)
                    .await
                    .map(Some),
                None => Ok(None),
            }
        };
        let (avatar, mut images, original) = futures::try_join!(avatar, images, original)?;

        let gallery = if images.is_empty() {
            GalleryMedia::None
        } else if variant == Variant::Video {
            GalleryMedia::Video(images.swap_remove(0))
        } else {
            GalleryMedia::Images(images)
        };

        Ok(RenderContext {
            variant,
            timestamp,
            url: post.url.clone(),
            bio: author.bio().to_string(),
            name,
            avatar,
            text: post.text.clone().unwrap_or_default(),
            time,
            reactions: post.stats.total_reactions,
            comments,
            gallery,
            original,
        })
    }

    async fn assemble_original(
        &self,
        original: &OriginalPost,
        media_ref: Option<&str>,
    ) -> Result<OriginalContext> {
        let name = original.author.display_name();
        let avatar = async {
            match original.author.avatar_ref() {
                Some(url) => self.fetch(FetchRole::OriginalAvatar, url).await,
                None => Ok(placeholder_avatar(&name)),
            }
        };
        let media = async {
            match media_ref {
                Some(url) => self.fetch(FetchRole::OriginalMedia, url).await.map(Some),
                None => Ok(None),
            }
        };
        let (avatar, media) = futures::try_join!(avatar, media)?;

        Ok(OriginalContext {
            bio: original.author.bio().to_string(),
            name,
            avatar,
            text: original.text.clone().unwrap_or_default(),
            media,
        })
    }

    async fn fetch(&self, role: FetchRole, url: &str) -> Result<EmbeddedImage> {
        log::debug!("fetching {} from {}", role, url);
        self.fetcher
            .fetch(url)
            .await
            .map_err(|e| Error::fetch(role, url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::{Author, Media, MediaKind, MediaRef, PostKind, PostedAt, Stats, Timestamp};
    use crate::services::{LabelTimeTranslator, MemoryFetcher};

    fn image(tag: &str) -> EmbeddedImage {
        EmbeddedImage::from_data_url(format!("data:image/png;base64,{}", tag))
    }

    fn fetcher() -> MemoryFetcher {
        let mut f = MemoryFetcher::new();
        for url in ["avatar", "i1", "i2", "i3", "i4", "i5", "thumb", "orig-avatar", "orig-media"] {
            f.insert(url, image(url));
        }
        f
    }

    fn base_post() -> Post {
        Post {
            url: Some("https://example.com/p/1".into()),
            text: Some("Hello <world>".into()),
            author: Some(Author {
                first_name: "Ada".into(),
                last_name: Some("Lovelace".into()),
                headline: Some("Analyst".into()),
                profile_picture: Some("avatar".into()),
            }),
            posted_at: Some(PostedAt {
                timestamp: Some(Timestamp::Number(1700000000000)),
                relative: "2d • Edited".into(),
            }),
            stats: Stats {
                total_reactions: 42,
                comments: 1,
            },
            ..Default::default()
        }
    }

    fn gallery_post(urls: &[&str]) -> Post {
        Post {
            media: Some(Media {
                kind: MediaKind::Images,
                images: urls.iter().map(|u| MediaRef::Url(u.to_string())).collect(),
                ..Default::default()
            }),
            ..base_post()
        }
    }

    async fn run(post: &Post) -> Result<RenderContext> {
        let fetcher = fetcher();
        let options = RenderOptions::default();
        Assembler::new(&fetcher, &LabelTimeTranslator, &options)
            .assemble(post)
            .await
    }

    #[tokio::test]
    async fn resolves_primary_values() {
        let ctx = run(&base_post()).await.unwrap();
        assert_eq!(ctx.variant, Variant::PlainText);
        assert_eq!(ctx.name, "Ada Lovelace");
        assert_eq!(ctx.time, "2d");
        assert_eq!(ctx.comments, "1 comment");
        assert_eq!(ctx.timestamp, "1700000000000");
        assert_eq!(ctx.avatar, image("avatar"));
        assert_eq!(ctx.gallery, GalleryMedia::None);
        assert!(ctx.original.is_none());
    }

    #[tokio::test]
    async fn gallery_is_capped_in_source_order() {
        let ctx = run(&gallery_post(&["i1", "i2", "i3", "i4", "i5"])).await.unwrap();
        assert_eq!(
            ctx.gallery,
            GalleryMedia::Images(vec![image("i1"), image("i2"), image("i3"), image("i4")])
        );
    }

    #[tokio::test]
    async fn cap_is_configurable() {
        let fetcher = fetcher();
        let options = RenderOptions {
            max_gallery_images: 2,
            ..Default::default()
        };
        let ctx = Assembler::new(&fetcher, &LabelTimeTranslator, &options)
            .assemble(&gallery_post(&["i1", "i2", "i3"]))
            .await
            .unwrap();
        assert_eq!(
            ctx.gallery,
            GalleryMedia::Images(vec![image("i1"), image("i2")])
        );
    }

    #[tokio::test]
    async fn video_uses_thumbnail() {
        let post = Post {
            is_video: true,
            media: Some(Media {
                kind: MediaKind::Video,
                thumbnail: Some("thumb".into()),
                ..Default::default()
            }),
            ..base_post()
        };
        let ctx = run(&post).await.unwrap();
        assert_eq!(ctx.variant, Variant::Video);
        assert_eq!(ctx.gallery, GalleryMedia::Video(image("thumb")));
    }

    #[tokio::test]
    async fn original_without_avatar_gets_placeholder() {
        let post = Post {
            post_type: PostKind::Quote,
            reshared_post: Some(OriginalPost {
                author: Author {
                    first_name: "Grace".into(),
                    last_name: Some("Hopper".into()),
                    ..Default::default()
                },
                text: Some("orig".into()),
                media: Some(Media {
                    kind: MediaKind::Images,
                    images: vec![MediaRef::Url("orig-media".into())],
                    ..Default::default()
                }),
            }),
            ..base_post()
        };
        let ctx = run(&post).await.unwrap();
        assert_eq!(ctx.variant, Variant::QuotedMedia);
        let original = ctx.original.as_ref().unwrap();
        assert_eq!(original.avatar, placeholder_avatar("Grace Hopper"));
        assert_eq!(original.media, Some(image("orig-media")));
        let values = ctx.field_values();
        assert_eq!(values[&Field::OriginalMedia], image("orig-media").as_str());
    }

    #[tokio::test]
    async fn failed_original_avatar_fetch_is_not_replaced() {
        let post = Post {
            post_type: PostKind::Repost,
            reshared_post: Some(OriginalPost {
                author: Author {
                    first_name: "Grace".into(),
                    profile_picture: Some("broken".into()),
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..base_post()
        };
        let err = run(&post).await.unwrap_err();
        assert!(matches!(
            err,
            Error::FetchError {
                role: FetchRole::OriginalAvatar,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn primary_avatar_has_no_fallback() {
        let mut post = base_post();
        post.author.as_mut().unwrap().profile_picture = None;
        let err = run(&post).await.unwrap_err();
        assert!(matches!(
            err,
            Error::FetchError {
                role: FetchRole::PrimaryAvatar,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn malformed_records_are_rejected() {
        let mut post = base_post();
        post.posted_at = None;
        assert!(matches!(run(&post).await, Err(Error::InvalidPost(_))));
        let mut post = base_post();
        post.author = None;
        assert!(matches!(run(&post).await, Err(Error::InvalidPost(_))));
    }

    #[test]
    fn relative_time_suffix_is_stripped() {
        assert_eq!(relative_time_core("3w • Edited • "), "3w");
        assert_eq!(relative_time_core(" 1h "), "1h");
        assert_eq!(relative_time_core(""), "");
    }
}
