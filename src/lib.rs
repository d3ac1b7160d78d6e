//! Linkcard
//!
//! Renders a social-media post as a pair of themed SVG cards (light and
//! dark), picking the template that matches the post's structure and filling
//! in names, avatars, body text, localized time, counts and media.
//!
//! # Pipeline
//!
//! - **Classify**: plain text, image gallery, video, simple reshare, or a
//!   quote with or without media on the quoted post
//! - **Assemble**: resolve every display value, fetching images once per post
//! - **Render**: fill `<templates>/<variant>/<theme>.svg` and rewrite its
//!   gallery region for media posts
//! - **Write**: `<out>/<timestamp>-<theme>.svg`, reported as a [`CardManifest`]
//!
//! # Example
//!
//! ```no_run
//! use linkcard::{FetcherConfig, Post, RenderOptions};
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let posts = Post::parse_many(&std::fs::read_to_string("posts.json")?)?;
//! let renderer = linkcard::new_renderer(FetcherConfig::default())?;
//! let options = RenderOptions {
//!     language: "fr".to_string(),
//!     ..Default::default()
//! };
//!
//! for result in renderer
//!     .render_batch(posts, Path::new("cards"), Path::new("templates"), &options)
//!     .await
//! {
//!     match result {
//!         Ok(entry) => println!("{} -> {:?}", entry.timestamp, entry.url),
//!         Err(e) => eprintln!("skipped: {}", e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, FetchRole, Region, Result};

pub mod assemble;
pub mod classify;
pub mod output;
pub mod post;
pub mod renderer;
pub mod rendering;

// Collaborators: image fetching, gallery animation, time translation
pub mod services;

pub use assemble::{GalleryMedia, OriginalContext, RenderContext};
pub use classify::{classify, Classification, Variant};
pub use output::CardManifest;
pub use post::Post;
pub use renderer::CardRenderer;
pub use rendering::Theme;
pub use services::{EmbeddedImage, FetcherConfig, ImageFetcher, Translations};

/// Per-call rendering options
///
/// The defaults render English labels and at most four gallery images:
///
/// ```
/// let opts = linkcard::RenderOptions::default();
/// assert_eq!(opts.language, "en");
/// assert_eq!(opts.max_gallery_images, 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Locale code used for labels and relative time
    pub language: String,
    /// Label tables per locale
    pub translations: Translations,
    /// Images beyond this count are dropped from galleries
    pub max_gallery_images: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            language: services::i18n::DEFAULT_LANGUAGE.to_string(),
            translations: Translations::default(),
            max_gallery_images: 4,
        }
    }
}

/// Create a renderer that fetches images over HTTP.
#[cfg(feature = "http")]
pub fn new_renderer(config: FetcherConfig) -> Result<CardRenderer> {
    Ok(CardRenderer::new(services::HttpImageFetcher::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = RenderOptions::default();
        assert_eq!(opts.language, "en");
        assert_eq!(opts.max_gallery_images, 4);
        assert_eq!(opts.translations.comment_count("en", 2), "2 comments");
    }

    #[test]
    fn test_options_from_partial_json() {
        let opts: RenderOptions = serde_json::from_str(r#"{"language": "de"}"#).unwrap();
        assert_eq!(opts.language, "de");
        assert_eq!(opts.max_gallery_images, 4);
    }
}
