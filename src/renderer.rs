//! The card renderer: classify, assemble, render both themes, write.

use std::path::Path;

use crate::assemble::Assembler;
use crate::output::{CardManifest, CardWriter};
use crate::post::Post;
use crate::rendering::{render_card, template_path, Template, Theme};
use crate::services::{
    AnimationGenerator, CarouselAnimation, ImageFetcher, LabelTimeTranslator, TimeTranslator,
};
use crate::{RenderOptions, Result};

/// Renders posts into themed SVG cards.
///
/// Holds no per-post state, so one renderer can process any number of posts.
pub struct CardRenderer {
    fetcher: Box<dyn ImageFetcher>,
    animation: Box<dyn AnimationGenerator>,
    translator: Box<dyn TimeTranslator>,
}

impl CardRenderer {
    /// A renderer using the given fetcher and the default animation and
    /// time translation.
    pub fn new(fetcher: impl ImageFetcher + 'static) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            animation: Box::new(CarouselAnimation::default()),
            translator: Box::new(LabelTimeTranslator),
        }
    }

    pub fn with_animation(mut self, animation: impl AnimationGenerator + 'static) -> Self {
        self.animation = Box::new(animation);
        self
    }

    pub fn with_translator(mut self, translator: impl TimeTranslator + 'static) -> Self {
        self.translator = Box::new(translator);
        self
    }

    /// Render one post in every theme and write the cards to `output_dir`.
    ///
    /// Nothing is written unless every fetch succeeded and every theme's
    /// template was found. If writing a later theme fails, the cards already
    /// written for this post are removed again.
    ///
    /// Reshares and quotes show the original post's media only; media attached
    /// to the resharing post itself is not rendered.
    pub async fn render_post(
        &self,
        post: &Post,
        output_dir: &Path,
        template_root: &Path,
        options: &RenderOptions,
    ) -> Result<CardManifest> {
        let ctx = Assembler::new(self.fetcher.as_ref(), self.translator.as_ref(), options)
            .assemble(post)
            .await?;
        let values = ctx.field_values();

        let mut cards = Vec::with_capacity(Theme::ALL.len());
        for theme in Theme::ALL {
            let template = Template::load(&template_path(template_root, ctx.variant, theme)).await?;
            let card = render_card(&template, &ctx, &values, theme, self.animation.as_ref())?;
            cards.push((theme, card));
        }

        let writer = CardWriter::create(output_dir).await?;
        let mut written = Vec::with_capacity(cards.len());
        for (theme, card) in &cards {
            match writer.write(&ctx.timestamp, *theme, card).await {
                Ok(path) => written.push(path),
                Err(e) => {
                    for path in &written {
                        if let Err(cleanup) = tokio::fs::remove_file(path).await {
                            log::warn!("could not remove {}: {}", path.display(), cleanup);
                        }
                    }
                    return Err(e);
                }
            }
        }
        for path in &written {
            log::info!("Card generated: {} {}", path.display(), ctx.variant.label());
        }

        Ok(CardManifest {
            timestamp: ctx.timestamp,
            url: ctx.url,
        })
    }

    /// Render posts in sequence. Each post succeeds or fails on its own.
    ///
    /// Takes records as produced by [`Post::parse_many`]; a record that
    /// failed to parse is reported in its slot without being rendered.
    pub async fn render_batch(
        &self,
        posts: impl IntoIterator<Item = Result<Post>>,
        output_dir: &Path,
        template_root: &Path,
        options: &RenderOptions,
    ) -> Vec<Result<CardManifest>> {
        let mut results = Vec::new();
        for (i, record) in posts.into_iter().enumerate() {
            let res = match record {
                Ok(post) => {
                    let res = self
                        .render_post(&post, output_dir, template_root, options)
                        .await;
                    if let Err(e) = &res {
                        log::error!("post #{} ({}) failed: {}", i + 1, post.url.as_deref().unwrap_or("<no url>"), e);
                    }
                    res
                }
                Err(e) => {
                    log::error!("post #{} skipped: {}", i + 1, e);
                    Err(e)
                }
            };
            results.push(res);
        }
        results
    }
}
