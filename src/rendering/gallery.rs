/// Gallery region contents for media cards

use super::overlay::play_overlay;
use super::template::GalleryWrite;
use super::Theme;
use crate::assemble::GalleryMedia;
use crate::services::{AnimationGenerator, EmbeddedImage};

const SLIDE_INDENT: &str = "            ";

/// Build the gallery write for a card, or `None` when it shows no media.
pub fn gallery_write(
    media: &GalleryMedia,
    theme: Theme,
    animation: &dyn AnimationGenerator,
) -> Option<GalleryWrite> {
    match media {
        GalleryMedia::None => None,
        GalleryMedia::Video(thumbnail) => Some(video_gallery(thumbnail, theme)),
        GalleryMedia::Images(images) if images.is_empty() => None,
        GalleryMedia::Images(images) => Some(image_gallery(images, animation)),
    }
}

/// One static slide with the play overlay; animation is switched off.
pub fn video_gallery(thumbnail: &EmbeddedImage, theme: Theme) -> GalleryWrite {
    let slides = format!(
        r#"{SLIDE_INDENT}<div class="gallery-slide img-1" style="background-image: url({}); position: relative;">
                </div>{}"#,
        thumbnail.as_str(),
        play_overlay(theme)
    );
    GalleryWrite {
        container_style: Some("position: relative;".to_string()),
        slides,
        keyframes: String::new(),
        slot_rules: ".img-1 { opacity: 1; }".to_string(),
    }
}

/// One slide per image, in order, animated by the generator.
pub fn image_gallery(images: &[EmbeddedImage], animation: &dyn AnimationGenerator) -> GalleryWrite {
    let fragments = animation.generate(images.len());
    let slides = images
        .iter()
        .enumerate()
        .map(|(i, img)| {
            format!(
                r#"{SLIDE_INDENT}<div class="gallery-slide img-{}" style="background-image: url({});"></div>"#,
                i + 1,
                img.as_str()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    GalleryWrite {
        container_style: None,
        slides,
        keyframes: fragments.keyframes,
        slot_rules: fragments.classes,
    }
}
