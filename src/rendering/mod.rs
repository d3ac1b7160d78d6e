//! Card rendering: templates, gallery rewrites and generated fragments.

pub mod avatar;
pub mod gallery;
pub mod overlay;
pub mod template;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::assemble::RenderContext;
use crate::classify::Variant;
use crate::services::AnimationGenerator;
use crate::Result;

pub use template::{Field, FieldValues, GalleryWrite, Template};

/// Visual palette a card is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `<root>/<variant dir>/<theme>.svg`
pub fn template_path(root: &Path, variant: Variant, theme: Theme) -> PathBuf {
    root.join(variant.template_dir())
        .join(format!("{}.svg", theme.as_str()))
}

/// Render one theme of a card from an already loaded template.
pub fn render_card(
    template: &Template,
    ctx: &RenderContext,
    values: &FieldValues,
    theme: Theme,
    animation: &dyn AnimationGenerator,
) -> Result<String> {
    let gallery = gallery::gallery_write(&ctx.gallery, theme, animation);
    template.render(values, gallery.as_ref())
}
