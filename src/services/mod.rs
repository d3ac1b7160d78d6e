//! Collaborators the renderer orchestrates: image fetching, gallery
//! animation and relative-time translation.
//!
//! Each concern is a trait so callers can substitute their own
//! implementation; the defaults here are what `new_renderer` wires up.

pub mod animation;
pub mod fetch;
pub mod i18n;

pub use animation::{Animation, AnimationGenerator, CarouselAnimation};
#[cfg(feature = "http")]
pub use fetch::HttpImageFetcher;
pub use fetch::{EmbeddedImage, FetcherConfig, ImageFetcher, MemoryFetcher};
pub use i18n::{LabelTimeTranslator, Labels, TimeTranslator, Translations};
