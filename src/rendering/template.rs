//! Card templates.
//!
//! A template is an SVG document parsed into literal text, typed `${field}`
//! slots and the regions a gallery write replaces:
//!
//! - the empty `<div class="gallery-container"></div>` element,
//! - a run of up to four `@keyframes` rules,
//! - a run of up to four `.img-N { ... }` slot rules.
//!
//! Parsing never fails; a template that lacks a region only fails when a
//! render actually needs to rewrite it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Region;
use crate::{Error, Result};

const GALLERY_OPEN: &str = r#"<div class="gallery-container">"#;
const GALLERY_CLOSE: &str = "</div>";
const KEYFRAMES: &str = "@keyframes";
const SLOT_RULE: &str = ".img-";
/// Longest run of keyframes or slot rules treated as one region
const MAX_STYLE_RULES: usize = 4;
/// Indentation the gallery rewrite uses for the closing tag
const CONTAINER_INDENT: &str = "        ";

/// Named values a template can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Bio,
    ProfilePicture,
    Text,
    Time,
    Reactions,
    Comments,
    OriginalName,
    OriginalBio,
    OriginalProfilePicture,
    OriginalText,
    OriginalMedia,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::Name,
        Field::Bio,
        Field::ProfilePicture,
        Field::Text,
        Field::Time,
        Field::Reactions,
        Field::Comments,
        Field::OriginalName,
        Field::OriginalBio,
        Field::OriginalProfilePicture,
        Field::OriginalText,
        Field::OriginalMedia,
    ];

    /// Marker name as written inside `${...}`
    pub fn name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Bio => "bio",
            Field::ProfilePicture => "profile_picture",
            Field::Text => "text",
            Field::Time => "time",
            Field::Reactions => "reactions",
            Field::Comments => "comments",
            Field::OriginalName => "original_name",
            Field::OriginalBio => "original_bio",
            Field::OriginalProfilePicture => "original_profile_picture",
            Field::OriginalText => "original_text",
            Field::OriginalMedia => "original_media",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Resolved field values for one render
pub type FieldValues = BTreeMap<Field, String>;

/// Replacement content for the gallery and style regions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryWrite {
    /// Inline style added to the container element
    pub container_style: Option<String>,
    /// Slide markup placed inside the container
    pub slides: String,
    /// Replaces the keyframes run; may be empty
    pub keyframes: String,
    /// Replaces the slot-rule run
    pub slot_rules: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(Field),
    /// `${...}` marker with a name the renderer does not know
    Unknown(String),
    Gallery(String),
    Keyframes(String),
    SlotRules(String),
}

#[derive(Debug, Clone)]
pub struct Template {
    path: PathBuf,
    segments: Vec<Segment>,
}

impl Template {
    /// Read and parse a template file.
    pub async fn load(path: &Path) -> Result<Self> {
        let source = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::TemplateNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Other(format!("Failed to read template {}: {}", path.display(), e))
            }
        })?;
        Ok(Self::parse(path, &source))
    }

    pub fn parse(path: impl Into<PathBuf>, source: &str) -> Self {
        let mut regions: Vec<(usize, usize, fn(String) -> Segment)> = Vec::new();
        if let Some((s, e)) = find_gallery(source) {
            regions.push((s, e, Segment::Gallery));
        }
        if let Some((s, e)) = find_run(source, KEYFRAMES, keyframes_rule) {
            regions.push((s, e, Segment::Keyframes));
        }
        if let Some((s, e)) = find_run(source, SLOT_RULE, slot_rule) {
            regions.push((s, e, Segment::SlotRules));
        }
        regions.sort_by_key(|r| r.0);

        let mut segments = Vec::new();
        let mut pos = 0;
        for (start, end, make) in regions {
            if start < pos {
                continue;
            }
            split_fields(&source[pos..start], &mut segments);
            segments.push(make(source[start..end].to_string()));
            pos = end;
        }
        split_fields(&source[pos..], &mut segments);

        Self {
            path: path.into(),
            segments,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_region(&self, region: Region) -> bool {
        self.segments.iter().any(|s| match region {
            Region::GalleryContainer => matches!(s, Segment::Gallery(_)),
            Region::SlotRules => matches!(s, Segment::SlotRules(_)),
        })
    }

    fn has_keyframes(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Keyframes(_)))
    }

    /// Fields referenced by this template, in document order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(f) => Some(*f),
            _ => None,
        })
    }

    /// Substitute field values and, when given, rewrite the gallery regions.
    ///
    /// Values are XML-escaped. A field with no value is left as its literal
    /// marker.
    pub fn render(&self, values: &FieldValues, gallery: Option<&GalleryWrite>) -> Result<String> {
        if gallery.is_some() {
            for region in [Region::GalleryContainer, Region::SlotRules] {
                if !self.has_region(region) {
                    return Err(Error::MissingRegion {
                        path: self.path.clone(),
                        region,
                    });
                }
            }
        }
        let inline_keyframes = gallery.filter(|g| !g.keyframes.is_empty() && !self.has_keyframes());

        let mut out = String::new();
        for segment in &self.segments {
            match (segment, gallery) {
                (Segment::Text(text), _) => out.push_str(text),
                (Segment::Field(field), _) => match values.get(field) {
                    Some(value) => out.push_str(&htmlescape::encode_minimal(value)),
                    None => {
                        log::warn!(
                            "{}: no value for ${{{}}}, left as-is",
                            self.path.display(),
                            field.name()
                        );
                        out.push_str(&format!("${{{}}}", field.name()));
                    }
                },
                (Segment::Unknown(raw), _) => out.push_str(raw),
                (Segment::Gallery(_), Some(g)) => {
                    match &g.container_style {
                        Some(style) => out.push_str(&format!(
                            r#"<div class="gallery-container" style="{}">"#,
                            style
                        )),
                        None => out.push_str(GALLERY_OPEN),
                    }
                    out.push('\n');
                    out.push_str(&g.slides);
                    out.push('\n');
                    out.push_str(CONTAINER_INDENT);
                    out.push_str(GALLERY_CLOSE);
                }
                (Segment::Keyframes(_), Some(g)) => out.push_str(&g.keyframes),
                (Segment::SlotRules(_), Some(g)) => {
                    if let Some(k) = inline_keyframes {
                        out.push_str(&k.keyframes);
                        out.push('\n');
                        out.push_str(CONTAINER_INDENT);
                    }
                    out.push_str(&g.slot_rules);
                }
                (Segment::Gallery(raw) | Segment::Keyframes(raw) | Segment::SlotRules(raw), None) => {
                    out.push_str(raw)
                }
            }
        }
        Ok(out)
    }
}

fn skip_ws(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

/// First empty gallery container: the opening tag, optional whitespace, the
/// closing tag.
fn find_gallery(src: &str) -> Option<(usize, usize)> {
    let mut from = 0;
    while let Some(pos) = src[from..].find(GALLERY_OPEN) {
        let start = from + pos;
        let inner = start + GALLERY_OPEN.len();
        let close = inner + skip_ws(&src[inner..]);
        if src[close..].starts_with(GALLERY_CLOSE) {
            return Some((start, close + GALLERY_CLOSE.len()));
        }
        from = inner;
    }
    None
}

/// Index just past the brace matching the one at `open`.
fn block_end(src: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in src.as_bytes()[open..].iter().enumerate() {
        match *b {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn keyframes_rule(src: &str, at: usize) -> Option<usize> {
    if !src[at..].starts_with(KEYFRAMES) {
        return None;
    }
    let after_kw = at + KEYFRAMES.len();
    let name_start = after_kw + skip_ws(&src[after_kw..]);
    if name_start == after_kw {
        return None;
    }
    let name_len = src[name_start..]
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'-')
        .count();
    if name_len == 0 {
        return None;
    }
    let after_name = name_start + name_len;
    let brace = after_name + skip_ws(&src[after_name..]);
    if !src[brace..].starts_with('{') {
        return None;
    }
    block_end(src, brace)
}

fn slot_rule(src: &str, at: usize) -> Option<usize> {
    if !src[at..].starts_with(SLOT_RULE) {
        return None;
    }
    let digits_start = at + SLOT_RULE.len();
    let digits = src[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    let after = digits_start + digits;
    let brace = after + skip_ws(&src[after..]);
    if !src[brace..].starts_with('{') {
        return None;
    }
    block_end(src, brace)
}

/// First run of 1..=MAX_STYLE_RULES consecutive rules, separated only by
/// whitespace.
fn find_run(src: &str, needle: &str, rule: fn(&str, usize) -> Option<usize>) -> Option<(usize, usize)> {
    let mut from = 0;
    while let Some(pos) = src[from..].find(needle) {
        let start = from + pos;
        if let Some(mut end) = rule(src, start) {
            for _ in 1..MAX_STYLE_RULES {
                let next = end + skip_ws(&src[end..]);
                match rule(src, next) {
                    Some(e) => end = e,
                    None => break,
                }
            }
            return Some((start, end));
        }
        from = start + needle.len();
    }
    None
}

/// Split literal text on `${name}` markers.
fn split_fields(text: &str, out: &mut Vec<Segment>) {
    let mut rest = text;
    let mut literal = String::new();
    while let Some(open) = rest.find("${") {
        let after = &rest[open + 2..];
        let Some(close) = after.find('}') else {
            break;
        };
        let name = &after[..close];
        let is_ident = !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_');
        if !is_ident {
            literal.push_str(&rest[..open + 2]);
            rest = after;
            continue;
        }
        literal.push_str(&rest[..open]);
        if !literal.is_empty() {
            out.push(Segment::Text(std::mem::take(&mut literal)));
        }
        out.push(match Field::from_name(name) {
            Some(field) => Segment::Field(field),
            None => Segment::Unknown(format!("${{{}}}", name)),
        });
        rest = &after[close + 1..];
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        out.push(Segment::Text(literal));
    }
}
