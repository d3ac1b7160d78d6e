/// Placeholder avatars for authors without a profile picture

use crate::services::EmbeddedImage;

/// Background of generated avatars
pub const BRAND_COLOR: &str = "#0a66c2";

/// Glyph used when a name has no characters at all
pub const FALLBACK_GLYPH: &str = "?";

/// Initials of a display name: first letters of the first and last token,
/// or of the only token, uppercased.
pub fn initials(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    let letters: Vec<char> = match parts.as_slice() {
        [] => return FALLBACK_GLYPH.to_string(),
        [only] => only.chars().take(1).collect(),
        [first, .., last] => first.chars().take(1).chain(last.chars().take(1)).collect(),
    };
    letters.into_iter().flat_map(char::to_uppercase).collect()
}

/// A 64x64 SVG with the initials on the brand background.
pub fn placeholder_avatar(name: &str) -> EmbeddedImage {
    let initials = htmlescape::encode_minimal(&initials(name));
    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64">
        <rect width="64" height="64" fill="{BRAND_COLOR}"/>
        <text x="32" y="32" font-family="Arial, sans-serif" font-size="24" font-weight="bold" fill="white" text-anchor="middle" dominant-baseline="central">{initials}</text>
    </svg>"#
    );
    EmbeddedImage::from_bytes("image/svg+xml", svg.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    fn decode(img: &EmbeddedImage) -> String {
        let b64 = img
            .as_str()
            .strip_prefix("data:image/svg+xml;base64,")
            .expect("svg data url");
        String::from_utf8(base64::engine::general_purpose::STANDARD.decode(b64).unwrap()).unwrap()
    }

    #[test]
    fn two_or_more_tokens_use_first_and_last() {
        assert_eq!(initials("ada lovelace"), "AL");
        assert_eq!(initials("  Grace   Brewster Murray Hopper "), "GH");
        assert_eq!(initials("émile zola"), "ÉZ");
    }

    #[test]
    fn single_token_and_empty() {
        assert_eq!(initials("Ada"), "A");
        assert_eq!(initials(""), FALLBACK_GLYPH);
        assert_eq!(initials("   "), FALLBACK_GLYPH);
    }

    #[test]
    fn avatar_embeds_initials_on_brand_color() {
        let svg = decode(&placeholder_avatar("Alan Turing"));
        assert!(svg.contains(">AT</text>"));
        assert!(svg.contains(BRAND_COLOR));
        let svg = decode(&placeholder_avatar(""));
        assert!(svg.contains(">?</text>"));
    }
}
