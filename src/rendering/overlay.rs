/// Play-button overlay drawn over video thumbnails

use super::Theme;

/// A centered round badge with a play triangle, as HTML for the card's
/// `foreignObject`. The dark theme uses a denser badge background.
pub fn play_overlay(theme: Theme) -> String {
    let bg_color = match theme {
        Theme::Dark => "rgba(0, 0, 0, 0.7)",
        Theme::Light => "rgba(0, 0, 0, 0.6)",
    };
    let icon_color = "#ffffff";

    format!(
        r#"
                <div style="position: absolute; top: 0; left: 0; width: 100%; height: 100%; display: flex; align-items: center; justify-content: center; pointer-events: none;">
                    <div style="width: 68px; height: 68px; border-radius: 50%; background: {bg_color}; display: flex; align-items: center; justify-content: center; border: 3px solid rgba(255,255,255,0.9); box-shadow: 0 4px 15px rgba(0,0,0,0.4);">
                        <div style="width: 0; height: 0; border-top: 14px solid transparent; border-bottom: 14px solid transparent; border-left: 22px solid {icon_color}; margin-left: 5px;"></div>
                    </div>
                </div>"#
    )
}
