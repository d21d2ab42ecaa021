use iced::widget::container;
use iced::{Background, Border, Color, Theme};

use media_review::grid::tile::BASE_CLASS;

const SELECTED: Color = Color::from_rgb(0.25, 0.55, 1.0);
const DISCARDED: Color = Color::from_rgb(0.85, 0.25, 0.25);
const DUPLICATE: Color = Color::from_rgb(0.95, 0.65, 0.15);
const SIMILAR: Color = Color::from_rgb(0.65, 0.45, 0.95);
const TILE_BACKGROUND: Color = Color::from_rgb(0.16, 0.16, 0.16);
const REVIEWED_BACKGROUND: Color = Color::from_rgb(0.13, 0.19, 0.14);

fn has_token(class_name: &str, token: &str) -> bool {
    class_name.split(' ').any(|t| t == token)
}

/// Tile container style, driven only by the tile's class tokens
pub fn tile(class_name: &str) -> impl Fn(&Theme) -> container::Style {
    debug_assert!(class_name.starts_with(BASE_CLASS));

    let border_color = if has_token(class_name, "selected") {
        Some(SELECTED)
    } else if has_token(class_name, "discarded") {
        Some(DISCARDED)
    } else if has_token(class_name, "duplicate-group") {
        Some(DUPLICATE)
    } else if has_token(class_name, "similar-group") {
        Some(SIMILAR)
    } else {
        None
    };
    let width = if has_token(class_name, "selected") { 3.0 } else { 1.5 };
    let background = if has_token(class_name, "reviewed") {
        REVIEWED_BACKGROUND
    } else {
        TILE_BACKGROUND
    };
    let dimmed = has_token(class_name, "discarded");

    move |_theme: &Theme| container::Style {
        background: Some(Background::Color(background)),
        text_color: dimmed.then_some(Color::from_rgb(0.55, 0.55, 0.55)),
        border: Border {
            color: border_color.unwrap_or(Color::TRANSPARENT),
            width: if border_color.is_some() { width } else { 0.0 },
            radius: 4.0.into(),
        },
        ..container::Style::default()
    }
}

/// Short markers printed under a tile
pub fn badges(class_name: &str) -> String {
    let mut badges = String::new();
    for (token, badge) in [
        ("reviewed", "✓"),
        ("discarded", "✗"),
        ("duplicate-group", "D"),
        ("similar-group", "S"),
    ] {
        if has_token(class_name, token) {
            badges.push_str(badge);
        }
    }
    badges
}

/// Lightbox background; fullscreen goes black
pub fn viewport(marker: Option<&'static str>) -> impl Fn(&Theme) -> container::Style {
    let color = match marker {
        Some("fullscreen-mode") => Color::BLACK,
        _ => Color::from_rgb(0.08, 0.08, 0.08),
    };
    move |_theme: &Theme| container::Style {
        background: Some(Background::Color(color)),
        text_color: Some(Color::WHITE),
        ..container::Style::default()
    }
}
