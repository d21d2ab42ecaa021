/// Desktop shell around the grid engine
///
/// - `grid_view.rs` - the virtualized thumbnail grid
/// - `lightbox.rs` - carousel / compare / fullscreen views
/// - `style.rs` - container styles derived from tile class names
/// - `keys.rs` - keyboard shortcuts

pub mod grid_view;
pub mod keys;
pub mod lightbox;
pub mod style;

use iced::widget::{image, svg};
use iced::{ContentFit, Element, Length};

use media_review::config::{ResolvedAsset, Settings};

use crate::Message;

/// Shown for records without a usable image
static PLACEHOLDER_SVG: &[u8] = include_bytes!("../../assets/placeholder.svg");

/// Draw the image behind a mount path
pub fn asset_view<'a>(src: &str, settings: &Settings, width: Length, height: Length) -> Element<'a, Message> {
    match settings.resolve_asset(src) {
        ResolvedAsset::File(path) => image(image::Handle::from_path(path))
            .width(width)
            .height(height)
            .content_fit(ContentFit::Contain)
            .into(),
        ResolvedAsset::Placeholder | ResolvedAsset::Unavailable => {
            svg(svg::Handle::from_memory(PLACEHOLDER_SVG))
                .width(width)
                .height(height)
                .content_fit(ContentFit::Contain)
                .into()
        }
    }
}
