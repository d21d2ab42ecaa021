use iced::widget::{column, container, mouse_area, scrollable, text, Column, Row, Space};
use iced::{Element, Length};

use media_review::config::Settings;
use media_review::grid::{Tile, TileManager};

use super::{asset_view, style};
use crate::Message;

const CAPTION_SIZE: u16 = 11;

pub fn grid_id() -> scrollable::Id {
    scrollable::Id::new("tile-grid")
}

/// Virtual rows for the current window, padded with spacers so the
/// scrollbar covers the whole collection
pub fn view<'a>(grid: &'a TileManager, settings: &'a Settings) -> Element<'a, Message> {
    let scroll = grid.virtual_scroll();
    let layout = scroll.layout();
    let config = scroll.config();
    let range = scroll.visible_range();
    let order = grid.get_file_order();

    let mut rows = Column::new().spacing(config.gap);

    if !range.is_empty() {
        let first_row = range.start / layout.columns;
        let last_row = (range.end - 1) / layout.columns;

        // The column spacing already adds one gap between spacer and row
        let top = (first_row as f32 * layout.row_height - config.gap).max(0.0);
        if top > 0.0 {
            rows = rows.push(Space::with_height(top));
        }

        for chunk in order[range.clone()].chunks(layout.columns) {
            let mut cells = Row::new().spacing(config.gap);
            for id in chunk {
                cells = cells.push(match grid.get_tile(*id) {
                    Some(tile) => tile_cell(tile, config.tile_size, settings),
                    // Not materialized until the next frame's window pass
                    None => Space::new(config.tile_size, config.tile_size).into(),
                });
            }
            rows = rows.push(cells);
        }

        let bottom = scroll.total_height() - (last_row + 1) as f32 * layout.row_height;
        if bottom > 0.0 {
            rows = rows.push(Space::with_height(bottom));
        }
    }

    scrollable(container(rows).padding(config.gap).width(Length::Fill))
        .id(grid_id())
        .on_scroll(Message::GridScrolled)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn tile_cell<'a>(tile: &'a Tile, size: f32, settings: &'a Settings) -> Element<'a, Message> {
    let element = tile.element();
    let image_size = Length::Fixed(size - 2.0 * f32::from(CAPTION_SIZE));

    let caption = format!(
        "{} {}",
        style::badges(&element.class_name),
        tile.file().original_filename
    );

    let cell = container(
        column![
            asset_view(&element.src, settings, Length::Fill, image_size),
            text(caption).size(CAPTION_SIZE),
        ]
        .spacing(2),
    )
    .width(size)
    .height(size)
    .padding(3)
    .style(style::tile(&element.class_name));

    mouse_area(cell).on_press(Message::TileClicked(tile.id())).into()
}
