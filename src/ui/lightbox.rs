use iced::widget::{button, column, container, mouse_area, row, text, Space};
use iced::{Alignment, Element, Length};

use media_review::config::Settings;
use media_review::grid::tile::Position;
use media_review::grid::{TileManager, ViewMode, ViewportController};
use media_review::FileId;

use super::{asset_view, style};
use crate::Message;

/// Width of the prev/next strips in carousel mode
const SIDE_WIDTH: f32 = 160.0;

pub fn view<'a>(
    viewport: &'a ViewportController,
    grid: &'a TileManager,
    settings: &'a Settings,
) -> Element<'a, Message> {
    let body: Element<'a, Message> = match viewport.view_mode() {
        ViewMode::Carousel => carousel(viewport, grid, settings),
        ViewMode::Compare => compare(viewport, grid, settings),
        ViewMode::Fullscreen => focused(grid, current(viewport), settings),
    };

    let content = if viewport.view_mode() == ViewMode::Fullscreen {
        body
    } else {
        column![toolbar(viewport, grid), body].spacing(8).padding(8).into()
    };

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(style::viewport(viewport.marker()))
        .into()
}

fn current(viewport: &ViewportController) -> Option<FileId> {
    viewport.get_current_file_id()
}

fn toolbar<'a>(viewport: &'a ViewportController, grid: &'a TileManager) -> Element<'a, Message> {
    let name = current(viewport)
        .and_then(|id| grid.get_file(id))
        .map(|file| file.original_filename.clone())
        .unwrap_or_default();

    let mut modes = row![].spacing(4);
    for mode in ViewMode::ALL {
        let label = button(text(mode.as_str()).size(12)).padding([4, 8]);
        modes = modes.push(if mode == viewport.view_mode() {
            label
        } else {
            label.on_press(Message::SetViewMode(mode))
        });
    }

    row![
        button("◀").on_press_maybe(viewport.has_prev().then_some(Message::Previous)),
        text(viewport.position_label()).size(14),
        button("▶").on_press_maybe(viewport.has_next().then_some(Message::Next)),
        text(name).size(14),
        Space::with_width(Length::Fill),
        modes,
        button("✕").on_press(Message::CloseViewport),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}

/// Source the tile currently shows, or nothing for unmaterialized ids
fn source(grid: &TileManager, id: Option<FileId>) -> Option<&str> {
    id.and_then(|id| grid.get_tile(id)).map(|tile| tile.element().src.as_str())
}

fn focused<'a>(grid: &'a TileManager, id: Option<FileId>, settings: &'a Settings) -> Element<'a, Message> {
    match source(grid, id) {
        Some(src) => asset_view(src, settings, Length::Fill, Length::Fill),
        None => Space::new(Length::Fill, Length::Fill).into(),
    }
}

fn neighbour<'a>(
    grid: &'a TileManager,
    position: Position,
    settings: &'a Settings,
    message: Message,
) -> Element<'a, Message> {
    let tile = grid
        .visible_tiles()
        .into_iter()
        .find(|tile| tile.position() == position);

    match tile {
        Some(tile) => mouse_area(asset_view(
            &tile.element().src,
            settings,
            Length::Fixed(SIDE_WIDTH),
            Length::Fill,
        ))
        .on_press(message)
        .into(),
        None => Space::with_width(SIDE_WIDTH).into(),
    }
}

fn carousel<'a>(
    viewport: &'a ViewportController,
    grid: &'a TileManager,
    settings: &'a Settings,
) -> Element<'a, Message> {
    row![
        neighbour(grid, Position::Prev, settings, Message::Previous),
        focused(grid, current(viewport), settings),
        neighbour(grid, Position::Next, settings, Message::Next),
    ]
    .spacing(12)
    .height(Length::Fill)
    .into()
}

fn compare<'a>(
    viewport: &'a ViewportController,
    grid: &'a TileManager,
    settings: &'a Settings,
) -> Element<'a, Message> {
    let Some(layout) = viewport.compare_layout() else {
        return focused(grid, current(viewport), settings);
    };

    let pane = |id: Option<FileId>| -> Element<'a, Message> {
        match source(grid, id) {
            Some(src) => asset_view(
                src,
                settings,
                Length::Fixed(layout.pane_width),
                Length::Fixed(layout.pane_height),
            ),
            None => Space::new(layout.pane_width, layout.pane_height).into(),
        }
    };

    row![pane(Some(layout.left)), pane(layout.right)]
        .spacing(16)
        .into()
}
