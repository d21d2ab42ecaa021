use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};
use iced::keyboard::{self, Modifiers};
use iced::widget::scrollable::{self, AbsoluteOffset};
use iced::widget::{button, column, row, slider, text, Space};
use iced::{event, window, Alignment, Element, Event, Length, Size, Subscription, Task, Theme};
use rfd::FileDialog;

use media_review::config::{MAX_TILE_SIZE, MIN_TILE_SIZE};
use media_review::grid::ViewMode;
use media_review::state::library::LibrarySource;
use media_review::{
    FileId, FilePatch, Library, ReviewFilter, ReviewSession, Settings, TileManager, ViewportController,
};

mod ui;

use ui::keys::KeyAction;

const TOOLBAR_HEIGHT: f32 = 48.0;
const INITIAL_WINDOW: Size = Size::new(1280.0, 800.0);

#[derive(Parser, Debug)]
#[command(version, about = "Review photo collections in a virtualized grid", long_about = None)]
pub struct Args {
    /// JSON export or image folder to open
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Grid tile edge length in pixels
    #[arg(long, value_name = "PX")]
    tile_size: Option<f32>,
}

/// Main application state
struct MediaReview {
    settings: Settings,
    grid: TileManager,
    viewport: ViewportController,
    /// Every record of the open library; the grid only holds the ones
    /// matching the session's filter
    session: ReviewSession,
    modifiers: Modifiers,
    /// Last plainly clicked tile, start of shift-click ranges
    anchor: Option<FileId>,
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    OpenFolder,
    OpenExport,
    LibraryLoaded(Result<Library, String>),
    GridScrolled(scrollable::Viewport),
    WindowResized(Size),
    /// Animation frame while a window pass is pending
    Frame,
    TileClicked(FileId),
    ModifiersChanged(Modifiers),
    Key(KeyAction),
    NextFilter,
    ZoomChanged(f32),
    ZoomReleased,
    SetViewMode(ViewMode),
    CloseViewport,
    Next,
    Previous,
}

impl MediaReview {
    fn new(args: Args, mut settings: Settings) -> (Self, Task<Message>) {
        if let Some(tile_size) = args.tile_size {
            settings.tile_size = tile_size.clamp(MIN_TILE_SIZE, MAX_TILE_SIZE);
        }

        let mut grid = TileManager::new(settings.scroll_config());
        grid.on_resize(INITIAL_WINDOW.width, INITIAL_WINDOW.height - TOOLBAR_HEIGHT);
        let mut viewport = ViewportController::with_view_mode(settings.default_view_mode);
        viewport.on_resize(INITIAL_WINDOW.width, INITIAL_WINDOW.height - TOOLBAR_HEIGHT);

        let source = args.path.or_else(|| settings.last_source.clone());
        let (status, task) = match source {
            Some(path) => (format!("Opening {}...", path.display()), open_library(path)),
            None => ("Open a folder or an export to start.".to_string(), Task::none()),
        };

        (
            MediaReview {
                settings,
                grid,
                viewport,
                session: ReviewSession::default(),
                modifiers: Modifiers::default(),
                anchor: None,
                status,
            },
            task,
        )
    }

    fn title(&self) -> String {
        match &self.settings.last_source {
            Some(path) if !self.session.is_empty() => format!("Media Review - {}", path.display()),
            _ => "Media Review".to_string(),
        }
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenFolder => {
                // Show the native folder picker dialog
                let folder = FileDialog::new().set_title("Select Image Folder").pick_folder();
                match folder {
                    Some(path) => {
                        self.status = format!("Scanning {}...", path.display());
                        // Scan on a blocking thread, the result comes back as LibraryLoaded
                        open_library(path)
                    }
                    None => Task::none(),
                }
            }
            Message::OpenExport => {
                let export = FileDialog::new()
                    .set_title("Select File Export")
                    .add_filter("JSON export", &["json"])
                    .pick_file();
                match export {
                    Some(path) => {
                        self.status = format!("Opening {}...", path.display());
                        open_library(path)
                    }
                    None => Task::none(),
                }
            }
            Message::LibraryLoaded(Ok(library)) => self.load_library(library),
            Message::LibraryLoaded(Err(err)) => {
                log::error!("Error opening library: {}", err);
                self.status = format!("⚠️  {}", err);
                Task::none()
            }
            Message::GridScrolled(viewport) => {
                // The scrollable reports its own bounds; padding eats one gap on each side
                let bounds = viewport.bounds();
                let gap = self.grid.virtual_scroll().config().gap;
                let width = (bounds.width - 2.0 * gap).max(0.0);
                // Only re-layout when the width really changed
                if (width - self.grid.virtual_scroll().container_width()).abs() > 0.5 {
                    self.grid.on_resize(width, bounds.height);
                }
                self.grid.on_scroll(viewport.absolute_offset().y, bounds.height);
                Task::none()
            }
            Message::WindowResized(size) => {
                // The toolbar sits above the grid and the lightbox
                let gap = self.grid.virtual_scroll().config().gap;
                let height = (size.height - TOOLBAR_HEIGHT).max(0.0);
                self.grid.on_resize((size.width - 2.0 * gap).max(0.0), height);
                self.viewport.on_resize(size.width, height);
                Task::none()
            }
            Message::Frame => {
                // At most one window pass per frame, however many scroll events came in
                if let Some(pass) = self.grid.on_animation_frame() {
                    log::trace!(
                        "Window {:?}: +{} -{} ({} live, {} pooled)",
                        pass.range,
                        pass.materialized,
                        pass.recycled,
                        self.grid.size(),
                        self.grid.pooled_elements()
                    );
                }
                Task::none()
            }
            Message::TileClicked(id) => {
                self.click_tile(id);
                Task::none()
            }
            Message::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers;
                Task::none()
            }
            Message::Key(action) => self.handle_key(action),
            Message::NextFilter => self.apply_filter(self.session.filter().cycle()),
            Message::ZoomChanged(size) => {
                // Column count and tile tiers follow on the next frame
                self.settings.tile_size = size;
                self.grid.set_tile_size(size);
                Task::none()
            }
            Message::ZoomReleased => {
                // Persist once the slider is let go, not on every step
                self.store_settings();
                Task::none()
            }
            Message::SetViewMode(mode) => {
                self.viewport.set_view_mode(&mut self.grid, mode);
                Task::none()
            }
            Message::CloseViewport => self.close_viewport(),
            Message::Next => {
                self.viewport.next(&mut self.grid);
                Task::none()
            }
            Message::Previous => {
                self.viewport.previous(&mut self.grid);
                Task::none()
            }
        }
    }

    fn load_library(&mut self, library: Library) -> Task<Message> {
        // Point the asset mounts at the folders next to the source
        match library.source() {
            LibrarySource::Folder(path) => {
                self.settings.uploads_dir = Some(path.clone());
                self.settings.last_source = Some(path.clone());
            }
            LibrarySource::Export(path) => {
                if let Some(parent) = path.parent() {
                    let uploads = parent.join("uploads");
                    if uploads.is_dir() {
                        self.settings.uploads_dir = Some(uploads);
                    }
                    let thumbnails = parent.join("storage").join("thumbnails");
                    if thumbnails.is_dir() {
                        self.settings.thumbnails_dir = Some(thumbnails);
                    }
                }
                self.settings.last_source = Some(path.clone());
            }
        }
        self.store_settings();

        // Nothing of the previous library survives
        if self.viewport.is_active() {
            self.viewport.exit(&mut self.grid);
        }
        self.grid.clear();
        self.anchor = None;
        self.session = ReviewSession::new(library.into_files());
        self.status = format!("{} files", self.session.len());

        // A new library starts unfiltered, with an empty selection
        self.grid.render_files(self.session.matching(), Some(Default::default()));

        // Back to the top of the new grid
        self.grid.on_scroll(0.0, self.grid.virtual_scroll().client_height());
        scrollable::scroll_to(ui::grid_view::grid_id(), AbsoluteOffset { x: 0.0, y: 0.0 })
    }

    /// Switch filters and start again from the top of the grid
    fn apply_filter(&mut self, filter: ReviewFilter) -> Task<Message> {
        // The lightbox follows the new order, the selection survives
        let shown = self.session.set_filter(filter, &mut self.grid, &mut self.viewport);
        self.status = format!("{}: {} of {} files", filter.label(), shown, self.session.len());

        self.grid.on_scroll(0.0, self.grid.virtual_scroll().client_height());
        scrollable::scroll_to(ui::grid_view::grid_id(), AbsoluteOffset { x: 0.0, y: 0.0 })
    }

    fn click_tile(&mut self, id: FileId) {
        if self.viewport.is_active() {
            self.viewport.go_to_file(&mut self.grid, id);
            return;
        }

        if self.modifiers.shift() {
            if let Some(anchor) = self.anchor {
                self.grid.select_range(anchor, id, true);
                return;
            }
        }
        self.anchor = Some(id);

        if self.modifiers.command() {
            self.grid.toggle_selected(id);
        } else {
            self.viewport.enter(&mut self.grid, id, None);
        }
    }

    /// Close the lightbox and scroll the grid to the file viewed last
    fn close_viewport(&mut self) -> Task<Message> {
        let Some(last) = self.viewport.exit(&mut self.grid) else {
            return Task::none();
        };
        let Some(index) = self.grid.get_file_index(last) else {
            return Task::none();
        };

        let scroll = self.grid.virtual_scroll();
        let y = scroll.scroll_offset_for_index(index);
        let client_height = scroll.client_height();
        self.grid.on_scroll(y, client_height);
        scrollable::scroll_to(ui::grid_view::grid_id(), AbsoluteOffset { x: 0.0, y })
    }

    fn handle_key(&mut self, action: KeyAction) -> Task<Message> {
        let grid = &mut self.grid;
        match action {
            KeyAction::Next => {
                self.viewport.next(grid);
            }
            KeyAction::Previous => {
                self.viewport.previous(grid);
            }
            KeyAction::First => {
                self.viewport.go_to_first(grid);
            }
            KeyAction::Last => {
                self.viewport.go_to_last(grid);
            }
            KeyAction::Close => {
                if self.viewport.is_active() {
                    return self.close_viewport();
                }
                grid.clear_selection();
            }
            KeyAction::CycleViewMode => {
                self.viewport.cycle_view_mode(grid);
            }
            KeyAction::ToggleSelected => {
                if let Some(id) = self.viewport.get_current_file_id().or(self.anchor) {
                    grid.toggle_selected(id);
                }
            }
            KeyAction::SelectAll => grid.select_all(),
            KeyAction::CycleFilter => return self.apply_filter(self.session.filter().cycle()),
            KeyAction::ToggleDiscarded => {
                let targets = self.review_targets();
                let discard = targets
                    .iter()
                    .any(|id| self.grid.get_file(*id).is_some_and(|file| !file.discarded));
                let patches: Vec<FilePatch> = targets
                    .into_iter()
                    .map(|id| FilePatch::new(id).discarded(discard))
                    .collect();
                self.apply_patches(&patches);
            }
            KeyAction::MarkReviewed => {
                let now = Utc::now();
                let patches: Vec<FilePatch> = self
                    .review_targets()
                    .into_iter()
                    .map(|id| FilePatch::new(id).reviewed_at(Some(now)))
                    .collect();
                self.apply_patches(&patches);
            }
        }
        Task::none()
    }

    /// The viewed file in the lightbox, the selection in the grid
    fn review_targets(&self) -> Vec<FileId> {
        match self.viewport.get_current_file_id() {
            Some(id) if self.viewport.is_active() => vec![id],
            _ => self.grid.get_selected_file_ids(),
        }
    }

    fn apply_patches(&mut self, patches: &[FilePatch]) {
        if patches.is_empty() {
            return;
        }
        // Files leaving the active filter drop out of grid and lightbox;
        // the scroll position stays where it is
        let updated = self.session.review(patches, &mut self.grid, &mut self.viewport);
        log::info!("✏️  Updated {} files", updated);
        self.status = format!("Updated {} files", updated);
    }

    fn store_settings(&self) {
        if let Err(err) = self.settings.store() {
            log::error!("Error storing settings: {}", err);
        }
    }

    fn view(&self) -> Element<Message> {
        if self.viewport.is_active() {
            return ui::lightbox::view(&self.viewport, &self.grid, &self.settings);
        }

        let selected = self.grid.selected_count();
        let summary = if selected > 0 {
            format!("{} · {} selected", self.status, selected)
        } else {
            self.status.clone()
        };

        let toolbar = row![
            button("Open Folder").on_press(Message::OpenFolder),
            button("Open Export").on_press(Message::OpenExport),
            button(text(format!("Filter: {}", self.session.filter().label()))).on_press(Message::NextFilter),
            text(summary).size(14),
            Space::with_width(Length::Fill),
            text("Zoom").size(14),
            slider(MIN_TILE_SIZE..=MAX_TILE_SIZE, self.settings.tile_size, Message::ZoomChanged)
                .on_release(Message::ZoomReleased)
                .width(160.0),
        ]
        .spacing(10)
        .padding(8)
        .height(TOOLBAR_HEIGHT)
        .align_y(Alignment::Center);

        column![toolbar, ui::grid_view::view(&self.grid, &self.settings)]
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![
            keyboard::on_key_press(ui::keys::on_key_press),
            event::listen_with(|event, _status, _window| match event {
                Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                    Some(Message::ModifiersChanged(modifiers))
                }
                Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized(size)),
                _ => None,
            }),
        ];
        if self.grid.virtual_scroll().is_pending() {
            subscriptions.push(window::frames().map(|_| Message::Frame));
        }
        Subscription::batch(subscriptions)
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn open_library(path: PathBuf) -> Task<Message> {
    Task::perform(Library::open_async(path), |result| {
        Message::LibraryLoaded(result.map_err(|err| err.to_string()))
    })
}

/// File logger in the config directory, warnings also go to stderr
fn start_logger() -> Option<LoggerHandle> {
    let log_dir = Settings::log_dir()?;
    let logger = Logger::try_with_env_or_str("info, iced=error, wgpu_hal=error, wgpu_core=error")
        .ok()?
        .log_to_file(
            FileSpec::default()
                .directory(&log_dir)
                .basename("media-review")
                .suffix("log")
                .suppress_timestamp(),
        )
        .rotate(Criterion::Size(256 * 1024), Naming::Numbers, Cleanup::KeepLogFiles(3))
        .duplicate_to_stderr(Duplicate::Warn);

    match logger.start() {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Failed to start logger: {}", err);
            None
        }
    }
}

fn main() -> iced::Result {
    let args = Args::parse();

    let _logger = start_logger();
    if _logger.is_none() {
        eprintln!("Failed to create log file");
    }
    log::info!("Starting Media Review {}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load();

    let result = iced::application(MediaReview::title, MediaReview::update, MediaReview::view)
        .subscription(MediaReview::subscription)
        .theme(MediaReview::theme)
        .window_size(INITIAL_WINDOW)
        .centered()
        .run_with(move || MediaReview::new(args, settings));

    log::info!("Shutting down.");
    result
}
