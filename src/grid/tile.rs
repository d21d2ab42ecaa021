//! Per-file view state
//!
//! A `Tile` binds one file record to one `TileElement`, the render node the
//! UI draws. Tiles are created on demand by the grid (windowing) or by the
//! focused viewport, and are destroyed or recycled when they leave the window.

use std::fmt;
use std::rc::Rc;

use crate::grid::assets::{thumbnail_src_or_placeholder, upload_src};
use crate::grid::virtual_scroll::GridPosition;
use crate::state::data::{FileId, FileRecord};

/// Observed on-screen size (px) from which a grid tile switches to the full-resolution source
pub const FULL_RES_THRESHOLD: f32 = 180.0;

/// Base class token carried by every tile
pub const BASE_CLASS: &str = "tile";

/// Where a tile currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    /// Regular cell in the thumbnail grid
    #[default]
    Grid,
    /// The item shown by the focused viewport
    Current,
    /// Immediate predecessor of the current item
    Prev,
    /// Immediate successor of the current item
    Next,
    /// Not displayed at all
    Hidden,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Grid => "grid",
            Position::Current => "current",
            Position::Prev => "prev",
            Position::Next => "next",
            Position::Hidden => "hidden",
        }
    }

    /// Part of the focused viewport (current, prev or next)
    pub fn is_focused(&self) -> bool {
        matches!(self, Position::Current | Position::Prev | Position::Next)
    }
}

/// Level of detail of the displayed asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Resolution {
    #[default]
    Thumbnail,
    Full,
}

/// Called with `(tile, new_tier, old_tier)` whenever a tile changes tier
pub type ResolutionHook = Rc<dyn Fn(&Tile, Resolution, Resolution)>;

/// The render node owned by a tile.
///
/// Elements outlive tiles: when a tile is recycled its element goes back to
/// the pool and is rebound to whichever file becomes visible next.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TileElement {
    /// File currently bound to this element (None while pooled)
    pub file_id: Option<FileId>,
    pub class_name: String,
    /// Mount path of the displayed image
    pub src: String,
    /// Escaped file name for the image caption
    pub alt: String,
    /// Position attribute mirrored from the tile
    pub position: Position,
    /// Cell in the grid, assigned by the windowing pass
    pub grid_area: Option<GridPosition>,
    /// Bumped whenever `src` changes; loads for older generations are stale
    pub load_generation: u64,
    /// Last generation reported as loaded
    pub loaded_generation: Option<u64>,
}

impl TileElement {
    /// Drop the binding but keep the allocation around for reuse
    pub fn unbind(&mut self) {
        self.file_id = None;
        self.class_name.clear();
        self.src.clear();
        self.alt.clear();
        self.position = Position::Grid;
        self.grid_area = None;
        self.loaded_generation = None;
    }

    /// Whether the image for the current source has finished loading
    pub fn is_loaded(&self) -> bool {
        self.loaded_generation == Some(self.load_generation)
    }
}

type ClassRule = (fn(&Tile) -> bool, &'static str);

fn is_selected(tile: &Tile) -> bool {
    tile.selected
}

fn is_discarded(tile: &Tile) -> bool {
    tile.file.discarded
}

fn is_reviewed(tile: &Tile) -> bool {
    tile.file.reviewed_at.is_some()
}

fn is_duplicate(tile: &Tile) -> bool {
    tile.file.is_duplicate
}

fn is_similar(tile: &Tile) -> bool {
    tile.file.is_similar
}

/// Conditional class tokens, appended after the base token in this order
const CLASS_RULES: &[ClassRule] = &[
    (is_selected, "selected"),
    (is_discarded, "discarded"),
    (is_reviewed, "reviewed"),
    (is_duplicate, "duplicate-group"),
    (is_similar, "similar-group"),
];

/// View state for one file record
pub struct Tile {
    id: FileId,
    file: Rc<FileRecord>,
    element: TileElement,
    position: Position,
    resolution: Resolution,
    selected: bool,
    on_resolution_change: Option<ResolutionHook>,
}

impl Tile {
    /// Bind `file` to `element` (a fresh one or one taken from the pool)
    pub fn new(file: Rc<FileRecord>, mut element: TileElement, selected: bool) -> Self {
        element.unbind();
        element.file_id = Some(file.id);

        let mut tile = Self {
            id: file.id,
            file,
            element,
            position: Position::Grid,
            resolution: Resolution::Thumbnail,
            selected,
            on_resolution_change: None,
        };
        tile.element.alt = escape_html(Some(&tile.file.original_filename));
        tile.bind_source();
        tile.element.class_name = tile.build_class_name();
        tile
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn file(&self) -> &FileRecord {
        &self.file
    }

    pub fn element(&self) -> &TileElement {
        &self.element
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_resolution_hook(&mut self, hook: Option<ResolutionHook>) {
        self.on_resolution_change = hook;
    }

    /// Thumbnail mount path, or the placeholder
    pub fn get_thumbnail_src(&self) -> String {
        thumbnail_src_or_placeholder(self.file.thumbnail_path.as_deref())
    }

    /// Original mount path, falling back to the thumbnail
    pub fn get_full_res_src(&self) -> String {
        upload_src(self.file.original_path.as_deref()).unwrap_or_else(|| self.get_thumbnail_src())
    }

    pub fn has_full_res_source(&self) -> bool {
        self.file
            .original_path
            .as_deref()
            .is_some_and(|path| !path.is_empty())
    }

    /// Escaped file name, safe to drop into markup
    pub fn alt_text(&self) -> &str {
        &self.element.alt
    }

    /// Switch tiers. Returns false if `tier` was already current.
    pub fn set_resolution(&mut self, tier: Resolution) -> bool {
        if self.resolution == tier {
            return false;
        }

        let old = self.resolution;
        self.resolution = tier;
        self.bind_source();

        if let Some(hook) = self.on_resolution_change.clone() {
            hook(self, tier, old);
        }
        true
    }

    /// Pick the tier for a tile drawn `observed_px` wide.
    ///
    /// Tiles without an original stay thumbnails; tiles inside the focused
    /// viewport always go full; grid tiles go full once they are drawn at
    /// least `FULL_RES_THRESHOLD` pixels wide.
    pub fn update_resolution(&mut self, observed_px: f32) -> Resolution {
        let tier = if !self.has_full_res_source() {
            Resolution::Thumbnail
        } else if self.position.is_focused() || observed_px >= FULL_RES_THRESHOLD {
            Resolution::Full
        } else {
            Resolution::Thumbnail
        };
        self.set_resolution(tier);
        self.resolution
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
        self.element.position = position;
    }

    pub fn set_selected(&mut self, selected: bool) {
        if self.selected != selected {
            self.selected = selected;
            self.element.class_name = self.build_class_name();
        }
    }

    pub(crate) fn set_grid_area(&mut self, area: Option<GridPosition>) {
        self.element.grid_area = area;
    }

    /// Rebind an updated record; the displayed source follows the new paths
    pub fn refresh(&mut self, file: Rc<FileRecord>) {
        self.file = file;
        self.element.alt = escape_html(Some(&self.file.original_filename));
        self.element.class_name = self.build_class_name();

        // The original went away: drop back to the thumbnail tier
        if self.resolution == Resolution::Full && !self.has_full_res_source() {
            self.set_resolution(Resolution::Thumbnail);
            return;
        }

        let src = self.src_for(self.resolution);
        if src != self.element.src {
            self.element.src = src;
            self.element.load_generation += 1;
        }
    }

    /// Record that the image for `generation` finished loading.
    /// Returns false if a later source superseded it.
    pub fn complete_load(&mut self, generation: u64) -> bool {
        if generation != self.element.load_generation {
            log::debug!(
                "Ignoring stale load for tile {} (generation {} < {})",
                self.id,
                generation,
                self.element.load_generation
            );
            return false;
        }
        self.element.loaded_generation = Some(generation);
        true
    }

    /// Base token followed by every matching state token, in table order
    pub fn build_class_name(&self) -> String {
        let mut class_name = String::from(BASE_CLASS);
        for (applies, token) in CLASS_RULES {
            if applies(self) {
                class_name.push(' ');
                class_name.push_str(token);
            }
        }
        class_name
    }

    /// Whether the current class name carries `token`
    pub fn has_class(&self, token: &str) -> bool {
        self.element.class_name.split(' ').any(|t| t == token)
    }

    /// Give up the element so it can be pooled
    pub fn into_element(mut self) -> TileElement {
        self.element.unbind();
        self.element
    }

    fn src_for(&self, tier: Resolution) -> String {
        match tier {
            Resolution::Thumbnail => self.get_thumbnail_src(),
            Resolution::Full => self.get_full_res_src(),
        }
    }

    fn bind_source(&mut self) {
        self.element.src = self.src_for(self.resolution);
        self.element.load_generation += 1;
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tile")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("resolution", &self.resolution)
            .field("selected", &self.selected)
            .finish()
    }
}

/// Escape file-supplied text before it is interpolated into markup
pub fn escape_html(value: Option<&str>) -> String {
    let Some(value) = value else {
        return String::new();
    };

    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
