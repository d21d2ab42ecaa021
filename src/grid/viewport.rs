//! Focused single-item view (the lightbox)
//!
//! The controller owns only navigation state. Tiles live in the grid's
//! arena; the controller borrows the grid for every operation that touches
//! them, pauses recycling while it is open and exempts the tiles it shows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::grid::tile::{Position, Resolution};
use crate::grid::tile_manager::TileManager;
use crate::state::data::FileId;

/// Space between the two compare panes
const COMPARE_GAP: f32 = 16.0;

/// How the focused viewport presents its items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Two items side by side
    Compare,
    /// One item with its neighbours peeking in
    #[default]
    Carousel,
    /// One item filling the window
    Fullscreen,
}

impl ViewMode {
    /// Cycling order
    pub const ALL: [ViewMode; 3] = [ViewMode::Compare, ViewMode::Carousel, ViewMode::Fullscreen];

    /// Container class marking the mode. Carousel is the implicit default.
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            ViewMode::Compare => Some("compare-mode"),
            ViewMode::Carousel => None,
            ViewMode::Fullscreen => Some("fullscreen-mode"),
        }
    }

    /// Next mode in `ALL`, wrapping around
    pub fn next(&self) -> ViewMode {
        let index = Self::ALL.iter().position(|mode| mode == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Compare => "compare",
            ViewMode::Carousel => "carousel",
            ViewMode::Fullscreen => "fullscreen",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compare" => Ok(ViewMode::Compare),
            "carousel" => Ok(ViewMode::Carousel),
            "fullscreen" => Ok(ViewMode::Fullscreen),
            _ => Err(()),
        }
    }
}

/// Side-by-side geometry used by compare mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompareLayout {
    pub left: FileId,
    pub right: Option<FileId>,
    pub pane_width: f32,
    pub pane_height: f32,
}

/// Snapshot for the position readout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewportState {
    pub is_active: bool,
    pub current_index: usize,
    pub current_file_id: Option<FileId>,
    pub total: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Default)]
pub struct ViewportController {
    is_active: bool,
    is_transitioning: bool,
    navigation_files: Vec<FileId>,
    current_index: usize,
    view_mode: ViewMode,
    marker: Option<&'static str>,
    /// Tiles this controller positioned and exempted last
    focused: Vec<FileId>,
    viewport_size: (f32, f32),
    /// Installed while in compare mode; follows `on_resize`
    compare_layout: Option<CompareLayout>,
    compare_installed: bool,
}

impl ViewportController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start in `mode` instead of carousel
    pub fn with_view_mode(mode: ViewMode) -> Self {
        Self {
            view_mode: mode,
            marker: mode.marker(),
            compare_installed: mode == ViewMode::Compare,
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_transitioning(&self) -> bool {
        self.is_transitioning
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn marker(&self) -> Option<&'static str> {
        self.marker
    }

    pub fn navigation_files(&self) -> &[FileId] {
        &self.navigation_files
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn compare_layout(&self) -> Option<CompareLayout> {
        self.compare_layout
    }

    /// Open the viewport on `id`.
    ///
    /// `subset` restricts navigation (e.g. to the current filter); without it
    /// the whole grid order is used. Returns false if already open or if `id`
    /// is not part of the navigation set.
    pub fn enter(&mut self, grid: &mut TileManager, id: FileId, subset: Option<Vec<FileId>>) -> bool {
        if self.is_active || self.is_transitioning {
            return false;
        }

        let files = subset.unwrap_or_else(|| grid.get_file_order().to_vec());
        let Some(index) = files.iter().position(|candidate| *candidate == id) else {
            log::warn!("Cannot open viewport on {}: not in the navigation set", id);
            return false;
        };

        self.is_transitioning = true;
        self.navigation_files = files;
        self.current_index = index;
        self.is_active = true;

        grid.virtual_scroll_mut().pause();
        self.apply_position(grid);

        self.is_transitioning = false;
        log::info!(
            "🔍 Viewport opened on {} ({}/{}, {})",
            id,
            index + 1,
            self.navigation_files.len(),
            self.view_mode
        );
        true
    }

    /// Close the viewport and hand the tiles back to the grid.
    /// Returns the id that was being viewed.
    pub fn exit(&mut self, grid: &mut TileManager) -> Option<FileId> {
        if !self.is_active || self.is_transitioning {
            return None;
        }

        self.is_transitioning = true;
        let last_viewed = self.get_current_file_id();
        self.is_active = false;

        let vsm = grid.virtual_scroll_mut();
        vsm.resume();
        vsm.clear_exemptions();
        grid.reset_to_grid();

        self.focused.clear();
        self.compare_layout = None;
        self.navigation_files.clear();
        self.current_index = 0;

        self.is_transitioning = false;
        log::info!("Viewport closed");
        last_viewed
    }

    pub fn next(&mut self, grid: &mut TileManager) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current_index += 1;
        self.apply_position(grid);
        true
    }

    pub fn previous(&mut self, grid: &mut TileManager) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.current_index -= 1;
        self.apply_position(grid);
        true
    }

    pub fn go_to_file(&mut self, grid: &mut TileManager, id: FileId) -> bool {
        if !self.is_active {
            return false;
        }
        match self.navigation_files.iter().position(|candidate| *candidate == id) {
            Some(index) => self.go_to_index(grid, index),
            None => false,
        }
    }

    pub fn go_to_index(&mut self, grid: &mut TileManager, index: usize) -> bool {
        if !self.is_active || index >= self.navigation_files.len() {
            return false;
        }
        self.current_index = index;
        self.apply_position(grid);
        true
    }

    pub fn go_to_first(&mut self, grid: &mut TileManager) -> bool {
        self.go_to_index(grid, 0)
    }

    pub fn go_to_last(&mut self, grid: &mut TileManager) -> bool {
        match self.navigation_files.len().checked_sub(1) {
            Some(last) => self.go_to_index(grid, last),
            None => false,
        }
    }

    /// Replace the navigation set, e.g. after a filter change.
    ///
    /// The viewed file keeps being viewed at its new index if it is still in
    /// the set; otherwise the first file is shown. An empty set closes the
    /// viewport.
    pub fn update_navigation_set(&mut self, grid: &mut TileManager, new_ids: Vec<FileId>) {
        if new_ids.is_empty() {
            self.navigation_files.clear();
            self.current_index = 0;
            if self.is_active {
                log::debug!("Navigation set emptied, closing viewport");
                self.exit(grid);
            }
            return;
        }

        let viewed = self.get_current_file_id();
        self.current_index = viewed
            .and_then(|id| new_ids.iter().position(|candidate| *candidate == id))
            .unwrap_or(0);
        self.navigation_files = new_ids;

        if self.is_active {
            self.apply_position(grid);
        }
    }

    /// Switch presentation mode
    pub fn set_view_mode(&mut self, grid: &mut TileManager, mode: ViewMode) {
        if mode == self.view_mode {
            return;
        }

        if self.view_mode == ViewMode::Compare {
            self.compare_installed = false;
            self.compare_layout = None;
        }

        self.marker = mode.marker();
        self.view_mode = mode;

        if mode == ViewMode::Compare {
            for id in &self.focused {
                if let Some(tile) = grid.get_tile_mut(*id) {
                    if tile.has_full_res_source() {
                        tile.set_resolution(Resolution::Full);
                    }
                }
            }
            self.compare_installed = true;
            self.relayout_compare();
        }
        log::debug!("View mode: {}", mode);
    }

    /// `set_view_mode` by name; unknown names are ignored
    pub fn set_view_mode_named(&mut self, grid: &mut TileManager, name: &str) -> bool {
        match name.parse::<ViewMode>() {
            Ok(mode) => {
                self.set_view_mode(grid, mode);
                true
            }
            Err(()) => {
                log::warn!("Ignoring unknown view mode {:?}", name);
                false
            }
        }
    }

    pub fn cycle_view_mode(&mut self, grid: &mut TileManager) -> ViewMode {
        let next = self.view_mode.next();
        self.set_view_mode(grid, next);
        next
    }

    /// Window size changed
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.viewport_size = (width.max(0.0), height.max(0.0));
        if self.compare_installed {
            self.relayout_compare();
        }
    }

    pub fn get_current_file_id(&self) -> Option<FileId> {
        self.navigation_files.get(self.current_index).copied()
    }

    pub fn has_next(&self) -> bool {
        self.is_active && self.current_index + 1 < self.navigation_files.len()
    }

    pub fn has_prev(&self) -> bool {
        self.is_active && self.current_index > 0
    }

    pub fn get_state(&self) -> ViewportState {
        ViewportState {
            is_active: self.is_active,
            current_index: self.current_index,
            current_file_id: self.get_current_file_id(),
            total: self.navigation_files.len(),
            has_next: self.has_next(),
            has_prev: self.has_prev(),
        }
    }

    /// "n / total" readout
    pub fn position_label(&self) -> String {
        if self.navigation_files.is_empty() {
            return String::new();
        }
        format!("{} / {}", self.current_index + 1, self.navigation_files.len())
    }

    /// Previous, current and next ids around the current index
    fn involved_ids(&self) -> Vec<FileId> {
        let start = self.current_index.saturating_sub(1);
        let end = (self.current_index + 2).min(self.navigation_files.len());
        self.navigation_files[start..end].to_vec()
    }

    fn apply_position(&mut self, grid: &mut TileManager) {
        let Some(current) = self.get_current_file_id() else {
            return;
        };
        let involved = self.involved_ids();

        // Tiles focused by the previous step may have left the set
        for id in self.focused.iter().filter(|id| !involved.contains(*id)) {
            if let Some(tile) = grid.get_tile_mut(*id) {
                if tile.position().is_focused() {
                    tile.set_position(Position::Grid);
                }
            }
        }

        grid.setup_viewport(current, &self.navigation_files);

        let vsm = grid.virtual_scroll_mut();
        vsm.clear_exemptions();
        vsm.exempt_from_recycling(involved.iter().copied());

        let tile_size = grid.virtual_scroll().config().tile_size;
        for id in &involved {
            if let Some(tile) = grid.get_tile_mut(*id) {
                tile.update_resolution(tile_size);
            }
        }

        self.focused = involved;
        if self.compare_installed {
            self.relayout_compare();
        }
    }

    fn relayout_compare(&mut self) {
        let Some(left) = self.get_current_file_id().filter(|_| self.is_active) else {
            self.compare_layout = None;
            return;
        };

        let right = if self.current_index + 1 < self.navigation_files.len() {
            Some(self.navigation_files[self.current_index + 1])
        } else if self.current_index > 0 {
            Some(self.navigation_files[self.current_index - 1])
        } else {
            None
        };

        let (width, height) = self.viewport_size;
        let pane_width = if right.is_some() {
            ((width - COMPARE_GAP) / 2.0).max(0.0)
        } else {
            width
        };

        self.compare_layout = Some(CompareLayout {
            left,
            right,
            pane_width,
            pane_height: height,
        });
    }
}
