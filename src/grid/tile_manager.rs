//! File store, selection and tile lifecycle for one grid
//!
//! The `TileManager` keeps the ordered records, the selection set and the
//! arena of materialized tiles keyed by file id. Deciding *which* tiles
//! should exist is delegated to the `VirtualScrollManager`; the focused
//! viewport positions tiles through `setup_viewport`.

use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::rc::Rc;

use crate::grid::tile::{Position, ResolutionHook, Tile, TileElement};
use crate::grid::virtual_scroll::{VirtualScrollConfig, VirtualScrollManager};
use crate::state::data::{FileId, FilePatch, FileRecord};

/// Spare elements kept around for rebinding
const ELEMENT_POOL_LIMIT: usize = 256;

/// Outcome of one materialize/recycle pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowPass {
    pub range: Range<usize>,
    pub materialized: usize,
    pub recycled: usize,
}

pub struct TileManager {
    files: HashMap<FileId, Rc<FileRecord>>,
    file_order: Vec<FileId>,
    index_of: HashMap<FileId, usize>,
    selected_ids: HashSet<FileId>,
    tiles: HashMap<FileId, Tile>,
    element_pool: Vec<TileElement>,
    virtual_scroll: VirtualScrollManager,
    resolution_hook: Option<ResolutionHook>,
}

impl TileManager {
    pub fn new(config: VirtualScrollConfig) -> Self {
        Self {
            files: HashMap::new(),
            file_order: Vec::new(),
            index_of: HashMap::new(),
            selected_ids: HashSet::new(),
            tiles: HashMap::new(),
            element_pool: Vec::new(),
            virtual_scroll: VirtualScrollManager::new(config),
            resolution_hook: None,
        }
    }

    pub fn virtual_scroll(&self) -> &VirtualScrollManager {
        &self.virtual_scroll
    }

    pub fn virtual_scroll_mut(&mut self) -> &mut VirtualScrollManager {
        &mut self.virtual_scroll
    }

    // ========== Store ==========

    /// Replace the store and order in one step.
    ///
    /// A repeated id keeps its first position but takes the last record.
    /// `selected_ids`, if given, replaces the current selection.
    pub fn render_files<I>(&mut self, records: I, selected_ids: Option<HashSet<FileId>>)
    where
        I: IntoIterator<Item = FileRecord>,
    {
        self.destroy_tiles();
        self.files.clear();
        self.file_order.clear();
        self.index_of.clear();

        for record in records {
            let id = record.id;
            if self.files.insert(id, Rc::new(record)).is_none() {
                self.index_of.insert(id, self.file_order.len());
                self.file_order.push(id);
            } else {
                log::debug!("Duplicate file id {} in render, keeping the last record", id);
            }
        }

        if let Some(selected) = selected_ids {
            self.selected_ids = selected;
        }

        log::info!(
            "🖼️  Rendering {} files ({} selected)",
            self.file_order.len(),
            self.selected_count()
        );
        self.virtual_scroll.set_file_count(self.file_order.len());
    }

    /// Merge partial records into known files. Unknown ids are ignored.
    /// Returns how many records were updated.
    pub fn update_files(&mut self, patches: &[FilePatch]) -> usize {
        let mut updated = 0;
        for patch in patches {
            let Some(current) = self.files.get(&patch.id) else {
                log::debug!("Ignoring update for unknown file {}", patch.id);
                continue;
            };

            let mut record = FileRecord::clone(current);
            record.apply(patch);
            record.id = patch.id;
            let record = Rc::new(record);

            if let Some(tile) = self.tiles.get_mut(&patch.id) {
                tile.refresh(record.clone());
            }
            self.files.insert(patch.id, record);
            updated += 1;
        }
        updated
    }

    pub fn get_file(&self, id: FileId) -> Option<&FileRecord> {
        self.files.get(&id).map(|file| file.as_ref())
    }

    /// Position of `id` in the display order
    pub fn get_file_index(&self, id: FileId) -> Option<usize> {
        self.index_of.get(&id).copied()
    }

    /// Every record, in display order
    pub fn get_all_files(&self) -> Vec<&FileRecord> {
        self.file_order
            .iter()
            .filter_map(|id| self.get_file(*id))
            .collect()
    }

    pub fn get_file_order(&self) -> &[FileId] {
        &self.file_order
    }

    pub fn file_count(&self) -> usize {
        self.file_order.len()
    }

    /// Ids matching `predicate`, in display order
    pub fn get_navigable_files<P>(&self, predicate: P) -> Vec<FileId>
    where
        P: Fn(&FileRecord) -> bool,
    {
        self.file_order
            .iter()
            .copied()
            .filter(|id| self.files.get(id).is_some_and(|file| predicate(file.as_ref())))
            .collect()
    }

    // ========== Selection ==========

    /// Select or deselect one id, materialized or not
    pub fn set_selected(&mut self, id: FileId, selected: bool) {
        if selected {
            self.selected_ids.insert(id);
        } else {
            self.selected_ids.remove(&id);
        }
        if let Some(tile) = self.tiles.get_mut(&id) {
            tile.set_selected(selected);
        }
    }

    pub fn set_multiple_selected<I>(&mut self, ids: I, selected: bool)
    where
        I: IntoIterator<Item = FileId>,
    {
        for id in ids {
            self.set_selected(id, selected);
        }
    }

    /// Flip one id; returns the new state
    pub fn toggle_selected(&mut self, id: FileId) -> bool {
        let selected = !self.is_selected(id);
        self.set_selected(id, selected);
        selected
    }

    pub fn is_selected(&self, id: FileId) -> bool {
        self.selected_ids.contains(&id)
    }

    /// Apply `selected` to every id between `anchor` and `to`, both included.
    /// Returns false if either id is not in the current order.
    pub fn select_range(&mut self, anchor: FileId, to: FileId, selected: bool) -> bool {
        let (Some(a), Some(b)) = (self.get_file_index(anchor), self.get_file_index(to)) else {
            return false;
        };
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        let ids: Vec<FileId> = self.file_order[start..=end].to_vec();
        self.set_multiple_selected(ids, selected);
        true
    }

    pub fn select_all(&mut self) {
        let ids = self.file_order.clone();
        self.set_multiple_selected(ids, true);
    }

    /// Selected ids that are in the current order, in that order
    pub fn get_selected_file_ids(&self) -> Vec<FileId> {
        self.file_order
            .iter()
            .copied()
            .filter(|id| self.selected_ids.contains(id))
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.file_order
            .iter()
            .filter(|id| self.selected_ids.contains(*id))
            .count()
    }

    /// Empty the selection; positions and resolutions stay as they are
    pub fn clear_selection(&mut self) {
        self.selected_ids.clear();
        for tile in self.tiles.values_mut() {
            tile.set_selected(false);
        }
    }

    // ========== Tiles ==========

    /// Hook installed on every tile from now on (and on the current ones)
    pub fn set_resolution_hook(&mut self, hook: Option<ResolutionHook>) {
        for tile in self.tiles.values_mut() {
            tile.set_resolution_hook(hook.clone());
        }
        self.resolution_hook = hook;
    }

    /// Existing tile for `id`, or a newly materialized one if `id` is known.
    /// Returns None for ids that are not in the store.
    pub fn ensure_tile(&mut self, id: FileId) -> Option<&mut Tile> {
        if !self.tiles.contains_key(&id) {
            let file = self.files.get(&id)?.clone();
            let element = self.element_pool.pop().unwrap_or_default();

            let mut tile = Tile::new(file, element, self.selected_ids.contains(&id));
            tile.set_resolution_hook(self.resolution_hook.clone());
            if let Some(index) = self.get_file_index(id) {
                tile.set_grid_area(Some(self.virtual_scroll.get_grid_position(index)));
            }
            self.tiles.insert(id, tile);
        }
        self.tiles.get_mut(&id)
    }

    pub fn get_tile(&self, id: FileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    pub fn get_tile_mut(&mut self, id: FileId) -> Option<&mut Tile> {
        self.tiles.get_mut(&id)
    }

    /// Destroy a tile and its element. Store and selection are untouched.
    pub fn remove_tile(&mut self, id: FileId) -> bool {
        self.tiles.remove(&id).is_some()
    }

    /// Drop a tile but keep its element for the next materialization
    pub fn recycle_tile(&mut self, id: FileId) -> bool {
        let Some(tile) = self.tiles.remove(&id) else {
            return false;
        };
        if self.element_pool.len() < ELEMENT_POOL_LIMIT {
            self.element_pool.push(tile.into_element());
        }
        true
    }

    /// Materialized tiles in display order
    pub fn visible_tiles(&self) -> Vec<&Tile> {
        let mut tiles: Vec<&Tile> = self.tiles.values().collect();
        tiles.sort_by_key(|tile| self.index_of.get(&tile.id()).copied().unwrap_or(usize::MAX));
        tiles
    }

    /// Number of materialized tiles
    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    pub fn pooled_elements(&self) -> usize {
        self.element_pool.len()
    }

    /// Full reset: tiles, store, order and selection
    pub fn clear(&mut self) {
        self.destroy_tiles();
        self.element_pool.clear();
        self.files.clear();
        self.file_order.clear();
        self.index_of.clear();
        self.selected_ids.clear();
        self.virtual_scroll.set_file_count(0);
    }

    /// Tear everything down, observers included
    pub fn destroy(&mut self) {
        self.virtual_scroll.destroy();
        self.destroy_tiles();
        self.element_pool.clear();
    }

    fn destroy_tiles(&mut self) {
        self.tiles.clear();
    }

    // ========== Positions ==========

    /// Mark `current_id` as current and its neighbours in `ordered_ids` as
    /// prev/next; every other id of `ordered_ids` goes back to the grid.
    /// Focused tiles are materialized if needed.
    pub fn setup_viewport(&mut self, current_id: FileId, ordered_ids: &[FileId]) {
        let current_index = ordered_ids.iter().position(|id| *id == current_id);

        for (index, id) in ordered_ids.iter().enumerate() {
            let position = match current_index {
                Some(current) if index == current => Position::Current,
                Some(current) if index + 1 == current => Position::Prev,
                Some(current) if index == current + 1 => Position::Next,
                _ => Position::Grid,
            };

            if position.is_focused() {
                if let Some(tile) = self.ensure_tile(*id) {
                    tile.set_position(position);
                }
            } else if let Some(tile) = self.tiles.get_mut(id) {
                tile.set_position(position);
            }
        }

        if current_index.is_none() {
            if let Some(tile) = self.ensure_tile(current_id) {
                tile.set_position(Position::Current);
            }
        }
    }

    pub fn reset_to_grid(&mut self) {
        self.set_all_positions(Position::Grid);
    }

    pub fn set_all_positions(&mut self, position: Position) {
        for tile in self.tiles.values_mut() {
            tile.set_position(position);
        }
    }

    // ========== Windowing ==========

    pub fn on_scroll(&mut self, scroll_top: f32, client_height: f32) {
        self.virtual_scroll.on_scroll(scroll_top, client_height);
    }

    pub fn on_resize(&mut self, container_width: f32, client_height: f32) {
        self.virtual_scroll.on_resize(container_width, client_height);
    }

    pub fn set_tile_size(&mut self, tile_size: f32) {
        self.virtual_scroll.set_tile_size(tile_size);
    }

    /// Run the pending window pass, at most one per animation frame
    pub fn on_animation_frame(&mut self) -> Option<WindowPass> {
        if !self.virtual_scroll.take_pending() {
            return None;
        }
        Some(self.run_window_pass())
    }

    /// Materialize the visible window and recycle what fell out of it
    pub fn run_window_pass(&mut self) -> WindowPass {
        let range = self.virtual_scroll.visible_range();
        let window: HashSet<FileId> = self.file_order[range.clone()].iter().copied().collect();

        // Recycle first so the freed elements serve the new rows
        let stale: Vec<FileId> = self
            .tiles
            .keys()
            .copied()
            .filter(|id| !window.contains(id) && self.virtual_scroll.is_recyclable(*id))
            .collect();
        let recycled = stale.len();
        for id in stale {
            self.recycle_tile(id);
        }

        // Materialize what scrolled into view
        let mut materialized = 0;
        for index in range.clone() {
            let id = self.file_order[index];
            if !self.tiles.contains_key(&id) {
                self.ensure_tile(id);
                materialized += 1;
            }
        }

        // Columns may have changed since the tiles were placed.
        // Focused tiles keep the tier the viewport gave them.
        let tile_size = self.virtual_scroll.config().tile_size;
        for tile in self.tiles.values_mut() {
            let area = self
                .index_of
                .get(&tile.id())
                .map(|index| self.virtual_scroll.get_grid_position(*index));
            tile.set_grid_area(area);
            if tile.position() == Position::Grid {
                tile.update_resolution(tile_size);
            }
        }

        log::debug!(
            "Window pass {:?}: +{} tiles, {} recycled, {} live",
            range,
            materialized,
            recycled,
            self.tiles.len()
        );

        WindowPass {
            range,
            materialized,
            recycled,
        }
    }
}

impl Default for TileManager {
    fn default() -> Self {
        Self::new(VirtualScrollConfig::default())
    }
}

impl std::fmt::Debug for TileManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileManager")
            .field("files", &self.file_order.len())
            .field("selected", &self.selected_ids.len())
            .field("tiles", &self.tiles.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tile::Resolution;

    fn ids(values: &[u64]) -> Vec<FileId> {
        values.iter().map(|v| FileId(*v)).collect()
    }

    fn records(values: &[u64]) -> Vec<FileRecord> {
        values
            .iter()
            .map(|id| {
                FileRecord::new(*id, format!("IMG_{id}.JPG"))
                    .with_thumbnail(format!("thumbnails/{id}.jpg"))
                    .with_original(format!("uploads/IMG_{id}.JPG"))
            })
            .collect()
    }

    fn small_grid() -> TileManager {
        TileManager::new(VirtualScrollConfig {
            tile_size: 100.0,
            gap: 10.0,
            overscan_rows: 0,
        })
    }

    #[test]
    fn test_render_preserves_order() {
        let mut grid = small_grid();
        grid.render_files(records(&[5, 3, 9, 1]), None);
        assert_eq!(grid.get_file_order(), ids(&[5, 3, 9, 1]).as_slice());
        assert_eq!(grid.get_file_index(FileId(9)), Some(2));
        assert_eq!(grid.get_file_index(FileId(4)), None);
        assert_eq!(grid.get_all_files().len(), 4);
    }

    #[test]
    fn test_render_duplicate_ids_last_wins() {
        let mut grid = small_grid();
        let mut input = records(&[1, 2]);
        input.push(FileRecord::new(1, "renamed.jpg"));
        grid.render_files(input, None);

        assert_eq!(grid.get_file_order(), ids(&[1, 2]).as_slice());
        assert_eq!(grid.get_file(FileId(1)).unwrap().original_filename, "renamed.jpg");
    }

    #[test]
    fn test_render_replaces_previous_store() {
        let mut grid = small_grid();
        grid.render_files(records(&[1, 2, 3]), None);
        grid.ensure_tile(FileId(1));
        grid.render_files(records(&[7, 8]), None);

        assert!(grid.get_file(FileId(1)).is_none());
        assert_eq!(grid.size(), 0);
        assert_eq!(grid.get_file_order(), ids(&[7, 8]).as_slice());
    }

    #[test]
    fn test_update_files_merges_known_ids_only() {
        let mut grid = small_grid();
        grid.render_files(records(&[1, 2]), None);
        grid.ensure_tile(FileId(1));

        let updated = grid.update_files(&[
            FilePatch::new(FileId(1)).discarded(true),
            FilePatch::new(FileId(99)).discarded(true),
        ]);

        assert_eq!(updated, 1);
        assert!(grid.get_file(FileId(99)).is_none());
        let file = grid.get_file(FileId(1)).unwrap();
        assert!(file.discarded);
        assert_eq!(file.original_filename, "IMG_1.JPG");
        assert!(grid.get_tile(FileId(1)).unwrap().has_class("discarded"));
    }

    #[test]
    fn test_update_files_clearing_original_rebinds_source() {
        let mut grid = small_grid();
        grid.render_files(records(&[1]), None);
        let tile = grid.ensure_tile(FileId(1)).unwrap();
        tile.set_resolution(Resolution::Full);
        assert_eq!(tile.element().src, "/uploads/IMG_1.JPG");
        let generation = tile.element().load_generation;

        grid.update_files(&[FilePatch::new(FileId(1)).original_path(None)]);

        let tile = grid.get_tile(FileId(1)).unwrap();
        assert_eq!(grid.get_file(FileId(1)).unwrap().original_path, None);
        assert_eq!(tile.resolution(), Resolution::Thumbnail);
        assert_eq!(tile.element().src, "/storage/thumbnails/1.jpg");
        assert!(tile.element().load_generation > generation);
        // A load started for the old source is stale now
        assert!(!grid.get_tile_mut(FileId(1)).unwrap().complete_load(generation));
    }

    #[test]
    fn test_navigable_files_follow_order() {
        let mut grid = small_grid();
        let mut input = records(&[4, 2, 8, 6]);
        input[1].discarded = true;
        grid.render_files(input, None);

        assert_eq!(grid.get_navigable_files(|_| true), ids(&[4, 2, 8, 6]));
        assert_eq!(grid.get_navigable_files(|f| !f.discarded), ids(&[4, 8, 6]));
    }

    #[test]
    fn test_selected_ids_follow_file_order() {
        let mut grid = small_grid();
        grid.render_files(records(&[10, 20, 30, 40]), None);

        grid.set_selected(FileId(40), true);
        grid.set_selected(FileId(10), true);
        grid.set_selected(FileId(30), true);
        grid.set_selected(FileId(30), true);

        assert_eq!(grid.get_selected_file_ids(), ids(&[10, 30, 40]));
    }

    #[test]
    fn test_selection_independent_of_tiles() {
        let mut grid = small_grid();
        grid.render_files(records(&[1, 2, 3]), None);

        grid.set_selected(FileId(2), true);
        assert!(grid.get_tile(FileId(2)).is_none());

        let tile = grid.ensure_tile(FileId(2)).unwrap();
        assert!(tile.is_selected());

        grid.remove_tile(FileId(2));
        assert_eq!(grid.get_selected_file_ids(), ids(&[2]));
        assert!(grid.ensure_tile(FileId(2)).unwrap().has_class("selected"));
    }

    #[test]
    fn test_selection_ignores_ids_outside_order() {
        let mut grid = small_grid();
        grid.render_files(records(&[1, 2]), None);
        grid.set_multiple_selected(ids(&[2, 77]), true);

        assert_eq!(grid.get_selected_file_ids(), ids(&[2]));
        assert!(grid.is_selected(FileId(77)));
    }

    #[test]
    fn test_render_with_seeded_selection() {
        let mut grid = small_grid();
        grid.render_files(records(&[1, 2, 3]), None);
        grid.set_selected(FileId(1), true);

        let seed: HashSet<FileId> = ids(&[3, 2]).into_iter().collect();
        grid.render_files(records(&[1, 2, 3]), Some(seed));
        assert_eq!(grid.get_selected_file_ids(), ids(&[2, 3]));

        // Without a seed the selection carries over the render
        grid.render_files(records(&[3, 2, 1]), None);
        assert_eq!(grid.get_selected_file_ids(), ids(&[3, 2]));
    }

    #[test]
    fn test_clear_selection_keeps_positions() {
        let mut grid = small_grid();
        grid.render_files(records(&[1, 2, 3]), None);
        grid.select_all();
        grid.setup_viewport(FileId(2), &ids(&[1, 2, 3]));
        grid.get_tile_mut(FileId(2)).unwrap().set_resolution(Resolution::Full);

        grid.clear_selection();

        assert!(grid.get_selected_file_ids().is_empty());
        let tile = grid.get_tile(FileId(2)).unwrap();
        assert_eq!(tile.position(), Position::Current);
        assert_eq!(tile.resolution(), Resolution::Full);
        assert!(!tile.has_class("selected"));
    }

    #[test]
    fn test_select_range_and_toggle() {
        let mut grid = small_grid();
        grid.render_files(records(&[1, 2, 3, 4, 5]), None);

        assert!(grid.select_range(FileId(4), FileId(2), true));
        assert_eq!(grid.get_selected_file_ids(), ids(&[2, 3, 4]));
        assert!(!grid.select_range(FileId(4), FileId(42), true));

        assert!(!grid.toggle_selected(FileId(3)));
        assert!(grid.toggle_selected(FileId(5)));
        assert_eq!(grid.get_selected_file_ids(), ids(&[2, 4, 5]));
        assert_eq!(grid.selected_count(), 3);
    }

    #[test]
    fn test_ensure_tile() {
        let mut grid = small_grid();
        grid.render_files(records(&[1, 2]), None);

        assert!(grid.ensure_tile(FileId(3)).is_none());
        assert!(grid.get_tile(FileId(1)).is_none());

        assert_eq!(grid.ensure_tile(FileId(1)).unwrap().id(), FileId(1));
        assert_eq!(grid.size(), 1);
        grid.ensure_tile(FileId(1));
        assert_eq!(grid.size(), 1);
    }

    #[test]
    fn test_remove_tile_keeps_store() {
        let mut grid = small_grid();
        grid.render_files(records(&[1, 2]), None);
        grid.ensure_tile(FileId(1));

        assert!(grid.remove_tile(FileId(1)));
        assert!(!grid.remove_tile(FileId(1)));
        assert_eq!(grid.size(), 0);
        assert!(grid.get_file(FileId(1)).is_some());
        assert_eq!(grid.pooled_elements(), 0);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut grid = small_grid();
        grid.render_files(records(&[1, 2]), None);
        grid.set_selected(FileId(1), true);
        grid.ensure_tile(FileId(2));

        grid.clear();

        assert_eq!(grid.size(), 0);
        assert!(grid.get_file_order().is_empty());
        assert!(grid.get_file(FileId(1)).is_none());
        assert!(!grid.is_selected(FileId(1)));
    }

    #[test]
    fn test_setup_viewport_scenario() {
        let mut grid = small_grid();
        grid.render_files(records(&[1, 2, 3, 4, 5]), None);
        for id in 1..=5 {
            grid.ensure_tile(FileId(id));
        }

        grid.setup_viewport(FileId(3), &ids(&[1, 2, 3, 4, 5]));

        let position = |id: u64| grid.get_tile(FileId(id)).unwrap().position();
        assert_eq!(position(1), Position::Grid);
        assert_eq!(position(2), Position::Prev);
        assert_eq!(position(3), Position::Current);
        assert_eq!(position(4), Position::Next);
        assert_eq!(position(5), Position::Grid);
    }

    #[test]
    fn test_setup_viewport_boundaries() {
        let mut grid = small_grid();
        grid.render_files(records(&[1, 2, 3]), None);
        let order = ids(&[1, 2, 3]);

        grid.setup_viewport(FileId(1), &order);
        assert_eq!(grid.get_tile(FileId(1)).unwrap().position(), Position::Current);
        assert_eq!(grid.get_tile(FileId(2)).unwrap().position(), Position::Next);
        assert!(grid.visible_tiles().iter().all(|t| t.position() != Position::Prev));

        grid.setup_viewport(FileId(3), &order);
        assert_eq!(grid.get_tile(FileId(3)).unwrap().position(), Position::Current);
        assert_eq!(grid.get_tile(FileId(2)).unwrap().position(), Position::Prev);
        assert_eq!(grid.get_tile(FileId(1)).unwrap().position(), Position::Grid);

        let current = grid
            .visible_tiles()
            .iter()
            .filter(|t| t.position() == Position::Current)
            .count();
        assert_eq!(current, 1);
    }

    #[test]
    fn test_setup_viewport_leaves_outside_ids_alone() {
        let mut grid = small_grid();
        grid.render_files(records(&[1, 2, 3, 4]), None);
        grid.ensure_tile(FileId(4)).unwrap().set_position(Position::Hidden);

        grid.setup_viewport(FileId(2), &ids(&[1, 2, 3]));
        assert_eq!(grid.get_tile(FileId(4)).unwrap().position(), Position::Hidden);
    }

    #[test]
    fn test_bulk_positions() {
        let mut grid = small_grid();
        grid.render_files(records(&[1, 2, 3]), None);
        grid.setup_viewport(FileId(2), &ids(&[1, 2, 3]));

        grid.set_all_positions(Position::Hidden);
        assert!(grid.visible_tiles().iter().all(|t| t.position() == Position::Hidden));

        grid.reset_to_grid();
        assert!(grid.visible_tiles().iter().all(|t| t.position() == Position::Grid));
    }

    #[test]
    fn test_window_pass_materializes_visible_rows() {
        let mut grid = small_grid();
        grid.render_files(records(&(1..=100).collect::<Vec<_>>()), None);
        // 3 columns, 110px rows, two rows visible
        grid.on_resize(340.0, 220.0);

        let pass = grid.on_animation_frame().unwrap();
        assert_eq!(pass.range, 0..6);
        assert_eq!(grid.size(), 6);
        assert!(grid.on_animation_frame().is_none());

        let tile = grid.get_tile(FileId(5)).unwrap();
        assert_eq!(
            tile.element().grid_area,
            Some(crate::grid::virtual_scroll::GridPosition { row: 2, col: 2 })
        );
    }

    #[test]
    fn test_window_pass_recycles_elements() {
        let mut grid = small_grid();
        grid.render_files(records(&(1..=100).collect::<Vec<_>>()), None);
        grid.on_resize(340.0, 220.0);
        grid.on_animation_frame();

        grid.on_scroll(1100.0, 220.0);
        let pass = grid.on_animation_frame().unwrap();

        assert_eq!(pass.range, 30..36);
        assert_eq!(pass.recycled, 6);
        assert_eq!(pass.materialized, 6);
        assert_eq!(grid.size(), 6);
        assert!(grid.get_tile(FileId(1)).is_none());
        assert!(grid.get_tile(FileId(31)).is_some());
        // every element was rebound, none left over
        assert_eq!(grid.pooled_elements(), 0);
    }

    #[test]
    fn test_exempt_tiles_survive_scrolling() {
        let mut grid = small_grid();
        grid.render_files(records(&(1..=100).collect::<Vec<_>>()), None);
        grid.on_resize(340.0, 220.0);
        grid.on_animation_frame();

        grid.virtual_scroll_mut().exempt_from_recycling([FileId(2)]);
        grid.on_scroll(1100.0, 220.0);
        grid.on_animation_frame();

        assert!(grid.get_tile(FileId(2)).is_some());
        assert!(grid.get_tile(FileId(1)).is_none());
    }

    #[test]
    fn test_paused_grid_keeps_tiles() {
        let mut grid = small_grid();
        grid.render_files(records(&(1..=100).collect::<Vec<_>>()), None);
        grid.on_resize(340.0, 220.0);
        grid.on_animation_frame();

        grid.virtual_scroll_mut().pause();
        grid.on_scroll(1100.0, 220.0);
        assert!(grid.on_animation_frame().is_none());
        assert!(grid.get_tile(FileId(1)).is_some());

        grid.virtual_scroll_mut().resume();
        assert!(grid.on_animation_frame().is_some());
        assert!(grid.get_tile(FileId(1)).is_none());
    }

    #[test]
    fn test_window_pass_picks_resolution_from_tile_size() {
        let mut grid = small_grid();
        grid.render_files(records(&(1..=20).collect::<Vec<_>>()), None);
        grid.on_resize(340.0, 220.0);
        grid.on_animation_frame();
        assert_eq!(grid.get_tile(FileId(1)).unwrap().resolution(), Resolution::Thumbnail);

        grid.set_tile_size(200.0);
        grid.on_animation_frame();
        assert_eq!(grid.get_tile(FileId(1)).unwrap().resolution(), Resolution::Full);
    }

    #[test]
    fn test_destroy_detaches() {
        let mut grid = small_grid();
        grid.render_files(records(&[1, 2, 3]), None);
        grid.ensure_tile(FileId(1));

        grid.destroy();

        assert_eq!(grid.size(), 0);
        grid.on_scroll(100.0, 100.0);
        assert!(grid.on_animation_frame().is_none());
    }
}
