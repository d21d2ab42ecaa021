//! Windowed rendering for the thumbnail grid
//!
//! Only the rows around the scroll position are materialized. The manager
//! does the layout math and decides which tiles may be recycled; the
//! `TileManager` applies those decisions to its tile arena.

use std::collections::HashSet;
use std::ops::Range;

use crate::state::data::FileId;

/// 1-based cell of an item in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPosition {
    pub row: usize,
    pub col: usize,
}

/// Grid sizing knobs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualScrollConfig {
    /// Edge length of a (square) tile in pixels
    pub tile_size: f32,
    /// Space between tiles in pixels
    pub gap: f32,
    /// Rows rendered above and below the visible ones
    pub overscan_rows: usize,
}

impl Default for VirtualScrollConfig {
    fn default() -> Self {
        Self {
            tile_size: 200.0,
            gap: 8.0,
            overscan_rows: 2,
        }
    }
}

/// Derived layout, recomputed on resize
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub total_rows: usize,
    pub row_height: f32,
}

pub struct VirtualScrollManager {
    config: VirtualScrollConfig,
    file_count: usize,
    container_width: f32,
    client_height: f32,
    scroll_top: f32,
    layout: GridLayout,
    /// Recycling suspended (the focused viewport is open)
    paused: bool,
    /// Ids that must never be recycled
    exempt: HashSet<FileId>,
    /// A window pass is due on the next animation frame
    pending: bool,
    /// Scroll/resize observers connected
    attached: bool,
}

impl VirtualScrollManager {
    pub fn new(config: VirtualScrollConfig) -> Self {
        // A zero-height row would make every offset "visible"
        let config = VirtualScrollConfig {
            tile_size: config.tile_size.max(1.0),
            gap: config.gap.max(0.0),
            ..config
        };
        let mut manager = Self {
            config,
            file_count: 0,
            container_width: 0.0,
            client_height: 0.0,
            scroll_top: 0.0,
            layout: GridLayout {
                columns: 1,
                total_rows: 0,
                row_height: config.tile_size + config.gap,
            },
            paused: false,
            exempt: HashSet::new(),
            pending: false,
            attached: true,
        };
        manager.recompute_layout();
        manager
    }

    pub fn config(&self) -> &VirtualScrollConfig {
        &self.config
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub fn client_height(&self) -> f32 {
        self.client_height
    }

    pub fn container_width(&self) -> f32 {
        self.container_width
    }

    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// New collection size (after a render)
    pub fn set_file_count(&mut self, count: usize) {
        self.file_count = count;
        self.recompute_layout();
        self.schedule();
    }

    /// Scroll observer
    pub fn on_scroll(&mut self, scroll_top: f32, client_height: f32) {
        if !self.attached {
            return;
        }
        self.scroll_top = scroll_top.max(0.0);
        self.client_height = client_height.max(0.0);
        self.schedule();
    }

    /// Resize observer
    pub fn on_resize(&mut self, container_width: f32, client_height: f32) {
        if !self.attached {
            return;
        }
        self.container_width = container_width.max(0.0);
        self.client_height = client_height.max(0.0);
        self.recompute_layout();
        self.schedule();
    }

    /// Change the tile edge length (grid zoom)
    pub fn set_tile_size(&mut self, tile_size: f32) {
        let tile_size = tile_size.max(1.0);
        if (tile_size - self.config.tile_size).abs() < f32::EPSILON {
            return;
        }
        self.config.tile_size = tile_size;
        self.recompute_layout();
        self.schedule();
    }

    fn recompute_layout(&mut self) {
        let VirtualScrollConfig { tile_size, gap, .. } = self.config;
        let columns = (((self.container_width + gap) / (tile_size + gap)).floor() as usize).max(1);
        let total_rows = self.file_count.div_ceil(columns);

        let layout = GridLayout {
            columns,
            total_rows,
            row_height: tile_size + gap,
        };
        if layout != self.layout {
            log::debug!(
                "📐 Grid layout: {} columns x {} rows ({}px rows)",
                layout.columns,
                layout.total_rows,
                layout.row_height
            );
        }
        self.layout = layout;
    }

    /// 1-based row/column of the item at `index`
    pub fn get_grid_position(&self, index: usize) -> GridPosition {
        let columns = self.layout.columns;
        GridPosition {
            row: index / columns + 1,
            col: index % columns + 1,
        }
    }

    /// Indices that must be materialized for the current scroll offset
    pub fn visible_range(&self) -> Range<usize> {
        let GridLayout {
            columns,
            total_rows,
            row_height,
        } = self.layout;
        let overscan = self.config.overscan_rows;

        let first_visible = (self.scroll_top / row_height).floor() as usize;
        let last_visible = ((self.scroll_top + self.client_height) / row_height).ceil() as usize;

        let start_row = first_visible.saturating_sub(overscan);
        let end_row = last_visible.saturating_add(overscan).min(total_rows);

        let start = start_row.saturating_mul(columns).min(self.file_count);
        let end = end_row.saturating_mul(columns).min(self.file_count);
        start..end.max(start)
    }

    /// Height of the whole (virtual) grid
    pub fn total_height(&self) -> f32 {
        self.layout.total_rows as f32 * self.layout.row_height
    }

    /// Scroll offset that puts the row of `index` at the top
    pub fn scroll_offset_for_index(&self, index: usize) -> f32 {
        let row = index / self.layout.columns;
        row as f32 * self.layout.row_height
    }

    pub fn pause(&mut self) {
        if !self.paused {
            log::debug!("⏸️  Recycling paused");
        }
        self.paused = true;
    }

    /// Resume recycling; the window is re-evaluated on the next frame
    pub fn resume(&mut self) {
        if self.paused {
            log::debug!("▶️  Recycling resumed");
        }
        self.paused = false;
        self.schedule();
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn exempt_from_recycling<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = FileId>,
    {
        self.exempt.extend(ids);
    }

    pub fn clear_exemptions(&mut self) {
        self.exempt.clear();
    }

    pub fn is_exempt(&self, id: FileId) -> bool {
        self.exempt.contains(&id)
    }

    pub fn exemptions(&self) -> &HashSet<FileId> {
        &self.exempt
    }

    /// Whether a materialized tile outside the window may be recycled now
    pub fn is_recyclable(&self, id: FileId) -> bool {
        !self.paused && !self.exempt.contains(&id)
    }

    /// Request a window pass on the next animation frame
    pub fn schedule(&mut self) {
        if self.attached {
            self.pending = true;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending && !self.paused && self.attached
    }

    /// Consume the pending flag. A pass requested while paused stays queued.
    pub fn take_pending(&mut self) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.pending = false;
        true
    }

    /// Disconnect scroll/resize observers
    pub fn destroy(&mut self) {
        self.attached = false;
        self.pending = false;
        self.exempt.clear();
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

impl Default for VirtualScrollManager {
    fn default() -> Self {
        Self::new(VirtualScrollConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(file_count: usize, width: f32, height: f32) -> VirtualScrollManager {
        let mut vsm = VirtualScrollManager::new(VirtualScrollConfig {
            tile_size: 100.0,
            gap: 10.0,
            overscan_rows: 1,
        });
        vsm.set_file_count(file_count);
        vsm.on_resize(width, height);
        vsm
    }

    #[test]
    fn test_columns() {
        // (340 + 10) / 110 = 3.18
        assert_eq!(manager(10, 340.0, 300.0).layout().columns, 3);
        // (320 + 10) / 110 = 3.0 exactly
        assert_eq!(manager(10, 320.0, 300.0).layout().columns, 3);
        assert_eq!(manager(10, 319.0, 300.0).layout().columns, 2);
        // Narrow containers still get one column
        assert_eq!(manager(10, 20.0, 300.0).layout().columns, 1);
    }

    #[test]
    fn test_rows_and_positions() {
        let vsm = manager(10, 340.0, 300.0);
        let layout = vsm.layout();
        assert_eq!(layout.total_rows, 4);
        assert_eq!(layout.row_height, 110.0);

        assert_eq!(vsm.get_grid_position(0), GridPosition { row: 1, col: 1 });
        assert_eq!(vsm.get_grid_position(4), GridPosition { row: 2, col: 2 });
        assert_eq!(vsm.get_grid_position(9), GridPosition { row: 4, col: 1 });
    }

    #[test]
    fn test_visible_range_at_top() {
        // 3 columns, 110px rows, 220px viewport: rows 0..2 visible + 1 overscan
        let vsm = manager(100, 340.0, 220.0);
        assert_eq!(vsm.visible_range(), 0..9);
    }

    #[test]
    fn test_visible_range_scrolled() {
        let mut vsm = manager(100, 340.0, 220.0);
        vsm.on_scroll(550.0, 220.0);
        // start_row = floor(550/110) - 1 = 4, end_row = ceil(770/110) + 1 = 8
        assert_eq!(vsm.visible_range(), 12..24);
    }

    #[test]
    fn test_visible_range_clamped_at_end() {
        let mut vsm = manager(10, 340.0, 220.0);
        vsm.on_scroll(10_000.0, 220.0);
        let range = vsm.visible_range();
        assert!(range.end <= 10);
        assert!(range.start <= range.end);

        let empty = manager(0, 340.0, 220.0);
        assert_eq!(empty.visible_range(), 0..0);
    }

    #[test]
    fn test_scroll_events_coalesce_per_frame() {
        let mut vsm = manager(100, 340.0, 220.0);
        assert!(vsm.take_pending());

        vsm.on_scroll(10.0, 220.0);
        vsm.on_scroll(20.0, 220.0);
        vsm.on_scroll(30.0, 220.0);

        assert!(vsm.take_pending());
        assert!(!vsm.take_pending());
    }

    #[test]
    fn test_pause_defers_pass_until_resume() {
        let mut vsm = manager(100, 340.0, 220.0);
        vsm.take_pending();

        vsm.pause();
        vsm.on_scroll(400.0, 220.0);
        assert!(!vsm.take_pending());
        assert!(!vsm.is_recyclable(FileId(1)));

        vsm.resume();
        assert!(vsm.take_pending());
        assert!(vsm.is_recyclable(FileId(1)));
    }

    #[test]
    fn test_exemptions_survive_until_cleared() {
        let mut vsm = manager(100, 340.0, 220.0);
        vsm.exempt_from_recycling([FileId(3), FileId(4)]);

        vsm.on_scroll(2000.0, 220.0);
        vsm.resume();
        assert!(!vsm.is_recyclable(FileId(3)));
        assert!(vsm.is_recyclable(FileId(5)));

        vsm.clear_exemptions();
        assert!(vsm.is_recyclable(FileId(3)));
    }

    #[test]
    fn test_destroy_detaches_observers() {
        let mut vsm = manager(100, 340.0, 220.0);
        vsm.take_pending();
        vsm.destroy();

        vsm.on_scroll(500.0, 220.0);
        assert_eq!(vsm.scroll_top(), 0.0);
        assert!(!vsm.take_pending());
    }

    #[test]
    fn test_degenerate_config_is_clamped() {
        let mut vsm = VirtualScrollManager::new(VirtualScrollConfig {
            tile_size: 0.0,
            gap: -4.0,
            overscan_rows: 2,
        });
        vsm.set_file_count(10);
        vsm.on_resize(800.0, 600.0);

        assert_eq!(vsm.config().tile_size, 1.0);
        assert_eq!(vsm.config().gap, 0.0);
        assert_eq!(vsm.layout().row_height, 1.0);
        assert_eq!(vsm.visible_range(), 0..10);
    }

    #[test]
    fn test_huge_overscan_does_not_overflow() {
        let mut vsm = VirtualScrollManager::new(VirtualScrollConfig {
            tile_size: 100.0,
            gap: 10.0,
            overscan_rows: usize::MAX,
        });
        vsm.set_file_count(50);
        vsm.on_resize(340.0, 220.0);
        vsm.on_scroll(550.0, 220.0);
        assert_eq!(vsm.visible_range(), 0..50);
    }

    #[test]
    fn test_tile_size_changes_layout() {
        let mut vsm = manager(100, 340.0, 220.0);
        vsm.set_tile_size(50.0);
        // (340 + 10) / 60 = 5.8
        assert_eq!(vsm.layout().columns, 5);
        assert_eq!(vsm.scroll_offset_for_index(12), 2.0 * 60.0);
    }
}
