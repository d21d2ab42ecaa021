/// Thumbnail grid engine
///
/// Architecture:
/// - `tile.rs` - per-file view state and its render element
/// - `virtual_scroll.rs` - layout math and the visible window
/// - `tile_manager.rs` - file store, selection and the tile arena
/// - `viewport.rs` - the focused single-item view on top of the grid
/// - `assets.rs` - mapping of storage paths to mount paths
///
/// Everything here runs on the UI thread and never blocks.

pub mod assets;
pub mod tile;
pub mod tile_manager;
pub mod viewport;
pub mod virtual_scroll;

pub use tile::{Position, Resolution, Tile, TileElement, FULL_RES_THRESHOLD};
pub use tile_manager::{TileManager, WindowPass};
pub use viewport::{ViewMode, ViewportController, ViewportState};
pub use virtual_scroll::{GridLayout, GridPosition, VirtualScrollConfig, VirtualScrollManager};
