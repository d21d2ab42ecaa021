//! Review large photo collections in a virtualized thumbnail grid with a
//! lightbox (carousel, compare, fullscreen) on top.
//!
//! The grid engine in [`grid`] is headless: it keeps file records, selection
//! and per-tile view state, and the UI draws whatever it has materialized.

pub mod config;
pub mod error;
pub mod grid;
pub mod state;

pub use config::Settings;
pub use error::{Result, ReviewError};
pub use grid::{TileManager, ViewMode, ViewportController};
pub use state::data::{FileId, FilePatch, FileRecord};
pub use state::filter::ReviewFilter;
pub use state::library::Library;
pub use state::session::ReviewSession;
