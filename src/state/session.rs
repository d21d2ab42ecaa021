use std::collections::HashMap;

use super::data::{FileId, FilePatch, FileRecord};
use super::filter::ReviewFilter;
use crate::grid::{TileManager, ViewportController};

/// Every record of the open library plus the active filter.
///
/// The grid only ever holds the records matching the filter; this is the
/// master copy review patches land in, so a file filtered out and back in
/// keeps its review state.
#[derive(Debug, Clone, Default)]
pub struct ReviewSession {
    records: Vec<FileRecord>,
    /// Position of each id in `records`
    index: HashMap<FileId, usize>,
    filter: ReviewFilter,
}

impl ReviewSession {
    pub fn new(records: Vec<FileRecord>) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(position, file)| (file.id, position))
            .collect();
        Self {
            records,
            index,
            filter: ReviewFilter::All,
        }
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn filter(&self) -> ReviewFilter {
        self.filter
    }

    pub fn get(&self, id: FileId) -> Option<&FileRecord> {
        self.index.get(&id).and_then(|position| self.records.get(*position))
    }

    /// Records matching the active filter, in library order
    pub fn matching(&self) -> Vec<FileRecord> {
        self.records
            .iter()
            .filter(|file| self.filter.matches(file))
            .cloned()
            .collect()
    }

    /// Switch filters and rebuild the grid. Returns how many files match.
    pub fn set_filter(
        &mut self,
        filter: ReviewFilter,
        grid: &mut TileManager,
        viewport: &mut ViewportController,
    ) -> usize {
        self.filter = filter;
        self.show(grid, viewport);
        log::info!("🔎 Filter {}: {} of {} files", filter.label(), grid.file_count(), self.len());
        grid.file_count()
    }

    /// Render the matching records and hand the navigable ids to the
    /// viewport. The selection survives.
    pub fn show(&self, grid: &mut TileManager, viewport: &mut ViewportController) {
        grid.render_files(self.matching(), None);

        let filter = self.filter;
        let navigable = grid.get_navigable_files(|file| filter.matches(file));
        viewport.update_navigation_set(grid, navigable);
    }

    /// Apply review patches to the session and the grid.
    ///
    /// Files the patches move out of the active filter leave the grid and
    /// the viewport's navigation set. Returns how many grid files were updated.
    pub fn review(
        &mut self,
        patches: &[FilePatch],
        grid: &mut TileManager,
        viewport: &mut ViewportController,
    ) -> usize {
        let mut left_filter = false;
        for patch in patches {
            let Some(record) = self
                .index
                .get(&patch.id)
                .and_then(|position| self.records.get_mut(*position))
            else {
                continue;
            };
            record.apply(patch);
            left_filter |= !self.filter.matches(record);
        }

        let updated = grid.update_files(patches);
        if left_filter {
            self.show(grid, viewport);
        }
        updated
    }
}
