use serde::{Deserialize, Serialize};

use super::data::FileRecord;

/// Which files the grid and the lightbox step through.
///
/// Changing the filter re-renders the grid with the matching records and
/// hands the new order to the viewport as its navigation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReviewFilter {
    #[default]
    All,
    /// Not reviewed yet
    Unreviewed,
    /// Everything not discarded
    Kept,
    Discarded,
    Duplicates,
    Similar,
}

impl ReviewFilter {
    pub const ALL: [ReviewFilter; 6] = [
        ReviewFilter::All,
        ReviewFilter::Unreviewed,
        ReviewFilter::Kept,
        ReviewFilter::Discarded,
        ReviewFilter::Duplicates,
        ReviewFilter::Similar,
    ];

    pub fn matches(&self, file: &FileRecord) -> bool {
        match self {
            ReviewFilter::All => true,
            ReviewFilter::Unreviewed => file.reviewed_at.is_none(),
            ReviewFilter::Kept => !file.discarded,
            ReviewFilter::Discarded => file.discarded,
            ReviewFilter::Duplicates => file.is_duplicate,
            ReviewFilter::Similar => file.is_similar,
        }
    }

    /// Next filter, wrapping around
    pub fn cycle(&self) -> ReviewFilter {
        let index = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReviewFilter::All => "All",
            ReviewFilter::Unreviewed => "Unreviewed",
            ReviewFilter::Kept => "Kept",
            ReviewFilter::Discarded => "Discarded",
            ReviewFilter::Duplicates => "Duplicates",
            ReviewFilter::Similar => "Similar",
        }
    }
}
