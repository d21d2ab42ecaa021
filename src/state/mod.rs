/// State management module
///
/// This module handles the data the grid works on:
/// - Shared data structures (data.rs)
/// - The file feed: backend exports and scanned folders (library.rs)
/// - Review filters that pick the navigable subset (filter.rs)
/// - The session's master copy of the records and its filter (session.rs)

pub mod data;
pub mod filter;
pub mod library;
pub mod session;
