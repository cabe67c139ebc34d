/// State management module
///
/// This module holds the application state that is independent of the UI
/// toolkit: the current image selection, the caption from the last
/// generation run, and the logic deciding what the output area shows.
pub mod session;
