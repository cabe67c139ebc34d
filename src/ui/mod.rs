/// UI building blocks
///
/// Widgets and display helpers that sit between the raw image data and the
/// iced widget tree.
pub mod preview;
