/// Native image file picker
///
/// Presents a modal open dialog restricted to common raster image formats.
/// Returns the chosen path, or `None` when the user cancels; what a cancel
/// does to existing state is decided by the caller's `CancelPolicy`.
use rfd::FileDialog;
use std::path::PathBuf;

/// Extensions offered by the picker (lowercase)
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Show the modal file dialog and return the selected image path
pub fn pick_image() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Select Image")
        .add_filter("Images", &IMAGE_EXTENSIONS)
        .pick_file()
}
