/// Preview viewport scaling
///
/// The selected image is shown inside a fixed square viewport. The source is
/// decoded once per selection and scaled so its longest edge fills the
/// viewport while the aspect ratio is preserved; a 2:1 photo stays 2:1 on
/// screen.
use iced::widget::image::Handle;
use image::imageops::FilterType;
use std::path::Path;

/// Edge length of the square preview viewport, in logical pixels
pub const VIEWPORT_SIZE: u32 = 400;

/// A scaled preview ready for the image widget
#[derive(Debug, Clone)]
pub struct Preview {
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}

/// Scale `width` x `height` so the longest edge equals `viewport`,
/// preserving the aspect ratio. Small images are scaled up.
pub fn fit_dimensions(width: u32, height: u32, viewport: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (viewport, viewport);
    }

    if width >= height {
        let scaled = (height as f32 * viewport as f32 / width as f32).round() as u32;
        (viewport, scaled.max(1))
    } else {
        let scaled = (width as f32 * viewport as f32 / height as f32).round() as u32;
        (scaled.max(1), viewport)
    }
}

/// Decode an image file and build its scaled preview
pub fn load_preview(path: &Path) -> Result<Preview, image::ImageError> {
    let img = image::ImageReader::open(path)
        .map_err(image::ImageError::IoError)?
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?
        .decode()?;

    let (width, height) = fit_dimensions(img.width(), img.height(), VIEWPORT_SIZE);
    let scaled = img.resize_exact(width, height, FilterType::Lanczos3).to_rgba8();

    Ok(Preview {
        handle: Handle::from_rgba(width, height, scaled.into_raw()),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_image_keeps_ratio() {
        assert_eq!(fit_dimensions(200, 100, 400), (400, 200));
        assert_eq!(fit_dimensions(1920, 1080, 400), (400, 225));
    }

    #[test]
    fn test_tall_image_keeps_ratio() {
        assert_eq!(fit_dimensions(100, 200, 400), (200, 400));
    }

    #[test]
    fn test_square_image_fills_viewport() {
        assert_eq!(fit_dimensions(300, 300, 400), (400, 400));
        assert_eq!(fit_dimensions(5000, 5000, 400), (400, 400));
    }

    #[test]
    fn test_extreme_ratio_never_collapses_to_zero() {
        let (_, height) = fit_dimensions(10_000, 2, 400);
        assert!(height >= 1);
    }

    #[test]
    fn test_load_preview_scales_file_to_viewport() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        let img = image::RgbImage::from_pixel(200, 100, image::Rgb([10, 120, 60]));
        img.save(&path).unwrap();

        let preview = load_preview(&path).unwrap();
        assert_eq!((preview.width, preview.height), (400, 200));
    }

    #[test]
    fn test_load_preview_missing_file_is_an_error() {
        assert!(load_preview(Path::new("/nonexistent/photo.png")).is_err());
    }
}
