/// Image preprocessing for the BLIP vision tower
///
/// Decodes the selected file, forces three-channel RGB, resizes to fill the
/// model's 384x384 input and normalizes with the CLIP mean/std. The result
/// stays on the CPU; the engine moves it to the compute device.
use candle_core::{DType, Device, Tensor};
use image::imageops::FilterType;
use std::path::Path;

use super::CaptionError;

/// BLIP input resolution (square)
pub const IMAGE_SIZE: usize = 384;

/// CLIP normalization constants used by the BLIP processor
const MEAN: [f32; 3] = [0.48145466, 0.4578275, 0.40821073];
const STD: [f32; 3] = [0.26862954, 0.26130258, 0.27577711];

/// Load an image file into a normalized (3, 384, 384) tensor
pub fn load_image(path: &Path) -> Result<Tensor, CaptionError> {
    let img = image::ImageReader::open(path)
        .map_err(image::ImageError::IoError)
        .and_then(|reader| reader.with_guessed_format().map_err(image::ImageError::IoError))
        .and_then(|reader| reader.decode())
        .map_err(|source| CaptionError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .resize_to_fill(IMAGE_SIZE as u32, IMAGE_SIZE as u32, FilterType::Triangle);

    let img = img.to_rgb8();
    let data = img.into_raw();
    let data =
        Tensor::from_vec(data, (IMAGE_SIZE, IMAGE_SIZE, 3), &Device::Cpu)?.permute((2, 0, 1))?;

    let mean = Tensor::new(&MEAN, &Device::Cpu)?.reshape((3, 1, 1))?;
    let std = Tensor::new(&STD, &Device::Cpu)?.reshape((3, 1, 1))?;

    let tensor = (data.to_dtype(DType::F32)? / 255.)?
        .broadcast_sub(&mean)?
        .broadcast_div(&std)?;

    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_image(Path::new("/nonexistent/photo.png"));
        assert!(matches!(result, Err(CaptionError::Image { .. })));
    }

    #[test]
    fn test_decodable_file_becomes_model_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");

        // 64x48 solid-color fixture, deliberately non-square
        let img = image::RgbImage::from_pixel(64, 48, image::Rgb([200, 40, 40]));
        img.save(&path).unwrap();

        let tensor = load_image(&path).unwrap();
        assert_eq!(tensor.dims(), &[3, IMAGE_SIZE, IMAGE_SIZE]);
        assert_eq!(tensor.dtype(), DType::F32);
    }

    #[test]
    fn test_non_image_bytes_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_an_image.png");
        std::fs::write(&path, b"definitely not pixels").unwrap();

        let result = load_image(&path);
        assert!(matches!(result, Err(CaptionError::Image { .. })));
    }
}
