use image::{imageops::FilterType, DynamicImage};
use ndarray::Array4;

use super::ModelError;

/// Decodes uploaded bytes into an image. Corrupt or unsupported data is a
/// user-level error: the request aborts before inference and no report is
/// written.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ModelError> {
    let image = image::load_from_memory(bytes)?;
    Ok(image)
}

/// Converts an image into the model's input tensor.
///
/// Contract: force 3-channel RGB (alpha dropped, grayscale expanded),
/// resize to the model's target size, rescale intensities from [0,255] to
/// [0,1], and add a leading batch dimension. Layout is channels-last
/// `[1, H, W, 3]` - the training pipeline fed the network NHWC batches.
pub fn to_input_tensor(image: &DynamicImage, width: u32, height: u32) -> Array4<f32> {
    let resized = image.resize_exact(width, height, FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let mut array = Array4::<f32>::zeros((1, height as usize, width as usize, 3));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            array[[0, y as usize, x as usize, c]] = pixel[c] as f32 / 255.0;
        }
    }

    array
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn tensor_has_batch_dimension_and_target_size() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 48, Rgb([10, 20, 30])));

        let tensor = to_input_tensor(&img, 150, 150);

        assert_eq!(tensor.shape(), &[1, 150, 150, 3]);
    }

    #[test]
    fn values_are_rescaled_to_unit_range() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([0, 128, 255])));

        let tensor = to_input_tensor(&img, 8, 8);

        assert!((tensor[[0, 0, 0, 0]] - 0.0).abs() < 1e-6);
        assert!((tensor[[0, 0, 0, 1]] - 128.0 / 255.0).abs() < 1e-6);
        assert!((tensor[[0, 0, 0, 2]] - 1.0).abs() < 1e-6);
        assert!(tensor.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn alpha_channel_is_dropped() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([50, 60, 70, 0])));

        let tensor = to_input_tensor(&img, 4, 4);

        assert_eq!(tensor.shape(), &[1, 4, 4, 3]);
        assert!((tensor[[0, 2, 2, 0]] - 50.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn grayscale_is_expanded_to_rgb() {
        let img = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(4, 4, image::Luma([200])));

        let tensor = to_input_tensor(&img, 4, 4);

        let v = 200.0 / 255.0;
        assert!((tensor[[0, 1, 1, 0]] - v).abs() < 1e-6);
        assert!((tensor[[0, 1, 1, 1]] - v).abs() < 1e-6);
        assert!((tensor[[0, 1, 1, 2]] - v).abs() < 1e-6);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let result = decode_image(b"definitely not an image");
        assert!(matches!(result, Err(ModelError::ImageProcessing(_))));
    }

    #[test]
    fn png_round_trip_decodes() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([1, 2, 3])));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded.width(), 10);
        assert_eq!(decoded.height(), 10);
    }
}
