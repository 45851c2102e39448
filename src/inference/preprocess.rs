/// Image file → model input tensor.
///
/// The steps run in a fixed order: decode, force RGB, apply EXIF
/// orientation, resample to 128×128 (Lanczos3), scale to [0, 1], add the
/// batch axis. The preview image is resampled from the same oriented RGB
/// grid so it never goes through two resizes.

use image::imageops::{self, FilterType};
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader, RgbImage};
use ndarray::{Array4, ArrayView4};
use std::io::Cursor;

use crate::error::{PipelineError, Result};
use crate::state::data::ImageAsset;

/// Edge length of the square model input
pub const INPUT_SIZE: u32 = 128;

/// NHWC shape the model expects
pub const INPUT_SHAPE: [usize; 4] = [1, INPUT_SIZE as usize, INPUT_SIZE as usize, 3];

/// Encodings accepted by the file picker and the decoder
const SUPPORTED_FORMATS: [ImageFormat; 3] = [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::Bmp];

/// Normalized `(1, 128, 128, 3)` float tensor, values in [0.0, 1.0]
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor(Array4<f32>);

impl InputTensor {
    /// Wrap an arbitrary array (shape checks in tests)
    #[cfg(test)]
    pub(crate) fn from_array(array: Array4<f32>) -> Self {
        Self(array)
    }

    pub fn shape(&self) -> &[usize] {
        self.0.shape()
    }

    pub fn view(&self) -> ArrayView4<'_, f32> {
        self.0.view()
    }
}

/// Output of [`ImagePreprocessor::prepare`]
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub tensor: InputTensor,
    /// Oriented RGB preview for the image panel, not fed to the model
    pub display: RgbImage,
}

/// Turns an [`ImageAsset`] into an [`InputTensor`] plus a preview image
#[derive(Debug, Clone, Copy)]
pub struct ImagePreprocessor {
    display_size: u32,
}

impl ImagePreprocessor {
    pub fn new(display_size: u32) -> Self {
        Self {
            display_size: display_size.max(1),
        }
    }

    /// Run the full preprocessing chain.
    ///
    /// Every failure (unreadable file, unknown or corrupt encoding) is
    /// reported as `UnsupportedFormat`.
    pub fn prepare(&self, asset: &ImageAsset) -> Result<PreparedImage> {
        let bytes = asset
            .read_bytes()
            .map_err(|e| PipelineError::unsupported(format!("cannot read {}: {}", asset, e)))?;

        let rgb = decode_oriented_rgb(&bytes)?;
        log::debug!("Decoded {}: {}x{}", asset, rgb.width(), rgb.height());

        let model_input = imageops::resize(&rgb, INPUT_SIZE, INPUT_SIZE, FilterType::Lanczos3);
        let display = imageops::resize(&rgb, self.display_size, self.display_size, FilterType::Lanczos3);

        Ok(PreparedImage {
            tensor: to_tensor(&model_input),
            display,
        })
    }
}

/// Decode bytes into an RGB grid with EXIF orientation applied
fn decode_oriented_rgb(bytes: &[u8]) -> Result<RgbImage> {
    let format = image::guess_format(bytes).map_err(|e| PipelineError::unsupported(e.to_string()))?;
    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(PipelineError::unsupported(format!("{:?} images are not accepted", format)));
    }

    let mut decoder = ImageReader::with_format(Cursor::new(bytes), format)
        .into_decoder()
        .map_err(|e| PipelineError::unsupported(e.to_string()))?;

    // Missing or unreadable EXIF just means "stored upright"
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);

    let decoded = DynamicImage::from_decoder(decoder).map_err(|e| PipelineError::unsupported(e.to_string()))?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(PipelineError::unsupported("image has no pixels"));
    }

    // Alpha is dropped, grayscale expanded
    let mut rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());
    rgb.apply_orientation(orientation);
    Ok(rgb.into_rgb8())
}

/// Scale 0-255 channels to [0, 1] and prepend the batch axis
fn to_tensor(image: &RgbImage) -> InputTensor {
    let (width, height) = image.dimensions();
    let array = Array4::from_shape_fn(
        (1, height as usize, width as usize, 3),
        |(_, y, x, c)| image.get_pixel(x as u32, y as u32)[c] as f32 / 255.0,
    );
    InputTensor(array)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbaImage};

    pub(crate) fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        image.write_to(&mut cursor, format).unwrap();
        cursor.into_inner()
    }

    /// 28×28 grayscale PNG with a rough "7" stroke
    pub(crate) fn seven_png() -> Vec<u8> {
        let seven = GrayImage::from_fn(28, 28, |x, y| {
            let top_bar = (4..8).contains(&y) && (6..22).contains(&x);
            let diagonal = y >= 8 && y < 24 && (x as i32 - (21 - (y as i32 - 8) / 2)).abs() <= 1;
            if top_bar || diagonal {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        encode(&DynamicImage::ImageLuma8(seven), ImageFormat::Png)
    }

    fn assert_valid_tensor(tensor: &InputTensor) {
        assert_eq!(tensor.shape(), &INPUT_SHAPE);
        assert!(tensor.view().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_grayscale_png_becomes_rgb_tensor() {
        let prepared = ImagePreprocessor::new(280)
            .prepare(&ImageAsset::from_bytes(seven_png()))
            .unwrap();

        assert_valid_tensor(&prepared.tensor);
        assert_eq!(prepared.display.dimensions(), (280, 280));

        // Channels are identical for a grayscale source
        let view = prepared.tensor.view();
        for y in (0..128).step_by(16) {
            for x in (0..128).step_by(16) {
                assert_eq!(view[[0, y, x, 0]], view[[0, y, x, 1]]);
                assert_eq!(view[[0, y, x, 1]], view[[0, y, x, 2]]);
            }
        }
        // The stroke survived resampling
        assert!(view.iter().any(|v| *v > 0.5));
    }

    #[test]
    fn test_supported_encodings() {
        let source = DynamicImage::ImageRgb8(RgbImage::from_fn(40, 30, |x, y| {
            Rgb([(x * 6) as u8, (y * 8) as u8, 128])
        }));
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(17, 9, image::Rgba([10, 200, 30, 0])));

        let inputs = [
            encode(&source, ImageFormat::Jpeg),
            encode(&source, ImageFormat::Png),
            encode(&source, ImageFormat::Bmp),
            encode(&rgba, ImageFormat::Png),
        ];

        let preprocessor = ImagePreprocessor::new(280);
        for bytes in inputs {
            let prepared = preprocessor.prepare(&ImageAsset::from_bytes(bytes)).unwrap();
            assert_valid_tensor(&prepared.tensor);
        }
    }

    #[test]
    fn test_alpha_is_dropped_not_composited() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, image::Rgba([255, 0, 0, 0])));
        let prepared = ImagePreprocessor::new(280)
            .prepare(&ImageAsset::from_bytes(encode(&rgba, ImageFormat::Png)))
            .unwrap();

        let view = prepared.tensor.view();
        assert_eq!(view[[0, 64, 64, 0]], 1.0);
        assert_eq!(view[[0, 64, 64, 1]], 0.0);
    }

    #[test]
    fn test_identical_bytes_give_identical_tensors() {
        let bytes = seven_png();
        let preprocessor = ImagePreprocessor::new(280);
        let first = preprocessor.prepare(&ImageAsset::from_bytes(bytes.clone())).unwrap();
        let second = preprocessor.prepare(&ImageAsset::from_bytes(bytes)).unwrap();
        assert_eq!(first.tensor, second.tensor);
        assert_eq!(first.display, second.display);
    }

    #[test]
    fn test_unsupported_inputs() {
        let gif = encode(
            &DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]))),
            ImageFormat::Gif,
        );
        let mut truncated = seven_png();
        truncated.truncate(truncated.len() / 2);

        let inputs: Vec<Vec<u8>> = vec![
            b"just some notes, definitely not pixels\n".to_vec(),
            Vec::new(),
            gif,
            truncated,
            vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0],
        ];

        let preprocessor = ImagePreprocessor::new(280);
        for bytes in inputs {
            let err = preprocessor.prepare(&ImageAsset::from_bytes(bytes)).unwrap_err();
            assert!(matches!(err, PipelineError::UnsupportedFormat { .. }), "got {:?}", err);
        }
    }

    #[test]
    fn test_missing_file_is_unsupported() {
        let err = ImagePreprocessor::new(280)
            .prepare(&ImageAsset::from_path("/nonexistent/digit.png"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
    }

    /// Insert an APP1 EXIF segment carrying only an orientation tag
    fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
        let mut tiff = Vec::new();
        tiff.extend_from_slice(b"MM\0\x2a\0\0\0\x08");
        tiff.extend_from_slice(&1u16.to_be_bytes());
        tiff.extend_from_slice(&0x0112u16.to_be_bytes());
        tiff.extend_from_slice(&3u16.to_be_bytes());
        tiff.extend_from_slice(&1u32.to_be_bytes());
        tiff.extend_from_slice(&orientation.to_be_bytes());
        tiff.extend_from_slice(&[0, 0]);
        tiff.extend_from_slice(&0u32.to_be_bytes());

        let mut payload = b"Exif\0\0".to_vec();
        payload.extend_from_slice(&tiff);

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        out.extend_from_slice(&payload);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn test_exif_orientation_is_applied() {
        // Left half dark, right half bright
        let halves = RgbImage::from_fn(64, 32, |x, _| if x < 32 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) });
        let jpeg = encode(&DynamicImage::ImageRgb8(halves), ImageFormat::Jpeg);

        // 6 = rotate 90° clockwise: the dark half ends up on top
        let rotated = with_exif_orientation(&jpeg, 6);
        let prepared = ImagePreprocessor::new(280)
            .prepare(&ImageAsset::from_bytes(rotated))
            .unwrap();

        let display = &prepared.display;
        assert!(display.get_pixel(260, 20)[0] < 64);
        assert!(display.get_pixel(20, 260)[0] > 192);

        // The model input is built from the same oriented grid
        let tensor = prepared.tensor.view();
        assert!(tensor[[0, 10, 118, 0]] < 0.25);
        assert!(tensor[[0, 118, 10, 0]] > 0.75);
    }
}
