use crate::error::{Result, ToneWaveError};
use crate::sstv::SstvCodec;
use image::{ColorType, DynamicImage, GrayImage};
use std::path::Path;

/// Accept only single-channel 8-bit images of the codec's fixed size
pub fn require_grayscale(image: DynamicImage) -> Result<GrayImage> {
    if image.color() != ColorType::L8 {
        return Err(ToneWaveError::UnsupportedImage(format!(
            "expected 8-bit grayscale, got {:?}",
            image.color()
        )));
    }
    let gray = image.into_luma8();
    SstvCodec::check_image(&gray)?;
    Ok(gray)
}

pub fn load_grayscale<P: AsRef<Path>>(path: P) -> Result<GrayImage> {
    let image = image::open(path)?;
    require_grayscale(image)
}

/// Save a decoded image; the file format follows the extension
pub fn save_grayscale<P: AsRef<Path>>(path: P, image: &GrayImage) -> Result<()> {
    image.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sstv::{SSTV_HEIGHT, SSTV_WIDTH};
    use image::{Rgb, RgbImage};

    #[test]
    fn test_accepts_grayscale() {
        let image = DynamicImage::ImageLuma8(GrayImage::new(SSTV_WIDTH, SSTV_HEIGHT));
        assert!(require_grayscale(image).is_ok());
    }

    #[test]
    fn test_rejects_color() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            SSTV_WIDTH,
            SSTV_HEIGHT,
            Rgb([10, 20, 30]),
        ));
        assert!(matches!(
            require_grayscale(image),
            Err(ToneWaveError::UnsupportedImage(_))
        ));
    }

    #[test]
    fn test_rejects_wrong_size() {
        let image = DynamicImage::ImageLuma8(GrayImage::new(16, 16));
        assert!(matches!(
            require_grayscale(image),
            Err(ToneWaveError::UnsupportedImage(_))
        ));
    }
}
