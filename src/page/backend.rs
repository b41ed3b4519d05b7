//! Recognition backend and image preprocessing abstractions.
//!
//! The page orchestrator never talks to a recognition engine or an image
//! library directly. Layout analysis and text recognition go through
//! [`RecognitionBackend`], pixel work through [`ImagePreprocessor`].

use super::ProgressSink;
use crate::error::Result;
use crate::model::{BoundingBox, OcrBox};
use std::path::{Path, PathBuf};

/// Layout analysis and text recognition engine.
pub trait RecognitionBackend: Send + Sync {
    /// Segment `region` of the image into classified boxes.
    fn analyze_layout(&self, image: &Path, region: BoundingBox) -> Result<Vec<OcrBox>>;

    /// Recognize the given boxes, filling in their results and confidence.
    fn recognize(
        &self,
        image: &Path,
        boxes: &mut [&mut OcrBox],
        progress: Option<&dyn ProgressSink>,
    ) -> Result<()>;
}

/// Pixel-level helpers needed before recognition.
pub trait ImagePreprocessor: Send + Sync {
    /// Width and height of the image in pixels.
    fn image_size(&self, image: &Path) -> Result<(u32, u32)>;

    /// Write a copy of `image` into `out_dir` with `regions` painted over,
    /// returning the path of the copy. The source image is left untouched.
    fn erase_regions(&self, image: &Path, regions: &[BoundingBox], out_dir: &Path)
        -> Result<PathBuf>;
}

/// Preprocessor backed by the `image` crate.
///
/// Erased regions are filled with opaque white.
#[cfg(feature = "raster")]
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterPreprocessor;

#[cfg(feature = "raster")]
impl RasterPreprocessor {
    /// Create a preprocessor.
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "raster")]
impl ImagePreprocessor for RasterPreprocessor {
    fn image_size(&self, image: &Path) -> Result<(u32, u32)> {
        Ok(image::image_dimensions(image)?)
    }

    fn erase_regions(
        &self,
        image: &Path,
        regions: &[BoundingBox],
        out_dir: &Path,
    ) -> Result<PathBuf> {
        let mut pixels = image::open(image)?.to_rgba8();
        let (width, height) = pixels.dimensions();
        let white = image::Rgba([255, 255, 255, 255]);

        for region in regions {
            let x0 = region.x.clamp(0, width as i32) as u32;
            let y0 = region.y.clamp(0, height as i32) as u32;
            let x1 = region.right().clamp(0, width as i32) as u32;
            let y1 = region.bottom().clamp(0, height as i32) as u32;

            for y in y0..y1 {
                for x in x0..x1 {
                    pixels.put_pixel(x, y, white);
                }
            }
        }

        let file_name = image
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "page".to_string());
        let output = out_dir.join(format!("{}_erased.png", file_name));
        pixels.save(&output)?;

        log::debug!(
            "Erased {} regions from {} into {}",
            regions.len(),
            image.display(),
            output.display()
        );
        Ok(output)
    }
}

#[cfg(all(test, feature = "raster"))]
mod tests {
    use super::*;

    #[test]
    fn test_erase_regions_on_copy() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("scan.png");
        let black = image::RgbaImage::from_pixel(20, 10, image::Rgba([0, 0, 0, 255]));
        black.save(&source).unwrap();

        let out_dir = tempfile::tempdir().unwrap();
        let preprocessor = RasterPreprocessor::new();
        assert_eq!(preprocessor.image_size(&source).unwrap(), (20, 10));

        let erased = preprocessor
            .erase_regions(&source, &[BoundingBox::new(15, 5, 100, 100)], out_dir.path())
            .unwrap();
        assert_ne!(erased, source);

        let copy = image::open(&erased).unwrap().to_rgba8();
        assert_eq!(copy.get_pixel(16, 6), &image::Rgba([255, 255, 255, 255]));
        assert_eq!(copy.get_pixel(0, 0), &image::Rgba([0, 0, 0, 255]));

        let original = image::open(&source).unwrap().to_rgba8();
        assert_eq!(original.get_pixel(16, 6), &image::Rgba([0, 0, 0, 255]));
    }
}
