use std::path::Path;

use image::{GrayImage, Luma, RgbaImage};

use crate::error::IconError;

pub const DEFAULT_CORNER_RATIO: f64 = 0.176;

const OPAQUE: u8 = 255;
const TRANSPARENT: u8 = 0;

/// Corner radius in pixels for an image of the given width.
pub fn corner_radius(width: u32, ratio: f64) -> u32 {
    (width as f64 * ratio).floor() as u32
}

/// Hard-edged rounded rectangle spanning the whole `width` x `height` area.
///
/// A pixel is opaque when its centre falls inside the shape. Corner arcs are
/// circles of `radius` whose centres sit `radius` in from each edge.
pub fn rounded_rect_mask(width: u32, height: u32, radius: u32) -> GrayImage {
    let mut mask = GrayImage::from_pixel(width, height, Luma([TRANSPARENT]));
    let w = width as f64;
    let h = height as f64;
    let r = radius as f64;

    for (x, y, pixel) in mask.enumerate_pixels_mut() {
        let px = x as f64 + 0.5;
        let py = y as f64 + 0.5;
        if inside_rounded_rect(px, py, w, h, r) {
            *pixel = Luma([OPAQUE]);
        }
    }
    mask
}

fn inside_rounded_rect(px: f64, py: f64, w: f64, h: f64, r: f64) -> bool {
    let nearest = |p: f64, extent: f64| {
        if p < r {
            r
        } else if p > extent - r {
            extent - r
        } else {
            p
        }
    };
    let dx = px - nearest(px, w);
    let dy = py - nearest(py, h);
    dx * dx + dy * dy <= r * r
}

/// Overwrites the alpha channel of `image` with `mask`. Colour is untouched.
pub fn apply_mask(image: &mut RgbaImage, mask: &GrayImage) -> Result<(), IconError> {
    if image.dimensions() != mask.dimensions() {
        return Err(IconError::MaskMismatch {
            image: image.dimensions(),
            mask: mask.dimensions(),
        });
    }
    for (pixel, alpha) in image.pixels_mut().zip(mask.pixels()) {
        pixel.0[3] = alpha.0[0];
    }
    Ok(())
}

/// Decodes `path` as RGBA, whatever its original layout.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, IconError> {
    let file_access = |source| IconError::FileAccess {
        path: path.to_path_buf(),
        source,
    };
    let reader = image::io::Reader::open(path)
        .map_err(file_access)?
        .with_guessed_format()
        .map_err(file_access)?;
    let decoded = reader.decode().map_err(|source| IconError::ImageFormat {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decoded.to_rgba8())
}

/// Loads the source and replaces its alpha with the rounded-corner mask.
pub fn masked_source(path: &Path, ratio: f64) -> Result<RgbaImage, IconError> {
    let mut image = load_rgba(path)?;
    let (width, height) = image.dimensions();
    let radius = corner_radius(width, ratio);
    log::debug!("Masking {} ({width}x{height}) with corner radius {radius}", path.display());

    let mask = rounded_rect_mask(width, height, radius);
    apply_mask(&mut image, &mask)?;
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_corner_radius() {
        assert_eq!(corner_radius(1024, DEFAULT_CORNER_RATIO), 180);
        assert_eq!(corner_radius(512, DEFAULT_CORNER_RATIO), 90);
        assert_eq!(corner_radius(16, DEFAULT_CORNER_RATIO), 2);
        assert_eq!(corner_radius(5, DEFAULT_CORNER_RATIO), 0);
    }

    #[test]
    fn test_mask_center_and_corners() {
        let mask = rounded_rect_mask(1024, 1024, 180);
        assert_eq!(mask.get_pixel(512, 512).0[0], OPAQUE);
        for (x, y) in [(0, 0), (1, 1), (1022, 1), (1, 1022), (1022, 1022), (1023, 1023)] {
            assert_eq!(mask.get_pixel(x, y).0[0], TRANSPARENT, "pixel ({x}, {y})");
        }
        // Edge midpoints lie on the straight sides.
        for (x, y) in [(512, 0), (0, 512), (1023, 512), (512, 1023)] {
            assert_eq!(mask.get_pixel(x, y).0[0], OPAQUE, "pixel ({x}, {y})");
        }
    }

    #[test]
    fn test_mask_is_symmetric() {
        let mask = rounded_rect_mask(64, 64, 11);
        for y in 0..64 {
            for x in 0..64 {
                let v = mask.get_pixel(x, y).0[0];
                assert_eq!(v, mask.get_pixel(63 - x, y).0[0]);
                assert_eq!(v, mask.get_pixel(x, 63 - y).0[0]);
            }
        }
    }

    #[test]
    fn test_zero_radius_is_fully_opaque() {
        let mask = rounded_rect_mask(5, 5, 0);
        assert!(mask.pixels().all(|p| p.0[0] == OPAQUE));
    }

    #[test]
    fn test_apply_mask_replaces_alpha() {
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([10, 20, 30, 77]));
        let mut mask = GrayImage::new(2, 1);
        mask.put_pixel(0, 0, Luma([255]));
        mask.put_pixel(1, 0, Luma([0]));

        apply_mask(&mut image, &mask).unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
        assert_eq!(image.get_pixel(1, 0), &Rgba([10, 20, 30, 0]));
    }

    #[test]
    fn test_apply_mask_rejects_size_mismatch() {
        let mut image = RgbaImage::new(4, 4);
        let mask = GrayImage::new(3, 4);
        assert!(matches!(
            apply_mask(&mut image, &mask),
            Err(IconError::MaskMismatch { image: (4, 4), mask: (3, 4) })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("icon-asset-generator-no-such-file.png");
        assert!(matches!(load_rgba(&path), Err(IconError::FileAccess { .. })));
    }

    #[test]
    fn test_load_undecodable_file() {
        let path = std::env::temp_dir()
            .join(format!("icon-asset-generator-garbage-{}.png", std::process::id()));
        std::fs::write(&path, b"definitely not an image").unwrap();
        let result = load_rgba(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(IconError::ImageFormat { .. })));
    }
}
