//! Crop screenshots to their visible content.

use image::RgbaImage;

/// Bounding box `(x, y, width, height)` of all pixels whose alpha is at
/// least `min_alpha`.
pub fn content_bounds(img: &RgbaImage, min_alpha: u8) -> Option<(u32, u32, u32, u32)> {
    let min_alpha = min_alpha.max(1);
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut any = false;

    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel[3] < min_alpha {
            continue;
        }
        any = true;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    any.then(|| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Remove fully transparent borders. Returns `None` for an image with no
/// visible pixels.
pub fn trim_transparent(img: &RgbaImage) -> Option<RgbaImage> {
    trim_below_alpha(img, 1)
}

/// Crop to the box of pixels at least `min_alpha` opaque. Fainter pixels
/// outside that box (drop shadows, glows) are cut away; fainter pixels
/// inside it are kept.
pub fn trim_below_alpha(img: &RgbaImage, min_alpha: u8) -> Option<RgbaImage> {
    let (x, y, w, h) = content_bounds(img, min_alpha)?;
    Some(image::imageops::crop_imm(img, x, y, w, h).to_image())
}
