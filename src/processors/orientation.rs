//! Orientation normalization for document photos.
//!
//! Travel documents are landscape; a portrait photo is a sideways document.

use image::RgbImage;

/// Rotates a portrait image 90 degrees clockwise so the MRZ band runs along
/// the bottom edge.
///
/// Returns `Some(rotated)` when height exceeds width, `None` when the image
/// is already landscape (or square) and should be used unchanged. Never
/// fails.
pub fn normalize_orientation(img: &RgbImage) -> Option<RgbImage> {
    if img.height() > img.width() {
        Some(image::imageops::rotate90(img))
    } else {
        None
    }
}
