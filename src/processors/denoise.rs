//! Non-local-means denoising for grayscale images.
//!
//! Removes background texture (paper grain, print bleed) while preserving
//! glyph stroke edges, which is what MRZ decode accuracy depends on. For
//! every pixel, patches inside a search window are compared against the
//! patch centered on the pixel; similar patches contribute with weights
//! that fall off exponentially with patch distance.

use image::GrayImage;

/// Denoises a grayscale image with a non-local-means filter.
///
/// * `h` - filter strength; larger values remove more noise but blur detail.
/// * `template_window` - odd side length of the compared patches, in pixels.
/// * `search_window` - odd side length of the window scanned for similar
///   patches, in pixels.
///
/// Window sides are treated as radii around the center pixel; coordinates
/// outside the image clamp to the border.
pub fn nl_means_denoise(
    img: &GrayImage,
    h: f32,
    template_window: u32,
    search_window: u32,
) -> GrayImage {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return img.clone();
    }

    let t_radius = (template_window / 2) as i64;
    let s_radius = (search_window / 2) as i64;
    let h2 = (h * h).max(f32::EPSILON);
    let patch_size = ((2 * t_radius + 1) * (2 * t_radius + 1)) as f32;

    let clamp_px = |x: i64, y: i64| -> f32 {
        let cx = x.clamp(0, width as i64 - 1) as u32;
        let cy = y.clamp(0, height as i64 - 1) as u32;
        img.get_pixel(cx, cy).0[0] as f32
    };

    let mut out = GrayImage::new(width, height);

    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let mut weight_sum = 0.0f32;
            let mut value_sum = 0.0f32;

            for sy in -s_radius..=s_radius {
                for sx in -s_radius..=s_radius {
                    let qx = x + sx;
                    let qy = y + sy;

                    // Mean squared distance between the two patches.
                    let mut dist2 = 0.0f32;
                    for ty in -t_radius..=t_radius {
                        for tx in -t_radius..=t_radius {
                            let d = clamp_px(x + tx, y + ty) - clamp_px(qx + tx, qy + ty);
                            dist2 += d * d;
                        }
                    }
                    dist2 /= patch_size;

                    let weight = (-dist2 / h2).exp();
                    weight_sum += weight;
                    value_sum += weight * clamp_px(qx, qy);
                }
            }

            let value = (value_sum / weight_sum).round().clamp(0.0, 255.0) as u8;
            out.put_pixel(x as u32, y as u32, image::Luma([value]));
        }
    }

    out
}
