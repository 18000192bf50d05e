//! Contrast-limited adaptive histogram equalization (CLAHE).
//!
//! Global equalization over a document photo is dominated by the portrait
//! and background; equalizing per tile lifts faint MRZ strokes without
//! blowing out the rest. The clip limit caps how much any single intensity
//! can be amplified, which keeps flat paper regions from turning to noise.

use image::GrayImage;

/// Per-tile remapping table from input intensity to equalized intensity.
type TileLut = [u8; 256];

/// Builds the clipped, redistributed equalization table for one tile.
fn build_tile_lut(img: &GrayImage, x0: u32, y0: u32, x1: u32, y1: u32, clip_limit: f32) -> TileLut {
    let area = ((x1 - x0) * (y1 - y0)) as u64;
    let mut lut = [0u8; 256];
    if area == 0 {
        // Degenerate tile: identity mapping.
        for (i, v) in lut.iter_mut().enumerate() {
            *v = i as u8;
        }
        return lut;
    }

    let mut hist = [0u64; 256];
    for y in y0..y1 {
        for x in x0..x1 {
            hist[img.get_pixel(x, y).0[0] as usize] += 1;
        }
    }

    // Clip each bin and pool the excess.
    let clip = ((clip_limit * area as f32 / 256.0).max(1.0)) as u64;
    let mut excess = 0u64;
    for bin in hist.iter_mut() {
        if *bin > clip {
            excess += *bin - clip;
            *bin = clip;
        }
    }

    // Redistribute the excess uniformly across all bins.
    let bonus = excess / 256;
    let remainder = (excess % 256) as usize;
    for bin in hist.iter_mut() {
        *bin += bonus;
    }
    for bin in hist.iter_mut().take(remainder) {
        *bin += 1;
    }

    // Cumulative distribution scaled to the output range.
    let scale = 255.0 / area as f32;
    let mut cumulative = 0u64;
    for (i, &count) in hist.iter().enumerate() {
        cumulative += count;
        lut[i] = (cumulative as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }

    lut
}

/// Applies CLAHE over a `grid x grid` tiling with the given clip limit.
///
/// Each pixel is remapped by bilinear interpolation between the
/// equalization tables of the four nearest tile centers, which removes the
/// block seams a per-tile lookup would produce.
pub fn clahe(img: &GrayImage, grid: u32, clip_limit: f32) -> GrayImage {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return img.clone();
    }

    let tiles = grid.max(1) as usize;

    // Tile boundaries by even division; trailing tiles absorb the remainder.
    let x_bound = |tx: usize| (tx as u64 * width as u64 / tiles as u64) as u32;
    let y_bound = |ty: usize| (ty as u64 * height as u64 / tiles as u64) as u32;

    let mut luts: Vec<TileLut> = Vec::with_capacity(tiles * tiles);
    for ty in 0..tiles {
        for tx in 0..tiles {
            luts.push(build_tile_lut(
                img,
                x_bound(tx),
                y_bound(ty),
                x_bound(tx + 1),
                y_bound(ty + 1),
                clip_limit,
            ));
        }
    }

    let tile_w = width as f32 / tiles as f32;
    let tile_h = height as f32 / tiles as f32;
    let max_tile = (tiles - 1) as f32;

    let mut out = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let value = img.get_pixel(x, y).0[0] as usize;

            // Position relative to tile centers.
            let fx = ((x as f32 + 0.5) / tile_w - 0.5).clamp(0.0, max_tile);
            let fy = ((y as f32 + 0.5) / tile_h - 0.5).clamp(0.0, max_tile);
            let tx0 = fx.floor() as usize;
            let ty0 = fy.floor() as usize;
            let tx1 = (tx0 + 1).min(tiles - 1);
            let ty1 = (ty0 + 1).min(tiles - 1);
            let wx = fx - tx0 as f32;
            let wy = fy - ty0 as f32;

            let v00 = luts[ty0 * tiles + tx0][value] as f32;
            let v10 = luts[ty0 * tiles + tx1][value] as f32;
            let v01 = luts[ty1 * tiles + tx0][value] as f32;
            let v11 = luts[ty1 * tiles + tx1][value] as f32;

            let top = v00 * (1.0 - wx) + v10 * wx;
            let bottom = v01 * (1.0 - wx) + v11 * wx;
            let blended = (top * (1.0 - wy) + bottom * wy).round().clamp(0.0, 255.0);

            out.put_pixel(x, y, image::Luma([blended as u8]));
        }
    }

    out
}
