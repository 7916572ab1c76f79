// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Augmentation set — a fixed list of geometric and photometric variants of an
// image, all at the input's dimensions, plus a contact sheet that tiles them.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp};
use tracing::{debug, instrument};

use crate::raster::color::{Hsv, hsv_to_rgb, rgb_to_hsv};
use crate::raster::processor::ImageProcessor;

/// One named variant of the source image.
#[derive(Debug, Clone)]
pub struct Augmentation {
    pub name: &'static str,
    pub image: RgbImage,
}

const ZOOM_IN_FACTOR: f32 = 1.7;
const ZOOM_OUT_FACTOR: f32 = 0.7;
const TRANSLATION: (f32, f32) = (50.0, 30.0);
const SHEAR_X: f32 = 0.2;
const BRIGHTNESS_OFFSET: i32 = 50;
const CONTRAST_FACTOR: f32 = 1.5;
const SATURATION_FACTOR: f32 = 1.5;
const HUE_SHIFT_DEGREES: f32 = 60.0;

/// Produce every augmentation of `image`, in a fixed order.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn apply_augmentations(image: &RgbImage) -> Vec<Augmentation> {
    let processor = || ImageProcessor::from_rgb(image.clone());

    let augmentations = vec![
        Augmentation {
            name: "Flipped Horizontally",
            image: processor().flip_horizontal().into_rgb8(),
        },
        Augmentation {
            name: "Flipped Vertically",
            image: processor().flip_vertical().into_rgb8(),
        },
        Augmentation {
            name: "Flipped Horizontally and Vertically",
            image: processor().flip_horizontal().flip_vertical().into_rgb8(),
        },
        Augmentation {
            name: "Rotated 45 Degrees",
            image: processor().rotate_in_place(45.0).into_rgb8(),
        },
        Augmentation {
            name: "Rotated 90 Degrees",
            image: processor().rotate_in_place(90.0).into_rgb8(),
        },
        Augmentation {
            name: "Zoomed In",
            image: zoom_in(image, ZOOM_IN_FACTOR),
        },
        Augmentation {
            name: "Zoomed Out",
            image: zoom_out(image, ZOOM_OUT_FACTOR),
        },
        Augmentation {
            name: "Translated",
            image: shift(image, TRANSLATION),
        },
        Augmentation {
            name: "Sheared",
            image: shear(image, SHEAR_X),
        },
        Augmentation {
            name: "Brighter",
            image: processor().adjust_brightness(BRIGHTNESS_OFFSET).into_rgb8(),
        },
        Augmentation {
            name: "High Contrast",
            image: processor().scale_intensity(CONTRAST_FACTOR).into_rgb8(),
        },
        Augmentation {
            name: "More Saturated",
            image: map_hsv(image, |mut hsv| {
                hsv.s = (hsv.s * SATURATION_FACTOR).min(1.0);
                hsv
            }),
        },
        Augmentation {
            name: "Hue Shifted",
            image: map_hsv(image, |mut hsv| {
                hsv.h = (hsv.h + HUE_SHIFT_DEGREES).rem_euclid(360.0);
                hsv
            }),
        },
    ];
    debug!(count = augmentations.len(), "Augmentations produced");
    augmentations
}

/// Scale up and crop the center back to the original size.
fn zoom_in(image: &RgbImage, factor: f32) -> RgbImage {
    let (width, height) = image.dimensions();
    let scaled = ImageProcessor::from_rgb(image.clone()).scale(factor).into_rgb8();
    let start_x = scaled.width().saturating_sub(width) / 2;
    let start_y = scaled.height().saturating_sub(height) / 2;
    let crop_w = width.min(scaled.width());
    let crop_h = height.min(scaled.height());
    imageops::crop_imm(&scaled, start_x, start_y, crop_w, crop_h).to_image()
}

/// Scale down and center on a black canvas of the original size.
fn zoom_out(image: &RgbImage, factor: f32) -> RgbImage {
    let (width, height) = image.dimensions();
    let scaled = ImageProcessor::from_rgb(image.clone()).scale(factor).into_rgb8();
    let mut canvas = RgbImage::from_pixel(width, height, Rgb([0, 0, 0]));
    let pad_x = (width as i64 - scaled.width() as i64) / 2;
    let pad_y = (height as i64 - scaled.height() as i64) / 2;
    imageops::replace(&mut canvas, &scaled, pad_x, pad_y);
    canvas
}

/// Move the content by `(dx, dy)`, keeping the canvas. Uncovered pixels are
/// black.
fn shift(image: &RgbImage, (dx, dy): (f32, f32)) -> RgbImage {
    warp(
        image,
        &Projection::translate(dx, dy),
        Interpolation::Nearest,
        Rgb([0, 0, 0]),
    )
}

/// Horizontal shear `x' = x + factor * y`, keeping the canvas.
fn shear(image: &RgbImage, factor: f32) -> RgbImage {
    let matrix = [1.0, factor, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
    match Projection::from_matrix(matrix) {
        Some(projection) => warp(image, &projection, Interpolation::Bilinear, Rgb([0, 0, 0])),
        // Unreachable for a shear matrix (determinant 1).
        None => image.clone(),
    }
}

fn map_hsv(image: &RgbImage, f: impl Fn(Hsv) -> Hsv) -> RgbImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        *pixel = hsv_to_rgb(f(rgb_to_hsv(*pixel)));
    }
    out
}

// -- Contact sheet ------------------------------------------------------------

const SHEET_COLUMNS: u32 = 5;
const SHEET_TILE_MAX: u32 = 320;
const SHEET_GAP: u32 = 8;

/// Tile `original` followed by every augmentation into a grid, five tiles per
/// row, each tile scaled to fit `SHEET_TILE_MAX` pixels.
pub fn contact_sheet(original: &RgbImage, augmentations: &[Augmentation]) -> RgbImage {
    let (width, height) = original.dimensions();
    let fit = (SHEET_TILE_MAX as f32 / width.max(1) as f32)
        .min(SHEET_TILE_MAX as f32 / height.max(1) as f32)
        .min(1.0);
    let tile_w = ((width as f32 * fit).round() as u32).max(1);
    let tile_h = ((height as f32 * fit).round() as u32).max(1);

    let tiles: Vec<&RgbImage> = std::iter::once(original)
        .chain(augmentations.iter().map(|a| &a.image))
        .collect();
    let rows = (tiles.len() as u32).div_ceil(SHEET_COLUMNS);
    let sheet_w = SHEET_COLUMNS * tile_w + (SHEET_COLUMNS + 1) * SHEET_GAP;
    let sheet_h = rows * tile_h + (rows + 1) * SHEET_GAP;

    let mut sheet = RgbImage::from_pixel(sheet_w, sheet_h, Rgb([255, 255, 255]));
    for (index, tile) in tiles.iter().enumerate() {
        let col = index as u32 % SHEET_COLUMNS;
        let row = index as u32 / SHEET_COLUMNS;
        let resized = imageops::resize(*tile, tile_w, tile_h, FilterType::Triangle);
        let x = SHEET_GAP + col * (tile_w + SHEET_GAP);
        let y = SHEET_GAP + row * (tile_h + SHEET_GAP);
        imageops::replace(&mut sheet, &resized, x as i64, y as i64);
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RgbImage {
        RgbImage::from_fn(60, 40, |x, y| Rgb([(x * 4) as u8, (y * 6) as u8, 90]))
    }

    #[test]
    fn produces_every_variant_at_input_size() {
        let img = sample();
        let augmentations = apply_augmentations(&img);
        assert_eq!(augmentations.len(), 13);
        assert_eq!(augmentations[0].name, "Flipped Horizontally");
        assert_eq!(augmentations[12].name, "Hue Shifted");
        for aug in &augmentations {
            assert_eq!(aug.image.dimensions(), (60, 40), "{} changed size", aug.name);
        }
    }

    #[test]
    fn double_flip_rotates_by_half_turn() {
        let img = sample();
        let augmentations = apply_augmentations(&img);
        let both = &augmentations[2].image;
        assert_eq!(both.get_pixel(0, 0), img.get_pixel(59, 39));
    }

    #[test]
    fn translation_shifts_content_and_fills_black() {
        let img = sample();
        let moved = shift(&img, TRANSLATION);
        assert_eq!(moved.get_pixel(55, 35), img.get_pixel(5, 5));
        assert_eq!(*moved.get_pixel(10, 10), Rgb([0, 0, 0]));
        assert_eq!(*moved.get_pixel(59, 0), Rgb([0, 0, 0]));
        assert_eq!(*moved.get_pixel(0, 39), Rgb([0, 0, 0]));
    }

    #[test]
    fn translated_variant_has_black_margins() {
        let img = RgbImage::from_pixel(80, 60, Rgb([200, 200, 200]));
        let augmentations = apply_augmentations(&img);
        let moved = &augmentations[7];
        assert_eq!(moved.name, "Translated");
        assert_eq!(*moved.image.get_pixel(49, 45), Rgb([0, 0, 0]));
        assert_eq!(*moved.image.get_pixel(70, 29), Rgb([0, 0, 0]));
        assert_eq!(*moved.image.get_pixel(50, 30), Rgb([200, 200, 200]));
    }

    /// Black 40x40 canvas with a white block in the top-right corner.
    fn corner_block() -> RgbImage {
        RgbImage::from_fn(40, 40, |x, y| {
            if (28..38).contains(&x) && (2..12).contains(&y) {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        })
    }

    #[test]
    fn quarter_turn_is_counter_clockwise() {
        let augmentations = apply_augmentations(&corner_block());
        let rotated = &augmentations[4];
        assert_eq!(rotated.name, "Rotated 90 Degrees");
        // Top-right moves to top-left.
        assert!(rotated.image.get_pixel(7, 7).0[0] > 200);
        assert!(rotated.image.get_pixel(33, 7).0[0] < 50);
        assert!(rotated.image.get_pixel(7, 33).0[0] < 50);
    }

    #[test]
    fn eighth_turn_blackens_the_corners() {
        let white = RgbImage::from_pixel(40, 40, Rgb([255, 255, 255]));
        let augmentations = apply_augmentations(&white);
        let rotated = &augmentations[3];
        assert_eq!(rotated.name, "Rotated 45 Degrees");
        for (x, y) in [(0, 0), (39, 0), (0, 39), (39, 39)] {
            assert_eq!(*rotated.image.get_pixel(x, y), Rgb([0, 0, 0]), "corner {x},{y}");
        }
        assert!(rotated.image.get_pixel(20, 20).0[0] > 200);
    }

    #[test]
    fn shear_offsets_rows_by_their_height() {
        let line = RgbImage::from_fn(60, 40, |x, _| {
            if x == 10 { Rgb([255, 255, 255]) } else { Rgb([0, 0, 0]) }
        });
        let sheared = shear(&line, SHEAR_X);
        // Row 0 is unchanged; row 20 moves right by 0.2 * 20 = 4.
        assert!(sheared.get_pixel(10, 0).0[0] > 200);
        assert!(sheared.get_pixel(14, 20).0[0] > 200);
        assert!(sheared.get_pixel(10, 20).0[0] < 50);
    }

    #[test]
    fn saturation_is_scaled_and_clamped() {
        let close = |a: Rgb<u8>, b: [u8; 3]| a.0.iter().zip(b).all(|(p, q)| p.abs_diff(q) <= 1);

        let muted = RgbImage::from_pixel(2, 2, Rgb([200, 150, 100]));
        let saturated = &apply_augmentations(&muted)[11];
        assert_eq!(saturated.name, "More Saturated");
        // S 0.5 -> 0.75 at the same hue and value.
        let pixel = *saturated.image.get_pixel(0, 0);
        assert!(close(pixel, [200, 125, 50]), "got {pixel:?}");

        let strong = RgbImage::from_pixel(2, 2, Rgb([200, 40, 40]));
        // S 0.8 -> 1.2 clamps to fully saturated.
        let pixel = *apply_augmentations(&strong)[11].image.get_pixel(1, 1);
        assert!(close(pixel, [200, 0, 0]), "got {pixel:?}");
    }

    #[test]
    fn zoom_out_leaves_black_border() {
        let out = zoom_out(&sample(), ZOOM_OUT_FACTOR);
        assert_eq!(*out.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_ne!(*out.get_pixel(30, 20), Rgb([0, 0, 0]));
    }

    #[test]
    fn hue_shift_moves_red_towards_yellow() {
        let red = RgbImage::from_pixel(2, 2, Rgb([255, 0, 0]));
        let shifted = map_hsv(&red, |mut hsv| {
            hsv.h = (hsv.h + HUE_SHIFT_DEGREES).rem_euclid(360.0);
            hsv
        });
        assert_eq!(*shifted.get_pixel(0, 0), Rgb([255, 255, 0]));
    }

    #[test]
    fn contact_sheet_has_three_rows_of_five() {
        let img = sample();
        let augmentations = apply_augmentations(&img);
        let sheet = contact_sheet(&img, &augmentations);
        assert_eq!(sheet.width(), 5 * 60 + 6 * SHEET_GAP);
        assert_eq!(sheet.height(), 3 * 40 + 4 * SHEET_GAP);
    }
}
