//! Scale a pointer image and write it as PNG.

use std::path::PathBuf;

use anyhow::Context;
use image::RgbaImage;
use shakefind_cursor_transform::scale;
use shakefind_pointer_model::{ColorPlane, Hotspot, MaskPlane, PointerImage};

pub fn run(
    input: Option<PathBuf>,
    hotspot: &str,
    factor: f64,
    output: PathBuf,
) -> anyhow::Result<()> {
    let source = match &input {
        Some(path) => {
            let rgba = image::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?
                .to_rgba8();
            pointer_from_rgba(&rgba, parse_hotspot(hotspot)?)?
        }
        None => PointerImage::synthetic_arrow(),
    };

    let scaled = scale(&source, factor)?;
    let rgba = rgba_from_pointer(&scaled)?;
    rgba.save(&output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "{}x{} hotspot ({}, {}) -> {}x{} hotspot ({}, {})",
        source.width,
        source.height,
        source.hotspot.x,
        source.hotspot.y,
        scaled.width,
        scaled.height,
        scaled.hotspot.x,
        scaled.hotspot.y
    );
    println!("Wrote {}", output.display());
    Ok(())
}

fn parse_hotspot(value: &str) -> anyhow::Result<Hotspot> {
    let (x, y) = value
        .split_once(',')
        .with_context(|| format!("hotspot '{value}' is not X,Y"))?;
    let x = x.trim().parse().with_context(|| format!("bad hotspot x '{x}'"))?;
    let y = y.trim().parse().with_context(|| format!("bad hotspot y '{y}'"))?;
    Ok(Hotspot::new(x, y))
}

/// Pixels with alpha below 128 become transparent in the AND mask.
fn pointer_from_rgba(rgba: &RgbaImage, hotspot: Hotspot) -> anyhow::Result<PointerImage> {
    let (width, height) = rgba.dimensions();
    let inverted_alpha: Vec<u8> = rgba.pixels().map(|px| 255 - px.0[3]).collect();
    let mask = MaskPlane::from_luma(width, height, &inverted_alpha, 128);
    let color = ColorPlane::from_rgba(width, height, rgba.as_raw().clone())?;
    Ok(PointerImage::with_color(color, mask, hotspot)?)
}

/// Monochrome pointers render as black and white over a transparent background.
fn rgba_from_pointer(pointer: &PointerImage) -> anyhow::Result<RgbaImage> {
    let bytes = match (&pointer.color, pointer.monochrome_halves()) {
        (Some(color), _) => color.as_bytes().to_vec(),
        (None, Some((and_mask, xor_mask))) => {
            let mut bytes = Vec::with_capacity(pointer.width as usize * pointer.height as usize * 4);
            for y in 0..pointer.height {
                for x in 0..pointer.width {
                    let px = match (and_mask.get(x, y), xor_mask.get(x, y)) {
                        (false, false) => [0, 0, 0, 255],
                        (false, true) => [255, 255, 255, 255],
                        (true, _) => [0, 0, 0, 0],
                    };
                    bytes.extend_from_slice(&px);
                }
            }
            bytes
        }
        (None, None) => anyhow::bail!("pointer has neither color nor monochrome planes"),
    };
    RgbaImage::from_raw(pointer.width, pointer.height, bytes)
        .context("pixel buffer does not match the pointer size")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hotspot_pairs() {
        assert_eq!(parse_hotspot("3, 4").unwrap(), Hotspot::new(3, 4));
        assert!(parse_hotspot("3").is_err());
        assert!(parse_hotspot("a,4").is_err());
        assert!(parse_hotspot("-1,4").is_err());
    }

    #[test]
    fn transparent_pixels_set_the_mask() {
        let mut rgba = RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        rgba.put_pixel(1, 0, image::Rgba([0, 0, 0, 0]));

        let pointer = pointer_from_rgba(&rgba, Hotspot::new(1, 0)).unwrap();
        assert!(!pointer.mask.get(0, 0));
        assert!(pointer.mask.get(1, 0));
        assert_eq!(pointer.color.as_ref().unwrap().pixel(0, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn scaled_arrow_renders_to_png_buffer() {
        let scaled = scale(&PointerImage::synthetic_arrow(), 2.0).unwrap();
        let rgba = rgba_from_pointer(&scaled).unwrap();
        assert_eq!(rgba.dimensions(), (scaled.width, scaled.height));
    }

    #[test]
    fn monochrome_pointer_renders_black_and_white() {
        let mut and_mask = MaskPlane::filled(2, 1, true);
        and_mask.set(0, 0, false);
        let mut xor_mask = MaskPlane::filled(2, 1, false);
        xor_mask.set(0, 0, true);
        let pointer = PointerImage::monochrome(&and_mask, &xor_mask, Hotspot::new(0, 0)).unwrap();

        let rgba = rgba_from_pointer(&pointer).unwrap();
        assert_eq!(rgba.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(rgba.get_pixel(1, 0).0[3], 0);
    }
}
