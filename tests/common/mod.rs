#![allow(dead_code)]

pub mod metrics;

use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder};

/// Builds a deterministic BGRA8 test texture: smooth per-channel gradients
/// with a low-amplitude diagonal pattern on top, so blocks are neither flat
/// nor pure noise.
pub fn synthetic_bgra_texture(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);

    for y in 0..height {
        for x in 0..width {
            let detail = if (x / 2 + y / 2) % 2 == 0 { 6 } else { -6 };

            let blue = (x * 255 / (width - 1)) as i32 + detail;
            let green = (y * 255 / (height - 1)) as i32 - detail;
            let red = ((x + y) * 255 / (width + height - 2)) as i32 + detail;

            data.push(blue.clamp(0, 255) as u8);
            data.push(green.clamp(0, 255) as u8);
            data.push(red.clamp(0, 255) as u8);
            data.push(255);
        }
    }

    data
}

/// Writes a BGRA8 buffer as PNG for manual inspection.
pub fn save_png(filename: &str, bgra_data: &[u8], width: u32, height: u32) {
    let mut rgba = bgra_data.to_vec();
    for px in rgba.chunks_exact_mut(4) {
        px.swap(0, 2);
    }

    let path = std::env::temp_dir().join(filename);
    let file = std::fs::File::create(path).unwrap();
    let encoder = PngEncoder::new(file);
    encoder
        .write_image(&rgba, width, height, ExtendedColorType::Rgba8)
        .unwrap();
}
