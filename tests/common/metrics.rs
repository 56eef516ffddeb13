#[derive(Debug, Clone)]
pub struct PsnrResult {
    pub overall_psnr: f64,
    pub overall_mse: f64,
    pub channel_results: ChannelResults,
}

#[derive(Debug, Clone)]
pub struct ChannelResults {
    pub red: ChannelMetrics,
    pub green: ChannelMetrics,
    pub blue: ChannelMetrics,
}

#[derive(Debug, Clone)]
pub struct ChannelMetrics {
    pub psnr: f64,
    pub mse: f64,
}

fn srgb_to_linear(value: u8) -> f64 {
    let value = value as f64 / 255.0;
    if value <= 0.04045 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

fn psnr_from_mse(mse: f64) -> f64 {
    if mse == 0.0 {
        f64::INFINITY
    } else {
        10.0 * (1.0 / mse).log10()
    }
}

/// Calculates quality metrics for a given image. The input data and output
/// data must be BGRA8; the comparison happens in linear light and ignores
/// the alpha byte.
pub fn calculate_image_metrics(
    original: &[u8],
    compressed: &[u8],
    width: u32,
    height: u32,
) -> PsnrResult {
    if original.len() != compressed.len() {
        panic!("Image buffers must have same length");
    }
    if original.len() != (width * height * 4) as usize {
        panic!("Buffer size doesn't match dimensions");
    }

    let mut channel_mse = [0.0; 3];
    let pixel_count = (width * height) as f64;

    for index in (0..original.len()).step_by(4) {
        for channel in 0..3 {
            let orig = srgb_to_linear(original[index + channel]);
            let comp = srgb_to_linear(compressed[index + channel]);
            let diff = orig - comp;
            channel_mse[channel] += diff * diff;
        }
    }

    for mse in channel_mse.iter_mut() {
        *mse /= pixel_count;
    }

    // channel_mse is in blue/green/red buffer order.
    let overall_mse = (channel_mse[0] + channel_mse[1] + channel_mse[2]) / 3.0;

    PsnrResult {
        overall_psnr: psnr_from_mse(overall_mse),
        overall_mse,
        channel_results: ChannelResults {
            red: ChannelMetrics {
                psnr: psnr_from_mse(channel_mse[2]),
                mse: channel_mse[2],
            },
            green: ChannelMetrics {
                psnr: psnr_from_mse(channel_mse[1]),
                mse: channel_mse[1],
            },
            blue: ChannelMetrics {
                psnr: psnr_from_mse(channel_mse[0]),
                mse: channel_mse[0],
            },
        },
    }
}
