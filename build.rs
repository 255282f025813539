use image::GenericImageView;
use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Build time panel configuration read by `Config::from_build_env`
const CONFIG_VARS: [&str; 6] = [
    "EPD_PIN_SLOT",
    "EPD_BUSY_POLARITY",
    "EPD_BUSY_TIMEOUT_MS",
    "EPD_BUSY_SETTLE_MS",
    "EPD_LUT_MODE",
    "EPD_ORIENTATION",
];

/// Convert PNG image to a 1 bpp bitmap at build time
///
/// Rows are packed MSB first, a set bit is a black pixel.
fn convert_image_to_binary(
    input_path: &str,
    output_path: &Path,
    target_width: u32,
    target_height: u32,
    threshold: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed={}", input_path);

    if !Path::new(input_path).exists() {
        println!("cargo:warning=Image file '{}' not found, skipping conversion", input_path);
        // Empty blob, the firmware skips the logo
        File::create(output_path)?;
        return Ok(());
    }

    let img = image::open(input_path)?;
    let (orig_width, orig_height) = img.dimensions();

    // Fit inside the target, preserving the aspect ratio
    let orig_ratio = orig_width as f32 / orig_height as f32;
    let target_ratio = target_width as f32 / target_height as f32;
    let (new_width, new_height) = if orig_ratio > target_ratio {
        (target_width, (target_width as f32 / orig_ratio) as u32)
    } else {
        ((target_height as f32 * orig_ratio) as u32, target_height)
    };

    let gray = img
        .resize(new_width, new_height, image::imageops::FilterType::Lanczos3)
        .to_luma8();

    let bytes_per_row = target_width.div_ceil(8);
    let mut buffer = vec![0u8; (bytes_per_row * target_height) as usize];

    // Centre the image, everything around it stays white
    let offset_x = (target_width - gray.width()) / 2;
    let offset_y = (target_height - gray.height()) / 2;

    for (ix, iy, pixel) in gray.enumerate_pixels() {
        if pixel[0] < threshold {
            let x = ix + offset_x;
            let y = iy + offset_y;
            let byte_index = (y * bytes_per_row + x / 8) as usize;
            buffer[byte_index] |= 0x80 >> (x % 8);
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(&buffer)?;

    println!(
        "cargo:warning=Logo {}x{} -> {}x{}, {} bytes",
        orig_width,
        orig_height,
        target_width,
        target_height,
        buffer.len()
    );
    Ok(())
}

fn main() {
    if env::var_os("CARGO_FEATURE_ESP").is_some() {
        embuild::espidf::sysenv::output();
    }

    for var in CONFIG_VARS {
        println!("cargo:rerun-if-env-changed={}", var);
    }

    let Some(out_dir) = env::var_os("OUT_DIR") else {
        println!("cargo:warning=OUT_DIR not set, logo not converted");
        return;
    };

    // Landscape canvas size
    let logo_output = Path::new(&out_dir).join("logo.bin");
    if let Err(e) = convert_image_to_binary("logo.png", &logo_output, 296, 128, 128) {
        println!("cargo:warning=Failed to convert logo.png: {}", e);
        // keep include_bytes! working
        let _ = File::create(&logo_output);
    }
}
