//! I/O helpers for frames, masks and JSON artifacts.
//!
//! - `load_grayscale_image`: read a PNG/JPEG/etc. into an owned 8-bit gray frame.
//! - `save_gray_png` / `save_mask_png`: write buffers to grayscale PNGs.
//! - `read_json_file` / `write_json_file`: (de)serialize values on disk.
use crate::frame::{GrayFrame, Mask};
use image::{DynamicImage, ImageBuffer, Luma};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit grayscale.
pub fn load_grayscale_image(path: &Path) -> Result<GrayFrame, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img.into_raw();
    Ok(GrayFrame::new(width, height, data))
}

/// Save an 8-bit grayscale frame to a PNG.
pub fn save_gray_png(frame: &GrayFrame, path: &Path) -> Result<(), String> {
    save_luma8(frame.width(), frame.height(), frame.as_bytes().to_vec(), path)
}

/// Save a binary mask to a PNG, foreground white on black.
pub fn save_mask_png(mask: &Mask, path: &Path) -> Result<(), String> {
    save_luma8(mask.w, mask.h, mask.data.clone(), path)
}

fn save_luma8(w: usize, h: usize, data: Vec<u8>, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let image: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::from_raw(w as u32, h as u32, data)
        .ok_or_else(|| "Failed to create image buffer".to_string())?;
    DynamicImage::ImageLuma8(image)
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Read and deserialize a JSON value from `path`.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read JSON {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("Failed to parse JSON {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_vec_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {e}", parent.display())),
        _ => Ok(()),
    }
}
