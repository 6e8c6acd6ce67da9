// On-demand PNG export of the frame currently on screen.

use crate::error::Error;
use crate::types::FrameBuffer;
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Unpack the 0x00RRGGBB backing buffer into an 8-bit RGB image.
fn to_rgb_image(fb: &FrameBuffer) -> RgbImage {
    let mut img = RgbImage::new(fb.width as u32, fb.height as u32);
    for (x, y, px) in img.enumerate_pixels_mut() {
        let packed = fb.pixels[y as usize * fb.width + x as usize];
        *px = Rgb([
            ((packed >> 16) & 0xFF) as u8,
            ((packed >> 8) & 0xFF) as u8,
            (packed & 0xFF) as u8,
        ]);
    }
    img
}

/// Encode the backing buffer as a PNG at `path`.
pub fn save_png(fb: &FrameBuffer, path: &Path) -> Result<(), Error> {
    to_rgb_image(fb).save(path)?;
    Ok(())
}

/// Timestamped file name in the working directory.
pub fn default_path() -> PathBuf {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    PathBuf::from(format!("orbfield-{secs}.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpack_preserves_channel_order() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.pixels[0] = 0x00102030;
        fb.pixels[1] = 0x00FFEEDD;
        let img = to_rgb_image(&fb);
        assert_eq!(img.get_pixel(0, 0).0, [0x10, 0x20, 0x30]);
        assert_eq!(img.get_pixel(1, 0).0, [0xFF, 0xEE, 0xDD]);
    }

    #[test]
    fn default_path_is_a_png_in_the_working_directory() {
        let path = default_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        assert!(path.parent().is_some_and(|p| p.as_os_str().is_empty()));
    }
}
