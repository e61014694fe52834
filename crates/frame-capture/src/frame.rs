//! Video frame type

use image::imageops::{self, FilterType};
use image::RgbImage;

/// Decoded RGB video frame
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Presentation timestamp (nanoseconds from stream start)
    pub timestamp_ns: u64,
    /// Frame index in the stream
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ns: u64, sequence: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ns,
            sequence,
        }
    }

    /// Wrap a decoded image
    pub fn from_rgb_image(image: RgbImage, timestamp_ns: u64, sequence: u32) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height, timestamp_ns, sequence)
    }

    /// Copy into an `image` buffer, `None` if the data length is inconsistent
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.data.clone())
    }

    /// Bilinear resize into an `image` buffer, `None` if the data length is inconsistent
    pub fn resized(&self, width: u32, height: u32) -> Option<RgbImage> {
        let image = self.to_rgb_image()?;
        if image.dimensions() == (width, height) {
            return Some(image);
        }
        Some(imageops::resize(&image, width, height, FilterType::Triangle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(width: u32, height: u32) -> VideoFrame {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        VideoFrame::new(data, width, height, 0, 0)
    }

    #[test]
    fn test_resize_interpolates() {
        let frame = VideoFrame::new(vec![0, 0, 0, 255, 255, 255], 2, 1, 0, 0);
        let resized = frame.resized(4, 1).unwrap();
        let row: Vec<u8> = resized.pixels().map(|p| p[0]).collect();
        assert_eq!(row, vec![0, 64, 191, 255]);
    }

    #[test]
    fn test_resize_dimensions() {
        let resized = checkerboard(8, 6).resized(4, 3).unwrap();
        assert_eq!(resized.dimensions(), (4, 3));
    }

    #[test]
    fn test_same_size_is_unchanged() {
        let frame = checkerboard(3, 2);
        assert_eq!(frame.resized(3, 2), frame.to_rgb_image());
    }

    #[test]
    fn test_inconsistent_data() {
        let frame = VideoFrame::new(vec![0; 5], 2, 1, 0, 0);
        assert!(frame.resized(4, 1).is_none());
    }

    #[test]
    fn test_image_round_trip() {
        let frame = checkerboard(3, 2);
        let image = frame.to_rgb_image().unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(VideoFrame::from_rgb_image(image, 0, 0), frame);
    }
}
