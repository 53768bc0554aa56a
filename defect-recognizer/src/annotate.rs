use std::io::Cursor;

use base64::prelude::*;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};
use sanitation_core::Detection;

const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const BOX_THICKNESS: i32 = 2;

/// Draw a box around every detection on a copy of `image`.
///
/// Boxes are clamped to the image; degenerate ones are skipped.
pub fn draw_detections(image: &DynamicImage, detections: &[Detection]) -> RgbImage {
    let mut canvas = image.to_rgb8();
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);

    if width == 0 || height == 0 {
        return canvas;
    }

    for detection in detections {
        let [x1, y1, x2, y2] = detection.bbox;

        let x_min = (x1.floor() as i32).clamp(0, width - 1);
        let y_min = (y1.floor() as i32).clamp(0, height - 1);
        let x_max = (x2.ceil() as i32).clamp(0, width - 1);
        let y_max = (y2.ceil() as i32).clamp(0, height - 1);

        for inset in 0..BOX_THICKNESS {
            let box_width = x_max - x_min - 2 * inset + 1;
            let box_height = y_max - y_min - 2 * inset + 1;
            if box_width <= 0 || box_height <= 0 {
                break;
            }

            let rect = Rect::at(x_min + inset, y_min + inset)
                .of_size(box_width as u32, box_height as u32);
            draw_hollow_rect_mut(&mut canvas, rect, BOX_COLOR);
        }
    }

    canvas
}

pub fn encode_jpeg(image: &RgbImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    let mut cursor = Cursor::new(&mut buf);
    image.write_to(&mut cursor, ImageFormat::Jpeg)?;

    Ok(buf)
}

pub fn to_base64(jpeg: &[u8]) -> String {
    BASE64_STANDARD.encode(jpeg)
}
