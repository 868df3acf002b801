//! Image preprocessing - encoded bytes to the model's input tensor

use candle_core::{Device, Tensor};
use image::imageops::{self, FilterType};

use crate::constants::IMAGE_SIZE;
use crate::services::error::PredictError;

/// Decode an image and turn it into a `[1, 224, 224, 3]` `f32` tensor with
/// every channel value scaled to `[0, 1]`.
///
/// Any format the `image` crate can guess from the bytes is accepted. Alpha is
/// dropped and grayscale is expanded so the result always has 3 channels.
pub fn image_to_tensor(bytes: &[u8]) -> Result<Tensor, PredictError> {
    if bytes.is_empty() {
        return Err(PredictError::EmptyInput);
    }

    let rgb = image::load_from_memory(bytes)
        .map_err(PredictError::Decode)?
        .to_rgb8();

    // Triangle is bilinear interpolation
    let resized = imageops::resize(&rgb, IMAGE_SIZE as u32, IMAGE_SIZE as u32, FilterType::Triangle);

    let data: Vec<f32> = resized
        .into_raw()
        .into_iter()
        .map(|v| v as f32 / 255.0)
        .collect();

    Tensor::from_vec(data, (1, IMAGE_SIZE, IMAGE_SIZE, 3), &Device::Cpu)
        .map_err(|e| PredictError::Unexpected(format!("building input tensor: {e}")))
}
