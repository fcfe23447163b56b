//! image 与 tensor 相互转换
//!
use candle_core::{DType, Device, Tensor};
use image::{DynamicImage, GenericImageView, GrayImage, ImageBuffer, Rgb, RgbImage};

use crate::error::Error;

/// 将 OpenCV 的原始帧转换为 RGB 图像
///
/// data: HWC, 通道顺序为 BGR / BGRA / 灰度
pub fn bgr_frame_to_image(
    data: Vec<u8>,
    height: usize,
    width: usize,
    channels: usize,
) -> Result<DynamicImage, Error> {
    if data.len() != height * width * channels {
        return Err(Error::InvalidTensorShape(format!(
            "frame buffer has {} bytes, expected {height}x{width}x{channels}",
            data.len()
        )));
    }

    match channels {
        1 => {
            let img_buffer = GrayImage::from_raw(width as u32, height as u32, data)
                .ok_or(Error::ImageBuffer)?;
            Ok(DynamicImage::ImageLuma8(img_buffer))
        }
        3 | 4 => {
            // BGR(A) -> RGB, alpha 通道直接丢弃
            let rgb: Vec<u8> = data
                .chunks_exact(channels)
                .flat_map(|p| [p[2], p[1], p[0]])
                .collect();
            let img_buffer: RgbImage =
                ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(width as u32, height as u32, rgb)
                    .ok_or(Error::ImageBuffer)?;
            Ok(DynamicImage::ImageRgb8(img_buffer))
        }
        n => Err(Error::UnsupportedNumberOfChannels(n as u32)),
    }
}

/// 将图像转换为张量
///
/// output: HWC, 取值范围 [0, 1]
pub fn image_to_tensor(image: &DynamicImage, device: &Device) -> Result<Tensor, Error> {
    let (width, height) = image.dimensions();

    let img_buffer = image.to_rgb32f().into_raw();
    // HWC
    let tensor = Tensor::from_vec(img_buffer, (height as usize, width as usize, 3), device)?;

    Ok(tensor)
}

/// 纯黑图像
///
/// output: NHWC
pub fn black_image_tensor(height: usize, width: usize, device: &Device) -> Result<Tensor, Error> {
    let tensor = Tensor::zeros((1, height, width, 3), DType::F32, device)?;
    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bgr_frame_swaps_channels() -> anyhow::Result<()> {
        // 1x2: 第一个像素纯蓝(BGR), 第二个像素纯红(BGR)
        let data = vec![255, 0, 0, 0, 0, 255];
        let image = bgr_frame_to_image(data, 1, 2, 3)?;
        let tensor = image_to_tensor(&image, &Device::Cpu)?;

        assert_eq!(tensor.dims(), &[1, 2, 3]);
        let pixels = tensor.to_vec3::<f32>()?;
        assert_eq!(pixels[0][0], vec![0.0, 0.0, 1.0]);
        assert_eq!(pixels[0][1], vec![1.0, 0.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_bgra_frame_drops_alpha() -> anyhow::Result<()> {
        let data = vec![10, 20, 30, 255, 40, 50, 60, 0];
        let image = bgr_frame_to_image(data, 2, 1, 4)?;
        let rgb = image.to_rgb8();

        assert_eq!(rgb.get_pixel(0, 0).0, [30, 20, 10]);
        assert_eq!(rgb.get_pixel(0, 1).0, [60, 50, 40]);
        Ok(())
    }

    #[test]
    fn test_gray_frame_is_expanded_to_rgb() -> anyhow::Result<()> {
        let image = bgr_frame_to_image(vec![0, 255], 1, 2, 1)?;
        let tensor = image_to_tensor(&image, &Device::Cpu)?;

        let pixels = tensor.to_vec3::<f32>()?;
        assert_eq!(pixels[0][0], vec![0.0, 0.0, 0.0]);
        assert_eq!(pixels[0][1], vec![1.0, 1.0, 1.0]);
        Ok(())
    }

    #[test]
    fn test_normalized_values() -> anyhow::Result<()> {
        let image = bgr_frame_to_image(vec![0, 128, 51], 1, 1, 3)?;
        let tensor = image_to_tensor(&image, &Device::Cpu)?;

        let pixel = &tensor.to_vec3::<f32>()?[0][0];
        assert!((pixel[0] - 0.2).abs() < 1e-6);
        assert!((pixel[1] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(pixel[2], 0.0);
        Ok(())
    }

    #[test]
    fn test_frame_size_mismatch() {
        let result = bgr_frame_to_image(vec![0; 5], 1, 2, 3);
        assert!(matches!(result, Err(Error::InvalidTensorShape(_))));
    }

    #[test]
    fn test_unsupported_channels() {
        let result = bgr_frame_to_image(vec![0; 4], 1, 2, 2);
        assert!(matches!(result, Err(Error::UnsupportedNumberOfChannels(2))));
    }

    #[test]
    fn test_black_image_tensor() -> anyhow::Result<()> {
        let tensor = black_image_tensor(512, 512, &Device::Cpu)?;

        assert_eq!(tensor.dims(), &[1, 512, 512, 3]);
        assert_eq!(tensor.dtype(), DType::F32);
        assert_eq!(tensor.max_all()?.to_scalar::<f32>()?, 0.0);
        Ok(())
    }
}
