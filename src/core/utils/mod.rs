//! 工具
mod image;
pub use self::image::{bgr_frame_to_image, black_image_tensor, image_to_tensor};
