//! OpenCV (cv2) 包装
//!
//! 依赖宿主 python 环境中的 opencv-python
mod video_capture;
pub use video_capture::{Frame, VideoCapture};

#[cfg(test)]
pub(crate) use video_capture::fake;
