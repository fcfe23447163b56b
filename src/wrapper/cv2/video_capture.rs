//! cv2.VideoCapture

use candle_core::Device;
use log::warn;
use pyo3::{types::PyAnyMethods, Bound, PyAny, Python};

use crate::{error::Error, wrapper::torch::tensor::TensorWrapper};

/// 原始帧, HWC, u8
///
/// 通道顺序与 OpenCV 一致 (BGR / BGRA / 灰度)
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl Frame {
    /// 从帧张量的维度构建
    fn from_dims(data: Vec<u8>, dims: &[usize]) -> Result<Self, Error> {
        let (height, width, channels) = match *dims {
            [h, w] => (h, w, 1),
            [h, w, c] => (h, w, c),
            _ => return Err(Error::InvalidTensorShape(format!("{dims:?}"))),
        };
        Ok(Self {
            data,
            height,
            width,
            channels,
        })
    }
}

/// 摄像头句柄
///
/// Drop 时释放设备
pub struct VideoCapture<'py> {
    cap: Bound<'py, PyAny>,
}

impl<'py> VideoCapture<'py> {
    /// 打开摄像头
    pub fn open(py: Python<'py>, camera_id: i32) -> Result<Self, Error> {
        let cv2 = py.import("cv2")?;
        let cap = cv2.getattr("VideoCapture")?.call1((camera_id,))?;
        Ok(Self { cap })
    }

    pub fn is_opened(&self) -> Result<bool, Error> {
        let opened = self.cap.call_method0("isOpened")?.extract::<bool>()?;
        Ok(opened)
    }

    /// 读取一帧
    ///
    /// 读取失败时返回 None
    pub fn read(&self) -> Result<Option<Frame>, Error> {
        let result = self.cap.call_method0("read")?;
        let ret = result.get_item(0)?.extract::<bool>()?;
        let frame = result.get_item(1)?;
        if !ret || frame.is_none() {
            return Ok(None);
        }

        let wrapper = TensorWrapper::<u8>::from_ndarray(&frame, &Device::Cpu)?;
        let dims = wrapper.dims().to_vec();
        let data = wrapper.into_tensor().flatten_all()?.to_vec1::<u8>()?;

        Frame::from_dims(data, &dims).map(Some)
    }
}

impl Drop for VideoCapture<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.cap.call_method0("release") {
            warn!("release camera failed, {e}");
        }
    }
}

/// 测试用的 cv2 模块
#[cfg(test)]
pub(crate) mod fake {
    use pyo3::{
        ffi::c_str,
        types::{PyAnyMethods, PyModule},
        Bound, PyResult, Python,
    };

    /// 摄像头行为
    #[derive(Debug, Clone, Copy)]
    pub enum FakeCamera {
        /// isOpened() 返回 False
        Closed,
        /// read() 返回 (False, None)
        NoFrame,
        /// read() 返回 100x100 纯蓝 BGR 帧, 左上角为 (10, 20, 30)
        Frame,
    }

    /// 替换 sys.modules 中的 cv2, release() 记录到 RELEASED
    pub fn fake_cv2(py: Python<'_>, camera: FakeCamera) -> PyResult<Bound<'_, PyModule>> {
        let code = c_str!(
            r#"
import numpy as np

MODE = "frame"
RELEASED = []

class VideoCapture:
    def __init__(self, camera_id):
        self.camera_id = camera_id

    def isOpened(self):
        return MODE != "closed"

    def read(self):
        if MODE == "no_frame":
            return (False, None)
        frame = np.zeros((100, 100, 3), dtype=np.uint8)
        frame[:, :, 0] = 255
        frame[0, 0] = (10, 20, 30)
        return (True, frame)

    def release(self):
        RELEASED.append(self.camera_id)
"#
        );
        let cv2 = PyModule::from_code(py, code, c"cv2.py", c"cv2")?;
        let mode = match camera {
            FakeCamera::Closed => "closed",
            FakeCamera::NoFrame => "no_frame",
            FakeCamera::Frame => "frame",
        };
        cv2.setattr("MODE", mode)?;
        py.import("sys")?.getattr("modules")?.set_item("cv2", &cv2)?;
        Ok(cv2)
    }

    /// 已释放的摄像头编号
    pub fn released(cv2: &Bound<'_, PyModule>) -> PyResult<Vec<i32>> {
        cv2.getattr("RELEASED")?.extract()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        fake::{fake_cv2, released, FakeCamera},
        *,
    };

    #[test]
    fn test_frame_from_dims() -> anyhow::Result<()> {
        let frame = Frame::from_dims(vec![0; 24], &[2, 4, 3])?;
        assert_eq!((frame.height, frame.width, frame.channels), (2, 4, 3));

        let gray = Frame::from_dims(vec![0; 8], &[2, 4])?;
        assert_eq!(gray.channels, 1);

        assert!(Frame::from_dims(vec![0; 8], &[8]).is_err());
        Ok(())
    }

    #[test]
    #[ignore]
    fn test_read_frame() -> anyhow::Result<()> {
        Python::with_gil(|py| -> anyhow::Result<()> {
            let cv2 = fake_cv2(py, FakeCamera::Frame)?;
            {
                let cap = VideoCapture::open(py, 2)?;
                assert!(cap.is_opened()?);

                let frame = cap.read()?.ok_or_else(|| anyhow::anyhow!("no frame"))?;
                assert_eq!((frame.height, frame.width, frame.channels), (100, 100, 3));
                // BGR 原样保留
                assert_eq!(&frame.data[..6], &[10, 20, 30, 255, 0, 0]);
                assert!(released(&cv2)?.is_empty());
            }
            assert_eq!(released(&cv2)?, vec![2]);
            Ok(())
        })
    }

    #[test]
    #[ignore]
    fn test_read_without_frame() -> anyhow::Result<()> {
        Python::with_gil(|py| -> anyhow::Result<()> {
            let cv2 = fake_cv2(py, FakeCamera::NoFrame)?;
            {
                let cap = VideoCapture::open(py, 0)?;
                assert!(cap.read()?.is_none());
            }
            assert_eq!(released(&cv2)?, vec![0]);
            Ok(())
        })
    }

    #[test]
    #[ignore]
    fn test_release_when_not_opened() -> anyhow::Result<()> {
        Python::with_gil(|py| -> anyhow::Result<()> {
            let cv2 = fake_cv2(py, FakeCamera::Closed)?;
            {
                let cap = VideoCapture::open(py, 5)?;
                assert!(!cap.is_opened()?);
            }
            assert_eq!(released(&cv2)?, vec![5]);
            Ok(())
        })
    }
}
