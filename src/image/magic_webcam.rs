//! 摄像头拍照 (The Eye)
//!
//! 通过宿主的 cv2 读取一帧, 打开或读取失败时输出 512x512 纯黑图像

use candle_core::Device;
use log::error;
use pyo3::{
    exceptions::PyRuntimeError,
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, Py, PyAny, PyErr, PyResult, Python,
};

use crate::{
    core::{
        category::CATEGORY_MAGIC_MIRROR,
        utils::{bgr_frame_to_image, black_image_tensor, image_to_tensor},
    },
    error::Error,
    wrapper::{
        comfyui::{
            types::{NODE_BOOLEAN, NODE_IMAGE, NODE_INT},
            PromptServer,
        },
        cv2::{Frame, VideoCapture},
        torch::tensor::TensorWrapper,
    },
};

/// 回退图像尺寸
pub const FALLBACK_SIZE: usize = 512;
/// 最大摄像头编号
pub const MAX_CAMERA_ID: i32 = 10;

/// 摄像头拍照
#[pyclass(subclass)]
pub struct MagicWebcam {
    device: Device,
}

impl PromptServer for MagicWebcam {}

#[pymethods]
impl MagicWebcam {
    #[new]
    fn new() -> Self {
        Self {
            device: Device::Cpu,
        }
    }

    #[classattr]
    #[pyo3(name = "INPUT_IS_LIST")]
    fn input_is_list() -> bool {
        false
    }

    #[classattr]
    #[pyo3(name = "RETURN_TYPES")]
    fn return_types() -> (&'static str,) {
        (NODE_IMAGE,)
    }

    #[classattr]
    #[pyo3(name = "RETURN_NAMES")]
    fn return_names() -> (&'static str,) {
        ("image",)
    }

    #[classattr]
    #[pyo3(name = "OUTPUT_IS_LIST")]
    fn output_is_list() -> (bool,) {
        (false,)
    }

    #[classattr]
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_MAGIC_MIRROR;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Capture one frame from a webcam. Outputs a black 512x512 image when the camera is unavailable."
    }

    #[classattr]
    #[pyo3(name = "FUNCTION")]
    const FUNCTION: &'static str = "execute";

    #[classmethod]
    #[pyo3(name = "INPUT_TYPES")]
    fn input_types(_cls: &Bound<'_, PyType>) -> PyResult<Py<PyDict>> {
        Python::with_gil(|py| {
            let dict = PyDict::new(py);
            dict.set_item("required", {
                let required = PyDict::new(py);
                required.set_item(
                    "camera_id",
                    (NODE_INT, {
                        let camera_id = PyDict::new(py);
                        camera_id.set_item("default", 0)?;
                        camera_id.set_item("min", 0)?;
                        camera_id.set_item("max", MAX_CAMERA_ID)?;
                        camera_id.set_item("step", 1)?;
                        camera_id
                    }),
                )?;
                required.set_item(
                    "capture_button",
                    (NODE_BOOLEAN, {
                        let capture_button = PyDict::new(py);
                        capture_button.set_item("default", true)?;
                        capture_button
                    }),
                )?;
                required
            })?;
            Ok(dict.into())
        })
    }

    /// 每次排队都重新拍照, 不使用缓存结果
    #[classmethod]
    #[pyo3(name = "IS_CHANGED", signature = (**_kwargs))]
    fn is_changed(_cls: &Bound<'_, PyType>, _kwargs: Option<Bound<'_, PyDict>>) -> f64 {
        f64::NAN
    }

    #[pyo3(name = "execute")]
    fn execute<'py>(
        &mut self,
        py: Python<'py>,
        camera_id: i32,
        capture_button: bool,
    ) -> PyResult<(Bound<'py, PyAny>,)> {
        // 仅作为前端触发按钮, 不参与计算
        let _ = capture_button;
        let results = self.capture(py, camera_id);

        match results {
            Ok(v) => Ok((v,)),
            Err(e) => {
                error!("MagicWebcam error, {e}");
                if let Err(send_err) =
                    self.send_error(py, "MagicWebcam".to_string(), e.to_string())
                {
                    error!("send error failed, {send_err}");
                }
                Err(PyErr::new::<PyRuntimeError, _>(e.to_string()))
            }
        }
    }
}

impl MagicWebcam {
    /// 拍照并转换为 IMAGE 张量
    fn capture<'py>(&self, py: Python<'py>, camera_id: i32) -> Result<Bound<'py, PyAny>, Error> {
        let tensor = self.capture_tensor(py, camera_id)?;
        let tensor = TensorWrapper::<f32>::from_tensor(tensor).to_py_tensor(py)?;
        Ok(tensor)
    }

    /// 拍照, 打开或读取失败时回退为纯黑图像
    fn capture_tensor(&self, py: Python<'_>, camera_id: i32) -> Result<candle_core::Tensor, Error> {
        let frame = match Self::read_frame(py, camera_id) {
            Ok(frame) => Some(frame),
            Err(e @ (Error::CameraNotOpened(_) | Error::CameraNoFrame(_))) => {
                error!("Magic Mirror {e}");
                None
            }
            Err(e) => return Err(e),
        };

        self.frame_to_tensor(frame)
    }

    /// 读取一帧, 设备在 VideoCapture 释放时关闭
    fn read_frame(py: Python<'_>, camera_id: i32) -> Result<Frame, Error> {
        let cap = VideoCapture::open(py, camera_id)?;
        if !cap.is_opened()? {
            return Err(Error::CameraNotOpened(camera_id));
        }

        cap.read()?.ok_or(Error::CameraNoFrame(camera_id))
    }

    /// 帧 -> NHWC 张量, 无帧时输出纯黑图像
    fn frame_to_tensor(&self, frame: Option<Frame>) -> Result<candle_core::Tensor, Error> {
        let Some(frame) = frame else {
            return black_image_tensor(FALLBACK_SIZE, FALLBACK_SIZE, &self.device);
        };

        let image = bgr_frame_to_image(frame.data, frame.height, frame.width, frame.channels)?;
        // HWC -> NHWC
        let tensor = image_to_tensor(&image, &self.device)?.unsqueeze(0)?;
        Ok(tensor)
    }
}
