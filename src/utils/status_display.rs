//! 状态显示
//!
//! 输出节点, 将文本显示在节点界面上

use log::{error, info};
use pyo3::{
    exceptions::PyRuntimeError,
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, Py, PyAny, PyErr, PyResult, Python,
};
use serde::Serialize;

use crate::{
    core::category::CATEGORY_MAGIC_MIRROR,
    error::Error,
    wrapper::comfyui::{types::NODE_STRING, PromptServer},
};

/// 前端需要的数据结构
///
/// ui 的每个字段都必须是列表, 宿主会按批次合并
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeUi<T: Serialize> {
    pub ui: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusText {
    pub text: Vec<String>,
}

/// 状态显示
#[pyclass(subclass)]
pub struct MagicStatusDisplay {}

impl PromptServer for MagicStatusDisplay {}

#[pymethods]
impl MagicStatusDisplay {
    #[new]
    fn new() -> Self {
        Self {}
    }

    #[classattr]
    #[pyo3(name = "INPUT_IS_LIST")]
    fn input_is_list() -> bool {
        false
    }

    #[classattr]
    #[pyo3(name = "OUTPUT_NODE")]
    fn output_node() -> bool {
        true
    }

    #[classattr]
    #[pyo3(name = "RETURN_TYPES")]
    fn return_types() {}

    #[classattr]
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_MAGIC_MIRROR;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Show a status message on the node."
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
                    "text",
                    (NODE_STRING, {
                        let text = PyDict::new(py);
                        text.set_item("forceInput", true)?;
                        text
                    }),
                )?;
                required
            })?;
            Ok(dict.into())
        })
    }

    #[pyo3(name = "execute")]
    fn execute<'py>(&mut self, py: Python<'py>, text: String) -> PyResult<Bound<'py, PyAny>> {
        info!("🪄 Status: {text}");
        let results = self.node_result(py, text);

        match results {
            Ok(v) => Ok(v),
            Err(e) => {
                error!("MagicStatusDisplay error, {e}");
                if let Err(send_err) =
                    self.send_error(py, "MagicStatusDisplay".to_string(), e.to_string())
                {
                    error!("send error failed, {send_err}");
                }
                Err(PyErr::new::<PyRuntimeError, _>(e.to_string()))
            }
        }
    }
}

impl MagicStatusDisplay {
    /// 组合为前端需要的数据结构
    fn node_result<'py>(&self, py: Python<'py>, text: String) -> Result<Bound<'py, PyAny>, Error> {
        let result = status_ui(text);
        Ok(pythonize::pythonize(py, &result)?)
    }
}

/// {"ui": {"text": [text]}}
pub fn status_ui(text: String) -> NodeUi<StatusText> {
    NodeUi {
        ui: StatusText { text: vec![text] },
    }
}
