//! 场景选择器

use pyo3::{
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, Py, PyResult, Python,
};

use crate::{
    config::{config_path, get_magic_lists},
    core::{category::CATEGORY_MAGIC_MIRROR, module_dir::module_dir},
    wrapper::comfyui::types::NODE_STRING,
};

/// 场景选择器
#[pyclass(subclass)]
pub struct MagicPlaceSelector {}

#[pymethods]
impl MagicPlaceSelector {
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
    #[pyo3(name = "RETURN_TYPES")]
    fn return_types() -> (&'static str,) {
        (NODE_STRING,)
    }

    #[classattr]
    #[pyo3(name = "RETURN_NAMES")]
    fn return_names() -> (&'static str,) {
        ("place",)
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
        "Pick where the adventure takes place."
    }

    #[classattr]
    #[pyo3(name = "FUNCTION")]
    const FUNCTION: &'static str = "execute";

    /// 每次刷新节点定义时重新读取配置
    #[classmethod]
    #[pyo3(name = "INPUT_TYPES")]
    fn input_types(_cls: &Bound<'_, PyType>) -> PyResult<Py<PyDict>> {
        Python::with_gil(|py| {
            let (_, places) = get_magic_lists(&config_path(module_dir(py).as_deref()));
            let default = places.first().cloned().unwrap_or_default();

            let dict = PyDict::new(py);
            dict.set_item("required", {
                let required = PyDict::new(py);
                required.set_item(
                    "place",
                    (places, {
                        let place = PyDict::new(py);
                        place.set_item("default", default)?;
                        place.set_item("tooltip", "Location list from magic_config.json")?;
                        place
                    }),
                )?;
                required
            })?;
            Ok(dict.into())
        })
    }

    #[pyo3(name = "execute")]
    fn execute(&self, place: String) -> (String,) {
        (place,)
    }
}
