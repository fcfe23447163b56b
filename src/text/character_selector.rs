//! 角色选择器

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

/// 角色选择器
#[pyclass(subclass)]
pub struct MagicCharacterSelector {}

#[pymethods]
impl MagicCharacterSelector {
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
        ("character",)
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
        "Pick the costume the child will be wearing."
    }

    #[classattr]
    #[pyo3(name = "FUNCTION")]
    const FUNCTION: &'static str = "execute";

    /// 每次刷新节点定义时重新读取配置
    #[classmethod]
    #[pyo3(name = "INPUT_TYPES")]
    fn input_types(_cls: &Bound<'_, PyType>) -> PyResult<Py<PyDict>> {
        Python::with_gil(|py| {
            let (characters, _) = get_magic_lists(&config_path(module_dir(py).as_deref()));
            let default = characters.first().cloned().unwrap_or_default();

            let dict = PyDict::new(py);
            dict.set_item("required", {
                let required = PyDict::new(py);
                required.set_item(
                    "character",
                    (characters, {
                        let character = PyDict::new(py);
                        character.set_item("default", default)?;
                        character.set_item("tooltip", "Costume list from magic_config.json")?;
                        character
                    }),
                )?;
                required
            })?;
            Ok(dict.into())
        })
    }

    #[pyo3(name = "execute")]
    fn execute(&self, character: String) -> (String,) {
        (character,)
    }
}
