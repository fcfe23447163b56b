//! 提示词编辑
//!
//! 覆盖文本非空白时替换上游提示词

use pyo3::{
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, Py, PyResult, Python,
};

use crate::{core::category::CATEGORY_MAGIC_MIRROR, wrapper::comfyui::types::NODE_STRING};

/// 最终提示词
pub fn edit_prompt(prompt: String, override_text: String) -> String {
    if override_text.trim().is_empty() {
        prompt
    } else {
        override_text
    }
}

/// 提示词编辑
#[pyclass(subclass)]
pub struct MagicPromptEditor {}

#[pymethods]
impl MagicPromptEditor {
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
        ("prompt",)
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
        "Replace the generated prompt with your own text. Leave empty to keep it."
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
                    "prompt",
                    (NODE_STRING, {
                        let prompt = PyDict::new(py);
                        prompt.set_item("forceInput", true)?;
                        prompt
                    }),
                )?;
                required.set_item(
                    "override_text",
                    (NODE_STRING, {
                        let override_text = PyDict::new(py);
                        override_text.set_item("default", "")?;
                        override_text.set_item("multiline", true)?;
                        override_text
                    }),
                )?;
                required
            })?;
            Ok(dict.into())
        })
    }

    #[pyo3(name = "execute")]
    fn execute(&self, prompt: String, override_text: String) -> (String,) {
        (edit_prompt(prompt, override_text),)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_override_keeps_prompt() {
        assert_eq!(edit_prompt("a wizard".to_string(), String::new()), "a wizard");
        assert_eq!(
            edit_prompt("a wizard".to_string(), " \n\t ".to_string()),
            "a wizard"
        );
    }

    #[test]
    fn test_override_is_returned_verbatim() {
        let node = MagicPromptEditor::new();
        let (prompt,) = node.execute("a wizard".to_string(), "  a knight\n".to_string());
        assert_eq!(prompt, "  a knight\n");
    }
}
