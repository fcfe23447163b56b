//! 提示词构建 (The Brain)
//!
//! 将角色与场景组合为图像生成提示词, 同时输出固定的反向提示词

use log::info;
use pyo3::{
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, Py, PyResult, Python,
};

use crate::{core::category::CATEGORY_MAGIC_MIRROR, wrapper::comfyui::types::NODE_STRING};

/// 反向提示词
pub const NEGATIVE_PROMPT: &str = "blurry, deformed, scary, adult, dark, realistic, distorted, ugly, angry, mean, weapons, blood, gore, photorealistic";

/// 生成提示词
pub fn build_prompt(character: &str, place: &str) -> String {
    format!(
        "A cute happy child with the exact same face, expression, skin tone and features as the reference photo, \
        wearing a detailed {character} costume, standing in {place}, Pixar animation style, vibrant colors, \
        fun adventurous mood, perfect composition, sharp focus. \
        It is critical to preserve the exact facial features and expression from the reference photo."
    )
}

/// 提示词构建
#[pyclass(subclass)]
pub struct MagicPromptBuilder {}

#[pymethods]
impl MagicPromptBuilder {
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
    fn return_types() -> (&'static str, &'static str) {
        (NODE_STRING, NODE_STRING)
    }

    #[classattr]
    #[pyo3(name = "RETURN_NAMES")]
    fn return_names() -> (&'static str, &'static str) {
        ("prompt", "negative_prompt")
    }

    #[classattr]
    #[pyo3(name = "OUTPUT_IS_LIST")]
    fn output_is_list() -> (bool, bool) {
        (false, false)
    }

    #[classattr]
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_MAGIC_MIRROR;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Turn a character and a place into a prompt and a negative prompt."
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
                    "character",
                    (NODE_STRING, {
                        let character = PyDict::new(py);
                        character.set_item("forceInput", true)?;
                        character
                    }),
                )?;
                required.set_item(
                    "place",
                    (NODE_STRING, {
                        let place = PyDict::new(py);
                        place.set_item("forceInput", true)?;
                        place
                    }),
                )?;
                required
            })?;
            Ok(dict.into())
        })
    }

    #[pyo3(name = "execute")]
    fn execute(&self, character: &str, place: &str) -> (String, String) {
        let prompt = build_prompt(character, place);
        info!("--- Magic Mirror Brain ---\nGenerated Prompt: {prompt}\n--------------------------");
        (prompt, NEGATIVE_PROMPT.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt() {
        let prompt = build_prompt("Galactic Astronaut", "on a Glowing Alien Planet");

        assert_eq!(
            prompt,
            "A cute happy child with the exact same face, expression, skin tone and features as the reference photo, wearing a detailed Galactic Astronaut costume, standing in on a Glowing Alien Planet, Pixar animation style, vibrant colors, fun adventurous mood, perfect composition, sharp focus. It is critical to preserve the exact facial features and expression from the reference photo."
        );
    }

    #[test]
    fn test_execute_outputs() {
        let node = MagicPromptBuilder::new();
        let (prompt, negative_prompt) = node.execute("Pirate", "on the Moon");

        assert!(prompt.contains("Pirate"));
        assert!(prompt.contains("on the Moon"));
        assert_eq!(negative_prompt, NEGATIVE_PROMPT);
        assert!(negative_prompt.starts_with("blurry, deformed"));
        assert!(negative_prompt.ends_with("photorealistic"));
    }
}
