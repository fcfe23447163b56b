//! 文本相关的节点
mod character_selector;
mod place_selector;
mod prompt_builder;
mod prompt_editor;

pub use character_selector::MagicCharacterSelector;
pub use place_selector::MagicPlaceSelector;
pub use prompt_builder::{build_prompt, MagicPromptBuilder, NEGATIVE_PROMPT};
pub use prompt_editor::{edit_prompt, MagicPromptEditor};

use pyo3::{
    types::{PyModule, PyModuleMethods},
    Bound, PyResult, Python,
};

use crate::core::node::NodeRegister;

/// 文本模块
pub fn submodule(py: Python<'_>) -> PyResult<Bound<'_, PyModule>> {
    let submodule = PyModule::new(py, "text")?;
    submodule.add_class::<MagicCharacterSelector>()?;
    submodule.add_class::<MagicPlaceSelector>()?;
    submodule.add_class::<MagicPromptBuilder>()?;
    submodule.add_class::<MagicPromptEditor>()?;
    Ok(submodule)
}

/// 文本模块
pub fn node_register(py: Python<'_>) -> PyResult<Vec<NodeRegister<'_>>> {
    let nodes: Vec<NodeRegister> = vec![
        NodeRegister(
            "MagicCharacterSelector",
            py.get_type::<MagicCharacterSelector>(),
            "Magic: Character Selector 🎭",
        ),
        NodeRegister(
            "MagicPlaceSelector",
            py.get_type::<MagicPlaceSelector>(),
            "Magic: Place Selector 🌍",
        ),
        NodeRegister(
            "MagicPromptBuilder",
            py.get_type::<MagicPromptBuilder>(),
            "Magic: The Brain 🧠",
        ),
        NodeRegister(
            "MagicPromptEditor",
            py.get_type::<MagicPromptEditor>(),
            "Magic: Prompt Editor ✍️",
        ),
    ];
    Ok(nodes)
}
