//! 实用工具
mod status_display;

pub use status_display::MagicStatusDisplay;

use pyo3::{
    types::{PyModule, PyModuleMethods},
    Bound, PyResult, Python,
};

use crate::core::node::NodeRegister;

/// 实用工具模块
pub fn submodule(py: Python<'_>) -> PyResult<Bound<'_, PyModule>> {
    let submodule = PyModule::new(py, "utils")?;
    submodule.add_class::<MagicStatusDisplay>()?;
    Ok(submodule)
}

/// 实用工具模块
pub fn node_register(py: Python<'_>) -> PyResult<Vec<NodeRegister<'_>>> {
    let nodes: Vec<NodeRegister> = vec![NodeRegister(
        "MagicStatusDisplay",
        py.get_type::<MagicStatusDisplay>(),
        "Magic: Status Display 💬",
    )];
    Ok(nodes)
}
