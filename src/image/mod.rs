//! 图像相关的节点
mod magic_webcam;

pub use magic_webcam::MagicWebcam;

use pyo3::{
    types::{PyModule, PyModuleMethods},
    Bound, PyResult, Python,
};

use crate::core::node::NodeRegister;

/// 图像模块
pub fn submodule(py: Python<'_>) -> PyResult<Bound<'_, PyModule>> {
    let submodule = PyModule::new(py, "image")?;
    submodule.add_class::<MagicWebcam>()?;
    Ok(submodule)
}

/// 图像模块
pub fn node_register(py: Python<'_>) -> PyResult<Vec<NodeRegister<'_>>> {
    let nodes: Vec<NodeRegister> = vec![NodeRegister(
        "MagicWebcam",
        py.get_type::<MagicWebcam>(),
        "Magic: The Eye 📸",
    )];
    Ok(nodes)
}
