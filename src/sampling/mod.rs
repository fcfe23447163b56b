//! 采样相关的节点
mod magic_painter;

pub use magic_painter::{MagicPainterWrapper, PainterParams, SamplerName, Scheduler};

use pyo3::{
    types::{PyModule, PyModuleMethods},
    Bound, PyResult, Python,
};

use crate::core::node::NodeRegister;

/// 采样模块
pub fn submodule(py: Python<'_>) -> PyResult<Bound<'_, PyModule>> {
    let submodule = PyModule::new(py, "sampling")?;
    submodule.add_class::<MagicPainterWrapper>()?;
    Ok(submodule)
}

/// 采样模块
pub fn node_register(py: Python<'_>) -> PyResult<Vec<NodeRegister<'_>>> {
    let nodes: Vec<NodeRegister> = vec![NodeRegister(
        "MagicPainterWrapper",
        py.get_type::<MagicPainterWrapper>(),
        "Magic: The Painter 🎨",
    )];
    Ok(nodes)
}
