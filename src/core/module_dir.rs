//! 扩展模块所在目录
//!
//! 扩展模块的 `__file__` 在初始化函数返回后才由 importlib 设置,
//! 因此初始化时只保存模块对象, 使用时再读取。

use std::path::PathBuf;

use pyo3::{
    sync::GILOnceCell,
    types::{PyAnyMethods, PyModule},
    Bound, Py, Python,
};

static MODULE: GILOnceCell<Py<PyModule>> = GILOnceCell::new();

/// 保存扩展模块对象
pub fn register_module(m: &Bound<'_, PyModule>) {
    let _ = MODULE.set(m.py(), m.clone().unbind());
}

/// 扩展模块所在目录
pub fn module_dir(py: Python<'_>) -> Option<PathBuf> {
    let module = MODULE.get(py)?.bind(py);
    let file = module.getattr("__file__").ok()?.extract::<PathBuf>().ok()?;
    file.parent().map(|v| v.to_path_buf())
}
