//! ComfyUI 内置对象包装
pub mod nodes;
