//! ComfyUI 节点协议相关
mod prompt_server;
pub use prompt_server::PromptServer;

pub mod types;
