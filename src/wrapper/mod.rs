// python 包装
pub mod comfy;
pub mod comfyui;
pub mod cv2;
pub mod torch;
