//! 节点分类

/// Magic Mirror
pub const CATEGORY_MAGIC_MIRROR: &str = "Magic Mirror";
