//! cfg 模块 - 配置管理
//!
//! 按 `{ type, options }` 形式的配置创建 trait 实现，日志的 Formatter 和 Appender 都通过这里构造

#[macro_use]
pub mod macros;
pub mod registry;
pub mod type_options;

pub use registry::{create_trait_from_type_options, register_trait, registered_types};
pub use type_options::TypeOptions;
