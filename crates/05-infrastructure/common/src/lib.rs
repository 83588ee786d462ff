//! # Infrastructure Common
//!
//! 这个 crate 提供了依赖注入容器共享的基础 traits 和类型。
//!
//! ## 核心组件
//!
//! - [`Component`] - 可注入组件基础 trait
//! - [`Closable`] - 可关闭能力
//! - [`TypeInfo`] - 类型标识，注册表与实例缓存的键
//! - [`DependencyError`] / [`CloseError`] - 错误分类
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 按类型唯一注册，单例缓存
//! - 不包含任何全局状态

pub mod component;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use component::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
