//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义提供者注册和依赖解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`ProviderRegistry`] - 提供者注册表（按产出类型唯一）
//! - [`Provide`] / [`TryProvide`] - 由函数签名推导依赖的提供者
//! - [`ComponentResolver`] - 依赖解析器接口
//! - [`Consumer`] - 回调消费者
//! - [`DiContainer`] - 容器接口（消费、注入、关闭）

pub mod consumer;
pub mod container;
pub mod factory;
pub mod registry;
pub mod resolver;

pub use consumer::*;
pub use container::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;
