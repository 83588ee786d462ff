//! # 依赖注入具体实现
//!
//! 提供具体的依赖注入容器、递归解析引擎和关闭逻辑。
//!
//! - 提供者按产出类型唯一注册，构造时校验，之后只读
//! - 解析按需递归进行，每个类型只构造一次（包括失败的构造）
//! - 循环依赖在解析时立即报错
//! - 关闭时收集全部失败，不在第一个失败处停止

mod builder;
mod cache;
mod container;
mod lifecycle;
mod resolver;

pub use builder::DiContainerBuilder;
pub use container::Container;

pub use di_abstractions::{
    provider, try_provider, ComponentResolver, Consumer, ContainerConfig, ContainerStats,
    DiContainer, ProviderDescriptor,
};
pub use infrastructure_common::{
    Closable, CloseError, CloseResult, Component, ContainerState, DependencyError,
    DependencyResult, TypeInfo,
};
