//! 容器构建器

use crate::container::Container;
use di_abstractions::{
    provider, try_provider, ContainerConfig, Provide, ProviderDescriptor, TryProvide,
};
use infrastructure_common::DependencyResult;

/// 容器构建器
///
/// 使用建造者模式收集提供者，注册校验在 [`DiContainerBuilder::build`] 时统一执行。
#[derive(Debug, Default)]
pub struct DiContainerBuilder {
    providers: Vec<ProviderDescriptor>,
    config: ContainerConfig,
}

impl DiContainerBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置容器配置
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// 添加无错误的提供者
    pub fn provide<Args, P>(self, factory: P) -> Self
    where
        Args: 'static,
        P: Provide<Args>,
    {
        self.register(provider(factory))
    }

    /// 添加可能返回错误的提供者
    pub fn try_provide<Args, P>(self, factory: P) -> Self
    where
        Args: 'static,
        P: TryProvide<Args>,
    {
        self.register(try_provider(factory))
    }

    /// 添加已生成的提供者描述符
    pub fn register(mut self, descriptor: ProviderDescriptor) -> Self {
        self.providers.push(descriptor);
        self
    }

    /// 构建容器
    pub fn build(self) -> DependencyResult<Container> {
        Container::with_config(self.config, self.providers)
    }

    /// 构建容器，注册失败时 panic
    pub fn must_build(self) -> Container {
        self.build()
            .unwrap_or_else(|error| panic!("容器构建失败: {error}"))
    }
}
