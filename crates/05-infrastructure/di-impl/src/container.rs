//! 具体的依赖注入容器实现

use crate::builder::DiContainerBuilder;
use crate::cache::InstanceCache;
use crate::lifecycle::close_instances;
use crate::resolver::Resolver;
use di_abstractions::{
    ComponentResolver, Consumer, ContainerConfig, ContainerStats, DiContainer, Instance,
    ProviderDescriptor, ProviderRegistry,
};
use infrastructure_common::{
    CloseError, Component, ContainerState, DependencyError, DependencyResult, TypeInfo,
};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// 依赖注入容器
///
/// 独占提供者注册表和实例缓存。每个类型只构造一次，之后的解析都返回同一个实例，
/// 直到显式调用 [`DiContainer::close`]。
///
/// 容器不是线程安全的，所有调用必须由宿主串行化。
///
/// ```rust
/// use di_impl::{provider, Container, DiContainer};
/// use infrastructure_common::Component;
/// use std::rc::Rc;
///
/// struct Foo;
/// impl Component for Foo {}
///
/// struct Bar {
///     foo: Rc<Foo>,
/// }
/// impl Component for Bar {}
///
/// let mut container = Container::new([
///     provider(|| Foo),
///     provider(|foo: Rc<Foo>| Bar { foo }),
/// ])
/// .unwrap();
///
/// container
///     .consume(|foo: Rc<Foo>, bar: Rc<Bar>| assert!(Rc::ptr_eq(&foo, &bar.foo)))
///     .unwrap();
/// container.close().unwrap();
/// ```
pub struct Container {
    registry: ProviderRegistry,
    cache: InstanceCache,
    config: ContainerConfig,
    state: ContainerState,
}

impl Container {
    /// 使用默认配置创建容器
    pub fn new<I>(providers: I) -> DependencyResult<Self>
    where
        I: IntoIterator<Item = ProviderDescriptor>,
    {
        Self::with_config(ContainerConfig::default(), providers)
    }

    /// 使用指定配置创建容器
    ///
    /// 第一个注册失败即终止，不会创建任何实例。
    pub fn with_config<I>(config: ContainerConfig, providers: I) -> DependencyResult<Self>
    where
        I: IntoIterator<Item = ProviderDescriptor>,
    {
        let registry = ProviderRegistry::from_providers(providers)?;
        info!("构建容器完成，注册了 {} 个提供者", registry.len());

        Ok(Self {
            registry,
            cache: InstanceCache::default(),
            config,
            state: ContainerState::Built,
        })
    }

    /// 创建容器，注册失败时 panic
    pub fn must_new<I>(providers: I) -> Self
    where
        I: IntoIterator<Item = ProviderDescriptor>,
    {
        Self::new(providers).unwrap_or_else(|error| panic!("容器构建失败: {error}"))
    }

    /// 创建容器构建器
    pub fn builder() -> DiContainerBuilder {
        DiContainerBuilder::new()
    }

    /// 当前生命周期状态
    pub fn state(&self) -> ContainerState {
        self.state
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 已注册的产出类型
    pub fn registered_types(&self) -> Vec<TypeInfo> {
        self.registry.registered_types()
    }

    /// 统计信息
    pub fn stats(&self) -> ContainerStats {
        ContainerStats {
            registered_providers: self.registry.len(),
            cached_instances: self.cache.len(),
            failed_constructions: self.cache.failed_count(),
        }
    }

    /// 静态验证依赖关系，不创建任何实例
    pub fn validate(&self) -> Result<(), Vec<DependencyError>> {
        info!("验证容器状态");
        self.registry.validate()
    }

    fn ensure_open(&self) -> DependencyResult<()> {
        if self.state.can_resolve() {
            Ok(())
        } else {
            Err(DependencyError::ContainerClosed)
        }
    }
}

impl ComponentResolver for Container {
    fn resolve_instance(&mut self, type_info: &TypeInfo) -> DependencyResult<Instance> {
        self.ensure_open()?;
        Resolver::new(
            &self.registry,
            &mut self.cache,
            self.config.max_resolution_depth,
        )
        .resolve(type_info)
    }

    fn can_resolve(&self, type_info: &TypeInfo) -> bool {
        self.state.can_resolve() && self.registry.contains(type_info)
    }
}

impl DiContainer for Container {
    fn consume<Args, C>(&mut self, consumer: C) -> DependencyResult<()>
    where
        C: Consumer<Args>,
    {
        self.ensure_open()?;
        consumer.consume_with(self)
    }

    fn inject<T>(&mut self, destination: &mut Option<Rc<T>>) -> DependencyResult<()>
    where
        T: Component,
    {
        let component = self.resolve::<T>()?;
        *destination = Some(component);
        Ok(())
    }

    fn close(&mut self) -> Result<(), CloseError> {
        if self.state == ContainerState::Closed {
            debug!("容器已关闭，忽略重复关闭");
            return Ok(());
        }

        let entries = self.cache.drain();
        info!("关闭容器，释放 {} 个缓存条目", entries.len());
        self.state = ContainerState::Closed;

        let result = close_instances(entries, self.config.close_in_reverse_order);
        if let Err(error) = &result {
            warn!("{}", error);
        }
        result
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("state", &self.state)
            .field("stats", &self.stats())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
