//! 提供者注册表
//!
//! 注册表只在容器构造时填充，之后只读。每个产出类型最多一个提供者。

use crate::factory::{FactoryFn, Instance, Provide, ProviderError, TryProvide};
use infrastructure_common::{DependencyError, DependencyResult, TypeInfo};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

/// 提供者描述符
///
/// 注册时根据提供者签名静态生成。
pub struct ProviderDescriptor {
    /// 产出类型
    pub produces: TypeInfo,
    /// 依赖类型，按参数声明顺序
    pub dependencies: Vec<TypeInfo>,
    /// 是否可能返回错误
    pub fallible: bool,
    factory: FactoryFn,
}

impl ProviderDescriptor {
    /// 调用提供者
    pub fn invoke(&self, arguments: &[Instance]) -> Result<Instance, ProviderError> {
        (self.factory)(arguments)
    }
}

impl fmt::Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("produces", &self.produces.name)
            .field(
                "dependencies",
                &self.dependencies.iter().map(|d| d.name).collect::<Vec<_>>(),
            )
            .field("fallible", &self.fallible)
            .field("factory", &"<function>")
            .finish()
    }
}

/// 为无错误的提供者生成描述符
///
/// ```rust
/// use di_abstractions::provider;
/// use infrastructure_common::{Component, TypeInfo};
/// use std::rc::Rc;
///
/// struct Foo;
/// impl Component for Foo {}
///
/// struct Bar(Rc<Foo>);
/// impl Component for Bar {}
///
/// let descriptor = provider(|foo: Rc<Foo>| Bar(foo));
/// assert_eq!(descriptor.produces, TypeInfo::of::<Bar>());
/// assert_eq!(descriptor.dependencies, vec![TypeInfo::of::<Foo>()]);
/// assert!(!descriptor.fallible);
/// ```
pub fn provider<Args, P>(provider: P) -> ProviderDescriptor
where
    Args: 'static,
    P: Provide<Args>,
{
    ProviderDescriptor {
        produces: TypeInfo::of::<P::Output>(),
        dependencies: P::dependencies(),
        fallible: false,
        factory: Box::new(move |arguments| provider.invoke(arguments).map(Instance::new)),
    }
}

/// 为可能返回错误的提供者生成描述符
pub fn try_provider<Args, P>(provider: P) -> ProviderDescriptor
where
    Args: 'static,
    P: TryProvide<Args>,
{
    ProviderDescriptor {
        produces: TypeInfo::of::<P::Output>(),
        dependencies: P::dependencies(),
        fallible: true,
        factory: Box::new(move |arguments| provider.try_invoke(arguments).map(Instance::new)),
    }
}

/// 提供者注册表
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: HashMap<TypeInfo, ProviderDescriptor>,
}

impl ProviderRegistry {
    /// 注册所有提供者，遇到第一个错误即停止
    pub fn from_providers<I>(providers: I) -> DependencyResult<Self>
    where
        I: IntoIterator<Item = ProviderDescriptor>,
    {
        let mut registry = Self::default();
        for descriptor in providers {
            registry.insert(descriptor)?;
        }
        Ok(registry)
    }

    fn insert(&mut self, descriptor: ProviderDescriptor) -> DependencyResult<()> {
        let produces = descriptor.produces;

        if self.providers.contains_key(&produces) {
            return Err(DependencyError::DuplicateProvider {
                type_name: produces.name.to_string(),
            });
        }

        debug!(
            "注册提供者: {} (依赖 {} 个, 可失败: {})",
            produces.name,
            descriptor.dependencies.len(),
            descriptor.fallible
        );
        self.providers.insert(produces, descriptor);
        Ok(())
    }

    /// 获取提供者描述符
    pub fn get(&self, type_info: &TypeInfo) -> Option<&ProviderDescriptor> {
        self.providers.get(type_info)
    }

    /// 检查是否已注册
    pub fn contains(&self, type_info: &TypeInfo) -> bool {
        self.providers.contains_key(type_info)
    }

    /// 已注册的产出类型
    pub fn registered_types(&self) -> Vec<TypeInfo> {
        self.providers.keys().copied().collect()
    }

    /// 提供者数量
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// 静态验证依赖关系
    ///
    /// 不构造任何实例，报告所有缺失的依赖和所有循环依赖。
    pub fn validate(&self) -> Result<(), Vec<DependencyError>> {
        let mut errors = Vec::new();

        let mut types = self.registered_types();
        types.sort_by_key(|type_info| type_info.name);

        for type_info in &types {
            if let Some(descriptor) = self.providers.get(type_info) {
                for dependency in &descriptor.dependencies {
                    if !self.contains(dependency) {
                        errors.push(DependencyError::ComponentNotRegistered {
                            type_name: format!("{} (被 {} 依赖)", dependency.name, type_info.name),
                        });
                    }
                }
            }
        }

        // 使用深度优先搜索检测循环依赖
        let mut visited = HashSet::new();
        let mut visiting = Vec::new();
        for type_info in &types {
            self.dfs_check(*type_info, &mut visited, &mut visiting, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn dfs_check(
        &self,
        current: TypeInfo,
        visited: &mut HashSet<TypeInfo>,
        visiting: &mut Vec<TypeInfo>,
        errors: &mut Vec<DependencyError>,
    ) {
        if let Some(position) = visiting.iter().position(|t| *t == current) {
            errors.push(DependencyError::CircularDependency {
                dependency_chain: format_chain(&visiting[position..], current),
            });
            return;
        }

        if visited.contains(&current) {
            return;
        }

        visiting.push(current);
        if let Some(descriptor) = self.providers.get(&current) {
            for dependency in &descriptor.dependencies {
                self.dfs_check(*dependency, visited, visiting, errors);
            }
        }
        visiting.pop();
        visited.insert(current);
    }
}

/// 格式化依赖链: `A -> B -> A`
pub fn format_chain(chain: &[TypeInfo], last: TypeInfo) -> String {
    chain
        .iter()
        .chain(std::iter::once(&last))
        .map(|type_info| type_info.short_name())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrastructure_common::Component;
    use std::rc::Rc;

    struct Foo;
    impl Component for Foo {}

    struct Bar;
    impl Component for Bar {}

    struct Ping;
    impl Component for Ping {}

    struct Pong;
    impl Component for Pong {}

    #[test]
    fn test_empty_registry() {
        let registry = ProviderRegistry::from_providers(Vec::new()).unwrap();
        assert!(registry.is_empty());
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_register_multiple() {
        let registry = ProviderRegistry::from_providers([
            provider(|| Foo),
            try_provider(|_: Rc<Foo>| -> Result<Bar, String> { Ok(Bar) }),
        ])
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(&TypeInfo::of::<Foo>()));

        let bar = registry.get(&TypeInfo::of::<Bar>()).unwrap();
        assert!(bar.fallible);
        assert_eq!(bar.dependencies, vec![TypeInfo::of::<Foo>()]);
    }

    #[test]
    fn test_duplicate_provider() {
        let error = ProviderRegistry::from_providers([
            provider(|| Foo),
            try_provider(|| -> Result<Foo, String> { Ok(Foo) }),
        ])
        .unwrap_err();

        assert!(error.is_registration_error());
        assert!(matches!(error, DependencyError::DuplicateProvider { .. }));
    }

    #[test]
    fn test_self_dependency_registers_and_validates_as_cycle() {
        let registry = ProviderRegistry::from_providers([provider(|_: Rc<Foo>| Foo)]).unwrap();
        assert!(registry.contains(&TypeInfo::of::<Foo>()));

        let errors = registry.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            DependencyError::CircularDependency { dependency_chain } => {
                assert_eq!(dependency_chain, "Foo -> Foo");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_reports_missing_dependency() {
        let registry = ProviderRegistry::from_providers([provider(|_: Rc<Foo>| Bar)]).unwrap();

        let errors = registry.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_unresolved());
    }

    #[test]
    fn test_validate_reports_cycle() {
        let registry = ProviderRegistry::from_providers([
            provider(|_: Rc<Pong>| Ping),
            provider(|_: Rc<Ping>| Pong),
            provider(|_: Rc<Ping>| Foo),
        ])
        .unwrap();

        let errors = registry.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            DependencyError::CircularDependency { dependency_chain } => {
                assert!(
                    dependency_chain == "Ping -> Pong -> Ping"
                        || dependency_chain == "Pong -> Ping -> Pong"
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_format_chain() {
        let chain = [TypeInfo::of::<Foo>(), TypeInfo::of::<Bar>()];
        assert_eq!(format_chain(&chain, TypeInfo::of::<Foo>()), "Foo -> Bar -> Foo");
    }
}
