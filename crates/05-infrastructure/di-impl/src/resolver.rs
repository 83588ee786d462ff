//! 递归解析引擎
//!
//! 解析顺序：命中缓存直接返回；否则按参数声明顺序递归解析依赖，
//! 调用提供者，并把结果（无论成功或失败）写入缓存。

use crate::cache::{CachedEntry, InstanceCache};
use di_abstractions::{Instance, ProviderRegistry, ResolveContext};
use infrastructure_common::{DependencyError, DependencyResult, SharedError, TypeInfo};
use tracing::{debug, warn};

/// 单次解析调用的引擎，借用注册表和缓存
pub(crate) struct Resolver<'a> {
    registry: &'a ProviderRegistry,
    cache: &'a mut InstanceCache,
    context: ResolveContext,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(
        registry: &'a ProviderRegistry,
        cache: &'a mut InstanceCache,
        max_depth: usize,
    ) -> Self {
        Self {
            registry,
            cache,
            context: ResolveContext::new(max_depth),
        }
    }

    pub(crate) fn resolve(&mut self, type_info: &TypeInfo) -> DependencyResult<Instance> {
        if let Some(entry) = self.cache.get(type_info) {
            if entry.is_failed() {
                warn!("重放已缓存的构造失败: {}", type_info.name);
            } else {
                debug!("命中缓存: {}", type_info.name);
            }
            return entry.to_result(type_info);
        }

        let registry = self.registry;
        let descriptor = registry
            .get(type_info)
            .ok_or_else(|| DependencyError::not_registered(type_info.name))?;

        self.context.push_type(*type_info)?;
        let arguments = self.resolve_dependencies(&descriptor.dependencies);
        self.context.pop_type();
        let arguments = arguments?;

        debug!("构造组件: {}", type_info.name);
        let entry = match descriptor.invoke(&arguments) {
            Ok(instance) => CachedEntry::Ready(instance),
            Err(error) => {
                warn!("组件创建失败: {}, 原因: {}", type_info.name, error);
                CachedEntry::Failed(SharedError::from(error))
            }
        };

        let result = entry.to_result(type_info);
        self.cache.insert(*type_info, entry);
        result
    }

    fn resolve_dependencies(
        &mut self,
        dependencies: &[TypeInfo],
    ) -> DependencyResult<Vec<Instance>> {
        dependencies
            .iter()
            .map(|dependency| self.resolve(dependency))
            .collect()
    }
}
