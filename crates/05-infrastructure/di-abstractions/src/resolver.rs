//! 组件解析器抽象接口
//!
//! 提供依赖解析和组件实例化的能力

use crate::factory::Instance;
use crate::registry::format_chain;
use infrastructure_common::{Component, DependencyError, DependencyResult, TypeInfo};
use std::rc::Rc;

/// 组件解析器 trait
///
/// 负责解析组件依赖并创建组件实例。两种消费方式（回调与目标写入）
/// 都建立在此 trait 之上。
pub trait ComponentResolver {
    /// 解析指定类型的实例（类型擦除）
    fn resolve_instance(&mut self, type_info: &TypeInfo) -> DependencyResult<Instance>;

    /// 检查是否可以解析指定类型
    fn can_resolve(&self, type_info: &TypeInfo) -> bool;

    /// 解析指定类型的组件
    fn resolve<T>(&mut self) -> DependencyResult<Rc<T>>
    where
        T: Component,
        Self: Sized,
    {
        let type_info = TypeInfo::of::<T>();
        self.resolve_instance(&type_info)?
            .downcast::<T>()
            .ok_or_else(|| DependencyError::TypeMismatch {
                type_name: type_info.name.to_string(),
            })
    }

    /// 检查是否已注册指定类型
    fn is_registered<T>(&self) -> bool
    where
        T: Component,
        Self: Sized,
    {
        self.can_resolve(&TypeInfo::of::<T>())
    }
}

/// 解析上下文
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// 当前解析链，用于检测循环依赖
    pub resolution_chain: Vec<TypeInfo>,
    /// 最大递归深度
    pub max_depth: usize,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(max_depth: usize) -> Self {
        Self {
            resolution_chain: Vec::new(),
            max_depth,
        }
    }

    /// 添加类型到解析链
    pub fn push_type(&mut self, type_info: TypeInfo) -> DependencyResult<()> {
        if let Some(position) = self.resolution_chain.iter().position(|t| *t == type_info) {
            return Err(DependencyError::CircularDependency {
                dependency_chain: format_chain(&self.resolution_chain[position..], type_info),
            });
        }
        if self.resolution_chain.len() >= self.max_depth {
            return Err(DependencyError::ResolutionDepthExceeded {
                type_name: type_info.name.to_string(),
                max_depth: self.max_depth,
            });
        }
        self.resolution_chain.push(type_info);
        Ok(())
    }

    /// 从解析链中移除类型
    pub fn pop_type(&mut self) {
        self.resolution_chain.pop();
    }

    /// 当前深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new(crate::container::DEFAULT_MAX_RESOLUTION_DEPTH)
    }
}
