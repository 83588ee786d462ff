//! 依赖注入容器抽象接口
//!
//! 提供依赖注入容器的核心抽象

use crate::consumer::Consumer;
use crate::resolver::ComponentResolver;
use infrastructure_common::{CloseError, Component, DependencyResult};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// 默认最大解析深度
pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 100;

/// 依赖注入容器 trait
///
/// `must_*` 系列是边界便利方法，失败时直接 panic，由宿主程序决定是否使用。
pub trait DiContainer: ComponentResolver {
    /// 解析回调的全部参数并调用回调
    fn consume<Args, C>(&mut self, consumer: C) -> DependencyResult<()>
    where
        C: Consumer<Args>,
        Self: Sized;

    /// 解析指定类型并写入目标，失败时目标保持不变
    fn inject<T>(&mut self, destination: &mut Option<Rc<T>>) -> DependencyResult<()>
    where
        T: Component,
        Self: Sized;

    /// 关闭所有已创建的实例
    fn close(&mut self) -> Result<(), CloseError>;

    /// 调用回调，失败时 panic
    fn must_consume<Args, C>(&mut self, consumer: C)
    where
        C: Consumer<Args>,
        Self: Sized,
    {
        if let Err(error) = self.consume(consumer) {
            panic!("组件消费失败: {error}");
        }
    }

    /// 写入目标，失败时 panic
    fn must_inject<T>(&mut self, destination: &mut Option<Rc<T>>)
    where
        T: Component,
        Self: Sized,
    {
        if let Err(error) = self.inject(destination) {
            panic!("组件注入失败: {error}");
        }
    }

    /// 关闭容器，任一组件关闭失败时 panic
    fn must_close(&mut self) {
        if let Err(error) = self.close() {
            panic!("容器关闭失败: {error}");
        }
    }
}

/// 容器配置
///
/// 可由宿主程序从自身配置源反序列化，缺省字段使用默认值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 最大解析深度
    ///
    /// 限制无环依赖图的最大深度，超过时返回
    /// `DependencyError::ResolutionDepthExceeded`。
    /// 循环依赖由解析链单独检测，与此限制无关。
    pub max_resolution_depth: usize,
    /// 是否按创建的逆序关闭实例（先关闭依赖方，再关闭被依赖方）
    pub close_in_reverse_order: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_resolution_depth: DEFAULT_MAX_RESOLUTION_DEPTH,
            close_in_reverse_order: true,
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 已注册提供者数量
    pub registered_providers: usize,
    /// 已缓存实例数量（包含失败的构造）
    pub cached_instances: usize,
    /// 构造失败并被缓存的数量
    pub failed_constructions: usize,
}
