//! 组件基础接口定义
//!
//! 提供所有可注入组件必须实现的基础 trait

use crate::lifecycle::Closable;
use std::any::Any;

/// 组件基础 trait
///
/// 所有由容器构造、缓存并注入的类型都必须实现此 trait。
/// 默认实现不暴露任何能力，空实现即可：
///
/// ```rust
/// use infrastructure_common::Component;
///
/// struct Settings {
///     endpoint: String,
/// }
///
/// impl Component for Settings {}
/// ```
///
/// 持有外部资源的组件通过覆盖 [`Component::as_closable`] 暴露关闭能力，
/// 容器关闭时会统一调用。
pub trait Component: Any {
    /// 获取可关闭能力，`None` 表示关闭时跳过该组件
    fn as_closable(&self) -> Option<&dyn Closable> {
        None
    }
}
