//! 组件生命周期管理

use std::error::Error;
use std::fmt;

/// 组件关闭时返回的错误类型
pub type CloseResult = Result<(), Box<dyn Error + Send + Sync>>;

/// 可关闭能力
///
/// 组件在容器关闭时释放资源。实例由容器以共享引用持有，
/// 因此需要修改状态的实现应使用内部可变性（`Cell` / `RefCell`）。
pub trait Closable {
    /// 释放资源
    fn close(&self) -> CloseResult;
}

/// 容器生命周期状态
///
/// 构造成功即进入 [`ContainerState::Built`]，显式关闭后进入
/// [`ContainerState::Closed`]，不可逆。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContainerState {
    /// 已构建，可以解析组件
    #[default]
    Built,
    /// 已关闭，所有实例已释放
    Closed,
}

impl ContainerState {
    /// 是否可以继续解析
    pub fn can_resolve(self) -> bool {
        matches!(self, Self::Built)
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Built => f.write_str("built"),
            Self::Closed => f.write_str("closed"),
        }
    }
}
