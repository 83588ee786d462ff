//! 错误类型定义

use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// 组件构造失败时的原始错误
///
/// 使用 `Arc` 共享，以便失败结果被缓存后可以重复返回同一个错误。
pub type SharedError = Arc<dyn StdError + Send + Sync>;

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("重复注册的提供者: {type_name}")]
    DuplicateProvider { type_name: String },

    #[error("组件未注册: {type_name}")]
    ComponentNotRegistered { type_name: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: SharedError,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("解析深度超过限制 {max_depth}: {type_name}")]
    ResolutionDepthExceeded { type_name: String, max_depth: usize },

    #[error("组件类型转换失败: {type_name}")]
    TypeMismatch { type_name: String },

    #[error("容器已关闭")]
    ContainerClosed,
}

impl DependencyError {
    /// 创建组件未注册错误
    pub fn not_registered(type_name: impl Into<String>) -> Self {
        Self::ComponentNotRegistered {
            type_name: type_name.into(),
        }
    }

    /// 创建组件创建失败错误
    pub fn creation_failed(type_name: impl Into<String>, source: SharedError) -> Self {
        Self::ComponentCreationFailed {
            type_name: type_name.into(),
            source,
        }
    }

    /// 是否为注册阶段的错误
    pub fn is_registration_error(&self) -> bool {
        matches!(self, Self::DuplicateProvider { .. })
    }

    /// 是否因缺少提供者而无法解析
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::ComponentNotRegistered { .. })
    }

    /// 提供者自身返回的错误（仅 [`DependencyError::ComponentCreationFailed`]）
    pub fn construction_source(&self) -> Option<&SharedError> {
        match self {
            Self::ComponentCreationFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// 单个组件关闭失败
#[derive(Error, Debug)]
#[error("{type_name}: {source}")]
pub struct CloseFailure {
    /// 组件类型名称
    pub type_name: String,
    /// 组件返回的错误
    pub source: Box<dyn StdError + Send + Sync>,
}

/// 容器关闭错误
///
/// 聚合所有关闭失败的组件，单个失败不会中断其余组件的关闭。
#[derive(Error, Debug)]
#[error("{} 个组件关闭失败: [{}]", .failures.len(), join_failures(.failures))]
pub struct CloseError {
    failures: Vec<CloseFailure>,
}

impl CloseError {
    /// 创建关闭错误，没有失败时返回 `None`
    pub fn from_failures(failures: Vec<CloseFailure>) -> Option<Self> {
        if failures.is_empty() {
            None
        } else {
            Some(Self { failures })
        }
    }

    /// 获取所有关闭失败
    pub fn failures(&self) -> &[CloseFailure] {
        &self.failures
    }

    /// 获取原始错误
    pub fn errors(&self) -> impl Iterator<Item = &(dyn StdError + Send + Sync + 'static)> + '_ {
        self.failures.iter().map(|failure| failure.source.as_ref())
    }

    /// 失败数量
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// 是否没有失败（构造保证非空）
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// 拆分为失败列表
    pub fn into_failures(self) -> Vec<CloseFailure> {
        self.failures
    }
}

fn join_failures(failures: &[CloseFailure]) -> String {
    failures
        .iter()
        .map(|failure| failure.source.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 结果类型别名
pub type DependencyResult<T> = Result<T, DependencyError>;
