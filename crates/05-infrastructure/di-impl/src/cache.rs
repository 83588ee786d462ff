//! 实例缓存
//!
//! 每个类型最多一个条目，按首次创建的顺序保存。失败的构造同样会被缓存。

use di_abstractions::Instance;
use indexmap::IndexMap;
use infrastructure_common::{DependencyError, DependencyResult, SharedError, TypeInfo};

/// 缓存条目
#[derive(Debug, Clone)]
pub(crate) enum CachedEntry {
    /// 构造成功的实例
    Ready(Instance),
    /// 提供者返回的错误，后续解析直接重放
    Failed(SharedError),
}

impl CachedEntry {
    pub(crate) fn to_result(&self, type_info: &TypeInfo) -> DependencyResult<Instance> {
        match self {
            Self::Ready(instance) => Ok(instance.clone()),
            Self::Failed(source) => Err(DependencyError::creation_failed(
                type_info.name,
                source.clone(),
            )),
        }
    }

    pub(crate) fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// 实例缓存
#[derive(Debug, Default)]
pub(crate) struct InstanceCache {
    entries: IndexMap<TypeInfo, CachedEntry>,
}

impl InstanceCache {
    pub(crate) fn get(&self, type_info: &TypeInfo) -> Option<&CachedEntry> {
        self.entries.get(type_info)
    }

    /// 写入条目，同一类型只写入一次
    pub(crate) fn insert(&mut self, type_info: TypeInfo, entry: CachedEntry) {
        debug_assert!(!self.entries.contains_key(&type_info));
        self.entries.insert(type_info, entry);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn failed_count(&self) -> usize {
        self.entries.values().filter(|entry| entry.is_failed()).count()
    }

    /// 按创建顺序取出全部条目并清空缓存
    pub(crate) fn drain(&mut self) -> Vec<(TypeInfo, CachedEntry)> {
        self.entries.drain(..).collect()
    }
}
