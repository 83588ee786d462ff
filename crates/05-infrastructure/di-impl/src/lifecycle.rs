//! 实例关闭
//!
//! 依次关闭所有暴露可关闭能力的实例，收集全部失败而不是在第一个失败处停止。

use crate::cache::CachedEntry;
use infrastructure_common::{CloseError, CloseFailure, TypeInfo};
use tracing::{debug, warn};

/// 关闭实例，`entries` 为创建顺序
pub(crate) fn close_instances(
    mut entries: Vec<(TypeInfo, CachedEntry)>,
    reverse_order: bool,
) -> Result<(), CloseError> {
    if reverse_order {
        entries.reverse();
    }

    let mut failures = Vec::new();
    for (type_info, entry) in entries {
        let CachedEntry::Ready(instance) = entry else {
            continue;
        };
        let Some(closable) = instance.as_closable() else {
            continue;
        };

        match closable.close() {
            Ok(()) => debug!("组件已关闭: {}", type_info.name),
            Err(error) => {
                warn!("组件关闭失败: {}, 原因: {}", type_info.name, error);
                failures.push(CloseFailure {
                    type_name: type_info.name.to_string(),
                    source: error,
                });
            }
        }
    }

    CloseError::from_failures(failures).map_or(Ok(()), Err)
}
