//! 客户通知策略
//!
//! 决定是否向客户发送外部通知的纯策略函数，不触碰任何外部依赖。

use crate::request::{NotificationType, StatusTransition};

/// 是否向客户发送通知
///
/// 仅当状态确实发生了变更时通知客户：通知类型为状态变更，
/// 且差异中存在目标状态。新增通知只通知内部员工。
pub fn should_notify_client(
    notification_type: NotificationType,
    differences: Option<&StatusTransition>,
) -> bool {
    notification_type == NotificationType::Change
        && differences.is_some_and(|transition| transition.to.is_some())
}
