//! 变更描述
//!
//! 依据通知类型和状态差异生成"发生了什么变化"的文案。
//! 对合法的枚举输入该函数是全函数；类型与差异组合不合法时
//! 立即失败，绝不回退到默认文案。

use std::collections::BTreeMap;

use crate::error::{OperationError, Result};
use crate::localization::{Localizer, TemplateKey};
use crate::request::{NotificationType, StatusTransition};

/// 生成差异文案
///
/// 新增通知不需要差异数据；状态变更通知要求 from/to 两侧齐全，
/// 并将状态码解析为人类可读名称后填入模板。
pub fn describe(
    notification_type: NotificationType,
    differences: Option<&StatusTransition>,
    reseller_id: i64,
    localizer: &dyn Localizer,
) -> Result<String> {
    match notification_type {
        NotificationType::New => {
            Ok(localizer.render(TemplateKey::NewPositionAdded, None, reseller_id))
        }
        NotificationType::Change => {
            if let Some(transition) = differences {
                if let (Some(from), Some(to)) = (transition.from, transition.to) {
                    let mut params = BTreeMap::new();
                    params.insert("FROM".to_string(), localizer.status_name(from));
                    params.insert("TO".to_string(), localizer.status_name(to));
                    return Ok(localizer.render(
                        TemplateKey::PositionStatusHasChanged,
                        Some(&params),
                        reseller_id,
                    ));
                }
            }
            Err(OperationError::InvalidNotificationType)
        }
    }
}
