//! 请求解析
//!
//! 将原始未类型化载荷解析为强类型请求记录。每个必填字段先经
//! 对应的字段校验器归一化，再做结构性约束检查；缺失、为空或
//! 校验失败都会产生指明字段名的 `InvalidRequest` 错误。
//! 可选的 `differences` 字段缺失或为空时归一化为显式的 `None`。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::error::{OperationError, Result};
use crate::validate;

/// 通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    /// 新增退货位置
    New,
    /// 退货位置状态变更
    Change,
}

impl NotificationType {
    /// 从载荷中的整数编码转换
    ///
    /// 1 为新增、2 为状态变更，其他取值一律拒绝而不是回退默认。
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            1 => Ok(Self::New),
            2 => Ok(Self::Change),
            _ => Err(OperationError::InvalidNotificationType),
        }
    }
}

/// 状态差异
///
/// from/to 两侧各自可缺失，只有两侧齐全时才能渲染状态变更文案。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

/// 退货通知请求
///
/// 每次调用从原始载荷构造一次，此后不可变。
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReturnNotificationRequest {
    #[validate(range(min = 1, message = "必须为正整数"))]
    pub reseller_id: i64,
    pub notification_type: NotificationType,
    #[validate(range(min = 1, message = "必须为正整数"))]
    pub client_id: i64,
    #[validate(range(min = 1, message = "必须为正整数"))]
    pub creator_id: i64,
    #[validate(range(min = 1, message = "必须为正整数"))]
    pub expert_id: i64,
    #[validate(range(min = 1, message = "必须为正整数"))]
    pub complaint_id: i64,
    pub complaint_number: String,
    #[validate(range(min = 1, message = "必须为正整数"))]
    pub consumption_id: i64,
    pub consumption_number: String,
    pub agreement_number: String,
    pub date: String,
    pub differences: Option<StatusTransition>,
}

/// 结构性约束失败时，按字段声明顺序取出第一个失败字段的载荷名
const FIELD_ORDER: [(&str, &str); 6] = [
    ("reseller_id", "resellerId"),
    ("client_id", "clientId"),
    ("creator_id", "creatorId"),
    ("expert_id", "expertId"),
    ("complaint_id", "complaintId"),
    ("consumption_id", "consumptionId"),
];

impl ReturnNotificationRequest {
    /// 从原始载荷解析请求
    pub fn parse(payload: &Value) -> Result<Self> {
        let data = payload
            .as_object()
            .ok_or_else(|| invalid("data"))?;

        let request = Self {
            reseller_id: required_int(data, "resellerId")?,
            notification_type: NotificationType::from_code(required_int(
                data,
                "notificationType",
            )?)?,
            client_id: required_int(data, "clientId")?,
            creator_id: required_int(data, "creatorId")?,
            expert_id: required_int(data, "expertId")?,
            complaint_id: required_int(data, "complaintId")?,
            complaint_number: required_str(data, "complaintNumber")?,
            consumption_id: required_int(data, "consumptionId")?,
            consumption_number: required_str(data, "consumptionNumber")?,
            agreement_number: required_str(data, "agreementNumber")?,
            date: required_str(data, "date")?,
            differences: parse_differences(data.get("differences"))?,
        };

        request.validate().map_err(|errors| {
            let field_errors = errors.field_errors();
            let field = FIELD_ORDER
                .iter()
                .find(|(rust_name, _)| field_errors.contains_key(*rust_name))
                .map(|(_, payload_name)| *payload_name)
                .unwrap_or("data");
            invalid(field)
        })?;

        Ok(request)
    }
}

fn invalid(field: &str) -> OperationError {
    OperationError::InvalidRequest {
        field: field.to_string(),
    }
}

/// 必填整数字段：缺失、为空或归一化失败都会拒绝
fn required_int(data: &Map<String, Value>, field: &str) -> Result<i64> {
    let value = data.get(field);
    let Some(value) = value.filter(|v| !validate::is_empty(Some(*v))) else {
        return Err(invalid(field));
    };
    validate::int(value).ok_or_else(|| invalid(field))
}

/// 必填字符串字段：归一化后仍为空也会拒绝
fn required_str(data: &Map<String, Value>, field: &str) -> Result<String> {
    let value = data.get(field);
    let Some(value) = value.filter(|v| !validate::is_empty(Some(*v))) else {
        return Err(invalid(field));
    };
    match validate::str(value) {
        Some(Some(s)) if !s.is_empty() => Ok(s),
        _ => Err(invalid(field)),
    }
}

/// 解析可选的状态差异
///
/// 缺失或为空归一化为 `None`；两侧各自为空也归一化为 `None`；
/// 出现非空但无法归一化为整数的一侧，按请求错误拒绝。
fn parse_differences(value: Option<&Value>) -> Result<Option<StatusTransition>> {
    if validate::is_empty(value) {
        return Ok(None);
    }
    let map = value
        .and_then(Value::as_object)
        .ok_or_else(|| invalid("differences"))?;

    Ok(Some(StatusTransition {
        from: transition_side(map, "from")?,
        to: transition_side(map, "to")?,
    }))
}

fn transition_side(map: &Map<String, Value>, side: &str) -> Result<Option<i64>> {
    let value = map.get(side);
    let Some(value) = value.filter(|v| !validate::is_empty(Some(*v))) else {
        return Ok(None);
    };
    validate::int(value)
        .map(Some)
        .ok_or_else(|| invalid("differences"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// 构造覆盖所有必填字段的合法载荷
    fn valid_payload() -> Value {
        json!({
            "resellerId": 17,
            "notificationType": 1,
            "clientId": 42,
            "creatorId": 5,
            "expertId": 6,
            "complaintId": 100,
            "complaintNumber": "RT-2024-0100",
            "consumptionId": 200,
            "consumptionNumber": "CN-2024-0200",
            "agreementNumber": "AG-2024-0007",
            "date": "2024-06-01"
        })
    }

    #[test]
    fn test_parse_valid_new_request() {
        let request = ReturnNotificationRequest::parse(&valid_payload()).expect("解析合法载荷失败");

        assert_eq!(request.reseller_id, 17);
        assert_eq!(request.notification_type, NotificationType::New);
        assert_eq!(request.complaint_number, "RT-2024-0100");
        assert_eq!(request.differences, None);
    }

    #[test]
    fn test_parse_change_request_with_differences() {
        let mut payload = valid_payload();
        payload["notificationType"] = json!(2);
        payload["differences"] = json!({"from": 1, "to": 2});

        let request = ReturnNotificationRequest::parse(&payload).expect("解析状态变更载荷失败");

        assert_eq!(request.notification_type, NotificationType::Change);
        assert_eq!(
            request.differences,
            Some(StatusTransition {
                from: Some(1),
                to: Some(2)
            })
        );
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        for field in [
            "resellerId",
            "notificationType",
            "clientId",
            "creatorId",
            "expertId",
            "complaintId",
            "complaintNumber",
            "consumptionId",
            "consumptionNumber",
            "agreementNumber",
            "date",
        ] {
            let mut payload = valid_payload();
            payload.as_object_mut().unwrap().remove(field);

            match ReturnNotificationRequest::parse(&payload) {
                Err(OperationError::InvalidRequest { field: named }) => {
                    assert_eq!(named, field);
                }
                other => panic!("字段 {field} 缺失应被拒绝，实际结果: {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_rejects_empty_field() {
        let mut payload = valid_payload();
        payload["complaintNumber"] = json!("");

        match ReturnNotificationRequest::parse(&payload) {
            Err(OperationError::InvalidRequest { field }) => {
                assert_eq!(field, "complaintNumber");
            }
            other => panic!("空字段应被拒绝，实际结果: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_wrong_typed_field() {
        let mut payload = valid_payload();
        payload["complaintId"] = json!({"id": 100});

        match ReturnNotificationRequest::parse(&payload) {
            Err(OperationError::InvalidRequest { field }) => assert_eq!(field, "complaintId"),
            other => panic!("类型错误字段应被拒绝，实际结果: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_negative_id() {
        let mut payload = valid_payload();
        payload["clientId"] = json!(-42);

        match ReturnNotificationRequest::parse(&payload) {
            Err(OperationError::InvalidRequest { field }) => assert_eq!(field, "clientId"),
            other => panic!("负数 id 应被拒绝，实际结果: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_non_object_payload() {
        match ReturnNotificationRequest::parse(&json!("raw")) {
            Err(OperationError::InvalidRequest { field }) => assert_eq!(field, "data"),
            other => panic!("非对象载荷应被拒绝，实际结果: {other:?}"),
        }
    }

    #[test]
    fn test_parse_escapes_string_fields() {
        let mut payload = valid_payload();
        payload["agreementNumber"] = json!("AG<2024>&001");

        let request = ReturnNotificationRequest::parse(&payload).expect("解析失败");
        assert_eq!(request.agreement_number, "AG&lt;2024&gt;&amp;001");
    }

    #[test]
    fn test_parse_empty_differences_normalizes_to_none() {
        let mut payload = valid_payload();
        payload["differences"] = json!({});
        let request = ReturnNotificationRequest::parse(&payload).expect("解析失败");
        assert_eq!(request.differences, None);

        let mut payload = valid_payload();
        payload["differences"] = json!(null);
        let request = ReturnNotificationRequest::parse(&payload).expect("解析失败");
        assert_eq!(request.differences, None);
    }

    #[test]
    fn test_parse_partial_differences() {
        let mut payload = valid_payload();
        payload["notificationType"] = json!(2);
        payload["differences"] = json!({"to": 2});

        let request = ReturnNotificationRequest::parse(&payload).expect("解析失败");
        assert_eq!(
            request.differences,
            Some(StatusTransition {
                from: None,
                to: Some(2)
            })
        );
    }

    #[test]
    fn test_parse_rejects_garbled_differences() {
        let mut payload = valid_payload();
        payload["differences"] = json!({"from": "abc", "to": 2});

        match ReturnNotificationRequest::parse(&payload) {
            Err(OperationError::InvalidRequest { field }) => assert_eq!(field, "differences"),
            other => panic!("无法归一化的差异应被拒绝，实际结果: {other:?}"),
        }
    }

    #[test]
    fn test_notification_type_from_code() {
        assert_eq!(
            NotificationType::from_code(1).unwrap(),
            NotificationType::New
        );
        assert_eq!(
            NotificationType::from_code(2).unwrap(),
            NotificationType::Change
        );
        assert!(matches!(
            NotificationType::from_code(99),
            Err(OperationError::InvalidNotificationType)
        ));
    }

    #[test]
    fn test_numeric_string_ids_coerce() {
        let mut payload = valid_payload();
        payload["resellerId"] = json!("17");

        let request = ReturnNotificationRequest::parse(&payload).expect("解析失败");
        assert_eq!(request.reseller_id, 17);
    }
}
