//! 入参字段校验
//!
//! 对未类型化 JSON 载荷中的标量字段做归一化和类型检查。
//! 全部为纯函数、无副作用、永不 panic，由调用方决定如何处理失败。

use serde_json::Value;

/// 整数字段校验
///
/// 数值、数字字符串和布尔值可归一化为整数，其他类型校验失败。
/// 浮点输入向零截断。
pub fn int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

/// 字符串字段校验
///
/// 布尔值归一化为 "0"/"1"；字符串做 HTML 实体转义后通过；
/// null 合法且归一化为显式缺失（内层 None）；其他类型校验失败（外层 None）。
pub fn str(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Bool(b) => Some(Some(if *b { "1" } else { "0" }.to_string())),
        Value::String(s) => Some(Some(escape_html(s))),
        Value::Null => Some(None),
        _ => None,
    }
}

/// HTML 实体转义
///
/// 覆盖 `& < > " '` 五个字符，其余字符原样保留。
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// 空值判定
///
/// 缺失、null、false、0、0.0、""、"0"、空数组、空对象均视为空。
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Some(Value::String(s)) => s.is_empty() || s == "0",
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_int_accepts_numbers() {
        assert_eq!(int(&json!(42)), Some(42));
        assert_eq!(int(&json!(-7)), Some(-7));
        assert_eq!(int(&json!(3.9)), Some(3));
    }

    #[test]
    fn test_int_accepts_numeric_strings() {
        assert_eq!(int(&json!("42")), Some(42));
        assert_eq!(int(&json!(" 42 ")), Some(42));
        assert_eq!(int(&json!("3.5")), Some(3));
    }

    #[test]
    fn test_int_accepts_booleans() {
        assert_eq!(int(&json!(true)), Some(1));
        assert_eq!(int(&json!(false)), Some(0));
    }

    #[test]
    fn test_int_rejects_other_types() {
        assert_eq!(int(&json!("abc")), None);
        assert_eq!(int(&json!(null)), None);
        assert_eq!(int(&json!([1])), None);
        assert_eq!(int(&json!({"a": 1})), None);
    }

    #[test]
    fn test_str_coerces_booleans() {
        assert_eq!(str(&json!(true)), Some(Some("1".to_string())));
        assert_eq!(str(&json!(false)), Some(Some("0".to_string())));
    }

    #[test]
    fn test_str_escapes_html() {
        assert_eq!(
            str(&json!("<b>退货 & \"单\"</b>")),
            Some(Some("&lt;b&gt;退货 &amp; &quot;单&quot;&lt;/b&gt;".to_string()))
        );
        assert_eq!(
            str(&json!("it's")),
            Some(Some("it&#039;s".to_string()))
        );
    }

    #[test]
    fn test_str_passes_plain_text_through() {
        assert_eq!(str(&json!("RT-2024-001")), Some(Some("RT-2024-001".to_string())));
    }

    #[test]
    fn test_str_null_is_valid_absent() {
        assert_eq!(str(&json!(null)), Some(None));
    }

    #[test]
    fn test_str_rejects_other_types() {
        assert_eq!(str(&json!(42)), None);
        assert_eq!(str(&json!([])), None);
        assert_eq!(str(&json!({})), None);
    }

    #[test]
    fn test_is_empty() {
        assert!(is_empty(None));
        assert!(is_empty(Some(&json!(null))));
        assert!(is_empty(Some(&json!(false))));
        assert!(is_empty(Some(&json!(0))));
        assert!(is_empty(Some(&json!(0.0))));
        assert!(is_empty(Some(&json!(""))));
        assert!(is_empty(Some(&json!("0"))));
        assert!(is_empty(Some(&json!([]))));
        assert!(is_empty(Some(&json!({}))));

        assert!(!is_empty(Some(&json!(1))));
        assert!(!is_empty(Some(&json!(true))));
        assert!(!is_empty(Some(&json!("0.0"))));
        assert!(!is_empty(Some(&json!({"from": 1}))));
    }
}
