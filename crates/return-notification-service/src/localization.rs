//! 模板渲染与本地化
//!
//! 对外的模板渲染/本地化函数被抽象为 `Localizer` 接口，
//! 核心只依赖接口本身，便于在测试中用替身实现做确定性断言。
//! `TemplateCatalog` 是进程内的参考实现，支持 `{{VARIABLE}}` 变量替换。

use std::collections::{BTreeMap, HashMap};

use regex::Regex;
use tracing::warn;

/// 命名模板键
///
/// 与消息目录中的模板一一对应，新增模板时同步扩展。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    /// 新增退货位置的差异文案
    NewPositionAdded,
    /// 状态变更的差异文案
    PositionStatusHasChanged,
    /// 员工邮件主题
    ComplaintEmployeeEmailSubject,
    /// 员工邮件正文
    ComplaintEmployeeEmailBody,
    /// 客户邮件主题
    ComplaintClientEmailSubject,
    /// 客户邮件正文
    ComplaintClientEmailBody,
}

impl TemplateKey {
    /// 模板在消息目录中的名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewPositionAdded => "NewPositionAdded",
            Self::PositionStatusHasChanged => "PositionStatusHasChanged",
            Self::ComplaintEmployeeEmailSubject => "complaintEmployeeEmailSubject",
            Self::ComplaintEmployeeEmailBody => "complaintEmployeeEmailBody",
            Self::ComplaintClientEmailSubject => "complaintClientEmailSubject",
            Self::ComplaintClientEmailBody => "complaintClientEmailBody",
        }
    }
}

/// 模板渲染与状态命名接口
#[cfg_attr(test, mockall::automock)]
pub trait Localizer: Send + Sync {
    /// 渲染指定销售商作用域下的命名模板
    ///
    /// 渲染本身不失败：缺失的模板回退为模板名，缺失的变量保留原样。
    fn render<'a>(
        &self,
        key: TemplateKey,
        params: Option<&'a BTreeMap<String, String>>,
        reseller_id: i64,
    ) -> String;

    /// 状态码的人类可读名称，任何取值都返回非空文本
    fn status_name(&self, code: i64) -> String;
}

/// 进程内模板目录
///
/// 按模板键保存文案并提供 `{{VARIABLE}}` 变量替换。
/// 真实系统中模板按销售商维护在消息目录里，这里所有销售商共享同一份。
pub struct TemplateCatalog {
    templates: HashMap<TemplateKey, String>,
    variable_regex: Regex,
}

impl TemplateCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
            // 匹配 {{VARIABLE}} 格式，变量名支持字母、数字、下划线
            variable_regex: Regex::new(r"\{\{(\w+)\}\}").unwrap(),
        }
    }

    /// 创建带默认文案的目录
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();

        catalog.register(TemplateKey::NewPositionAdded, "新增了商品退货投诉位置");
        catalog.register(
            TemplateKey::PositionStatusHasChanged,
            "退货位置状态已从「{{FROM}}」变更为「{{TO}}」",
        );
        catalog.register(
            TemplateKey::ComplaintEmployeeEmailSubject,
            "退货投诉 {{COMPLAINT_NUMBER}} 通知",
        );
        catalog.register(
            TemplateKey::ComplaintEmployeeEmailBody,
            "投诉单 {{COMPLAINT_NUMBER}}（客户：{{CLIENT_NAME}}，创建人：{{CREATOR_NAME}}，\
             审核专家：{{EXPERT_NAME}}）于 {{DATE}} 更新。{{DIFFERENCES}}。\
             关联消费单 {{CONSUMPTION_NUMBER}}，协议号 {{AGREEMENT_NUMBER}}。",
        );
        catalog.register(
            TemplateKey::ComplaintClientEmailSubject,
            "您的退货投诉 {{COMPLAINT_NUMBER}} 有新进展",
        );
        catalog.register(
            TemplateKey::ComplaintClientEmailBody,
            "尊敬的 {{CLIENT_NAME}}：您在 {{DATE}} 的退货投诉 {{COMPLAINT_NUMBER}} 有新进展。\
             {{DIFFERENCES}}。如有疑问请联系您的专属顾问。",
        );

        catalog
    }

    /// 注册模板文案
    pub fn register(&mut self, key: TemplateKey, template: impl Into<String>) {
        self.templates.insert(key, template.into());
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Localizer for TemplateCatalog {
    fn render<'a>(
        &self,
        key: TemplateKey,
        params: Option<&'a BTreeMap<String, String>>,
        reseller_id: i64,
    ) -> String {
        let Some(template) = self.templates.get(&key) else {
            warn!(template = key.as_str(), reseller_id, "模板未注册，回退为模板名");
            return key.as_str().to_string();
        };

        let Some(params) = params else {
            return template.clone();
        };

        self.variable_regex
            .replace_all(template, |caps: &regex::Captures| {
                let var_name = &caps[1];
                match params.get(var_name) {
                    Some(value) => value.clone(),
                    None => {
                        warn!(
                            template = key.as_str(),
                            variable = var_name,
                            "模板变量未找到，保留原样"
                        );
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
    }

    fn status_name(&self, code: i64) -> String {
        match code {
            1 => "处理中".to_string(),
            2 => "已完成".to_string(),
            3 => "已拒绝".to_string(),
            // 未知状态码也要给出非空名称，模板完整性检查依赖这一点
            other => format!("状态 {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_without_params() {
        let catalog = TemplateCatalog::with_defaults();
        let text = catalog.render(TemplateKey::NewPositionAdded, None, 1);
        assert_eq!(text, "新增了商品退货投诉位置");
    }

    #[test]
    fn test_render_substitutes_variables() {
        let catalog = TemplateCatalog::with_defaults();
        let params = params(&[("FROM", "处理中"), ("TO", "已完成")]);

        let text = catalog.render(TemplateKey::PositionStatusHasChanged, Some(&params), 1);
        assert_eq!(text, "退货位置状态已从「处理中」变更为「已完成」");
    }

    #[test]
    fn test_render_keeps_missing_variables() {
        let catalog = TemplateCatalog::with_defaults();
        let params = params(&[("FROM", "处理中")]);

        let text = catalog.render(TemplateKey::PositionStatusHasChanged, Some(&params), 1);
        assert!(text.contains("处理中"));
        assert!(text.contains("{{TO}}"));
    }

    #[test]
    fn test_render_unregistered_template_falls_back_to_name() {
        let catalog = TemplateCatalog::new();
        let text = catalog.render(TemplateKey::NewPositionAdded, None, 1);
        assert_eq!(text, "NewPositionAdded");
    }

    #[test]
    fn test_status_names() {
        let catalog = TemplateCatalog::with_defaults();
        assert_eq!(catalog.status_name(1), "处理中");
        assert_eq!(catalog.status_name(2), "已完成");
        assert_eq!(catalog.status_name(3), "已拒绝");
        // 未知状态码回退为编号文本，保证非空
        assert_eq!(catalog.status_name(42), "状态 42");
    }

    #[test]
    fn test_template_key_names() {
        assert_eq!(TemplateKey::NewPositionAdded.as_str(), "NewPositionAdded");
        assert_eq!(
            TemplateKey::ComplaintEmployeeEmailSubject.as_str(),
            "complaintEmployeeEmailSubject"
        );
    }
}
