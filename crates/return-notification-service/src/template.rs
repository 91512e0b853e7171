//! 模板参数组装
//!
//! 把请求字段、已解析实体和差异文案压平为固定键名的参数集，
//! 作为所有邮件与短信模板的唯一数据来源。

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{OperationError, Result};
use crate::model::{Contractor, Employee};
use crate::request::ReturnNotificationRequest;

/// 模板参数键名
pub mod keys {
    pub const COMPLAINT_ID: &str = "COMPLAINT_ID";
    pub const COMPLAINT_NUMBER: &str = "COMPLAINT_NUMBER";
    pub const CREATOR_ID: &str = "CREATOR_ID";
    pub const CREATOR_NAME: &str = "CREATOR_NAME";
    pub const EXPERT_ID: &str = "EXPERT_ID";
    pub const EXPERT_NAME: &str = "EXPERT_NAME";
    pub const CLIENT_ID: &str = "CLIENT_ID";
    pub const CLIENT_NAME: &str = "CLIENT_NAME";
    pub const CONSUMPTION_ID: &str = "CONSUMPTION_ID";
    pub const CONSUMPTION_NUMBER: &str = "CONSUMPTION_NUMBER";
    pub const AGREEMENT_NUMBER: &str = "AGREEMENT_NUMBER";
    pub const DATE: &str = "DATE";
    pub const DIFFERENCES: &str = "DIFFERENCES";
}

/// 模板参数集
///
/// 固定键名的有序映射。任何空值都意味着上游数据不一致，
/// 必须在进入调度阶段之前被 `ensure_complete` 拦下。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateData(BTreeMap<String, String>);

impl TemplateData {
    /// 从请求和已解析实体组装参数集
    pub fn assemble(
        request: &ReturnNotificationRequest,
        client: &Contractor,
        creator: &Employee,
        expert: &Employee,
        differences_text: &str,
    ) -> Self {
        let mut data = BTreeMap::new();

        data.insert(keys::COMPLAINT_ID.to_string(), request.complaint_id.to_string());
        data.insert(
            keys::COMPLAINT_NUMBER.to_string(),
            request.complaint_number.clone(),
        );
        data.insert(keys::CREATOR_ID.to_string(), request.creator_id.to_string());
        data.insert(keys::CREATOR_NAME.to_string(), creator.display_name().to_string());
        data.insert(keys::EXPERT_ID.to_string(), request.expert_id.to_string());
        data.insert(keys::EXPERT_NAME.to_string(), expert.display_name().to_string());
        data.insert(keys::CLIENT_ID.to_string(), request.client_id.to_string());
        data.insert(keys::CLIENT_NAME.to_string(), client.display_name().to_string());
        data.insert(
            keys::CONSUMPTION_ID.to_string(),
            request.consumption_id.to_string(),
        );
        data.insert(
            keys::CONSUMPTION_NUMBER.to_string(),
            request.consumption_number.clone(),
        );
        data.insert(
            keys::AGREEMENT_NUMBER.to_string(),
            request.agreement_number.clone(),
        );
        data.insert(keys::DATE.to_string(), request.date.clone());
        data.insert(keys::DIFFERENCES.to_string(), differences_text.to_string());

        Self(data)
    }

    /// 校验所有参数均非空
    ///
    /// 按键名顺序遍历，命中第一个空值即失败并指明键名。
    pub fn ensure_complete(&self) -> Result<()> {
        for (key, value) in &self.0 {
            if value.is_empty() {
                return Err(OperationError::TemplateDataIncomplete { key: key.clone() });
            }
        }
        Ok(())
    }

    /// 写入或覆盖单个参数
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}
