//! 业务实体模型
//!
//! 实体由外部名录解析得到，在单次操作内作为只读快照使用，
//! 本核心不持有也不修改它们。

use serde::{Deserialize, Serialize};

/// 销售商
///
/// 通知以销售商为作用域发送，模板渲染也按销售商隔离。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reseller {
    pub id: i64,
}

/// 合作方类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractorKind {
    /// 客户
    Customer,
    /// 供应商
    Supplier,
}

/// 合作方
///
/// 客户是 Customer 类型的合作方，归属于某一销售商。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contractor {
    pub id: i64,
    pub kind: ContractorKind,
    pub name: String,
    pub full_name: Option<String>,
    /// 归属销售商 id
    pub reseller_id: i64,
    pub email: Option<String>,
    pub mobile: Option<String>,
}

impl Contractor {
    /// 展示名称：优先全名，缺失或为空时回退到简称
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(full) if !full.is_empty() => full,
            _ => &self.name,
        }
    }
}

/// 员工
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub full_name: Option<String>,
}

impl Employee {
    /// 展示名称：优先全名，缺失或为空时回退到简称
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(full) if !full.is_empty() => full,
            _ => &self.name,
        }
    }
}

/// 员工角色
///
/// 决定实体解析失败时错误信息中的角色名称。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeRole {
    /// 投诉创建人
    Creator,
    /// 审核专家
    Expert,
}

impl EmployeeRole {
    /// 角色在错误信息中的名称
    pub fn label(&self) -> &'static str {
        match self {
            Self::Creator => "创建人",
            Self::Expert => "审核专家",
        }
    }
}
