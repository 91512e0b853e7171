//! 实体解析
//!
//! 依据已验证的标识符解析业务实体，并执行引用一致性规则：
//! 客户必须是 Customer 类型的合作方，且归属于请求中的销售商。

use std::sync::Arc;

use tracing::debug;

use crate::directory::PartyDirectory;
use crate::error::{OperationError, Result};
use crate::model::{Contractor, ContractorKind, Employee, EmployeeRole, Reseller};

/// 销售商引用
///
/// 调用方可能只有标识符，也可能已经解析出销售商对象，
/// 两种形态各自有明确的比较规则，不做运行时类型探测。
#[derive(Debug, Clone, Copy)]
pub enum ResellerRef<'a> {
    /// 仅有标识符，按 id 比较
    Id(i64),
    /// 已解析对象，按对象身份比较
    Resolved(&'a Reseller),
}

/// 实体解析器
pub struct EntityResolver<D: PartyDirectory> {
    directory: Arc<D>,
}

impl<D: PartyDirectory> EntityResolver<D> {
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// 解析销售商
    pub async fn resolve_reseller(&self, id: i64) -> Result<Reseller> {
        debug!(reseller_id = id, "解析销售商");
        self.directory
            .lookup_reseller(id)
            .await?
            .ok_or_else(|| OperationError::NotFound {
                entity: "销售商".to_string(),
            })
    }

    /// 解析客户
    ///
    /// 不存在、非客户类型、归属销售商不一致，三种情况一律视为未找到。
    pub async fn resolve_client(
        &self,
        id: i64,
        reseller: ResellerRef<'_>,
    ) -> Result<Contractor> {
        debug!(client_id = id, "解析客户");
        let client = self.directory.lookup_contractor(id).await?;

        let client = match client {
            Some(c) if c.kind == ContractorKind::Customer => c,
            _ => {
                return Err(OperationError::NotFound {
                    entity: "客户".to_string(),
                })
            }
        };

        let same_reseller = match reseller {
            ResellerRef::Id(reseller_id) => client.reseller_id == reseller_id,
            ResellerRef::Resolved(reseller) => client.reseller_id == reseller.id,
        };
        if !same_reseller {
            return Err(OperationError::NotFound {
                entity: "客户".to_string(),
            });
        }

        Ok(client)
    }

    /// 解析员工
    ///
    /// 创建人和审核专家共用此方法，角色决定错误信息中的名称。
    pub async fn resolve_employee(&self, id: i64, role: EmployeeRole) -> Result<Employee> {
        debug!(employee_id = id, role = role.label(), "解析员工");
        self.directory
            .lookup_employee(id)
            .await?
            .ok_or_else(|| OperationError::NotFound {
                entity: role.label().to_string(),
            })
    }
}
