//! 实体名录接口
//!
//! 定义实体查询接口，便于核心依赖抽象而非具体实现，支持 mock 测试。
//! 查询返回 `Ok(None)` 表示实体干净地不存在，`Err` 表示底层查询本身失败。

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Contractor, Employee, Reseller};

/// 实体名录接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PartyDirectory: Send + Sync {
    async fn lookup_reseller(&self, id: i64) -> Result<Option<Reseller>>;
    async fn lookup_contractor(&self, id: i64) -> Result<Option<Contractor>>;
    async fn lookup_employee(&self, id: i64) -> Result<Option<Employee>>;
}

/// 内存名录
///
/// 供演示二进制和集成测试使用的参考实现，数据在构造时一次性注入。
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    resellers: HashMap<i64, Reseller>,
    contractors: HashMap<i64, Contractor>,
    employees: HashMap<i64, Employee>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reseller(mut self, reseller: Reseller) -> Self {
        self.resellers.insert(reseller.id, reseller);
        self
    }

    pub fn with_contractor(mut self, contractor: Contractor) -> Self {
        self.contractors.insert(contractor.id, contractor);
        self
    }

    pub fn with_employee(mut self, employee: Employee) -> Self {
        self.employees.insert(employee.id, employee);
        self
    }
}

#[async_trait]
impl PartyDirectory for InMemoryDirectory {
    async fn lookup_reseller(&self, id: i64) -> Result<Option<Reseller>> {
        Ok(self.resellers.get(&id).cloned())
    }

    async fn lookup_contractor(&self, id: i64) -> Result<Option<Contractor>> {
        Ok(self.contractors.get(&id).cloned())
    }

    async fn lookup_employee(&self, id: i64) -> Result<Option<Employee>> {
        Ok(self.employees.get(&id).cloned())
    }
}
