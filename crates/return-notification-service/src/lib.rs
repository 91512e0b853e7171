//! 退货通知服务
//!
//! 当商品退货投诉被创建或状态变更时，执行一次通知调度：
//! 校验入参载荷、解析关联业务实体、生成变更描述、渲染消息模板、
//! 判定客户通知策略，最后按渠道发送并聚合各渠道结果。
//!
//! ## 核心流程
//!
//! 解析 → 实体解析 → 差异文案 → 模板组装 → 策略判定 → 调度 → 结果聚合
//!
//! 解析、实体解析、模板组装阶段的失败终止整个操作；
//! 进入调度阶段后，单渠道失败只记录在结果里，不影响其他渠道。
//!
//! ## 模块结构
//!
//! - `validate`: 标量字段校验器
//! - `request`: 请求解析与强类型请求记录
//! - `model`: 业务实体模型
//! - `directory`: 实体名录接口与内存参考实现
//! - `resolver`: 实体解析与引用一致性规则
//! - `localization`: 模板渲染/本地化接口与进程内模板目录
//! - `diff`: 变更描述
//! - `template`: 模板参数组装与完整性校验
//! - `policy`: 客户通知策略
//! - `dispatch`: 渠道发送与结果聚合
//! - `service`: 端到端编排
//! - `error`: 错误类型定义

pub mod diff;
pub mod directory;
pub mod dispatch;
pub mod error;
pub mod localization;
pub mod model;
pub mod policy;
pub mod request;
pub mod resolver;
pub mod service;
pub mod template;
pub mod validate;

pub use directory::{InMemoryDirectory, PartyDirectory};
pub use dispatch::{
    ClientNotifier, DispatchResult, EventContext, LoggingClientNotifier, LoggingMessageGateway,
    MessageGateway, NotificationDispatcher, NotificationEvent, NotificationSettings,
    OutboundEmail, SendError, SmsChannelResult, SmsOutcome, StaticSettings,
};
pub use error::{OperationError, Result};
pub use localization::{Localizer, TemplateCatalog, TemplateKey};
pub use model::{Contractor, ContractorKind, Employee, EmployeeRole, Reseller};
pub use policy::should_notify_client;
pub use request::{NotificationType, ReturnNotificationRequest, StatusTransition};
pub use resolver::{EntityResolver, ResellerRef};
pub use service::ReturnNotificationService;
pub use template::TemplateData;
