//! 错误类型定义
//!
//! 定义退货通知操作的错误分类。解析、实体解析、模板组装阶段的
//! 错误对整个操作都是终止性的；进入调度阶段后单渠道的失败只记录
//! 在结果中，不再作为错误抛出。

use thiserror::Error;

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, OperationError>;

/// 退货通知操作错误
#[derive(Debug, Error)]
pub enum OperationError {
    /// 请求字段缺失、为空或类型不合法
    #[error("请求参数无效: {field}")]
    InvalidRequest { field: String },

    /// 实体不存在或引用关系不一致
    #[error("{entity}未找到")]
    NotFound { entity: String },

    /// 通知类型与状态差异的组合不合法
    #[error("无效的通知类型")]
    InvalidNotificationType,

    /// 模板参数存在空值，属于服务端数据完整性问题
    #[error("模板参数 ({key}) 为空")]
    TemplateDataIncomplete { key: String },

    /// 名录查询底层失败，区别于干净的"不存在"
    #[error("名录查询失败: {0}")]
    Directory(String),
}

impl OperationError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "INVALID_REQUEST",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidNotificationType => "INVALID_NOTIFICATION_TYPE",
            Self::TemplateDataIncomplete { .. } => "TEMPLATE_DATA_INCOMPLETE",
            Self::Directory(_) => "DIRECTORY_ERROR",
        }
    }

    /// 获取 HTTP 风格状态码，供上层调用方直接透传
    ///
    /// 输入与实体解析问题归为 400，服务端完整性问题归为 500。
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRequest { .. } | Self::NotFound { .. } | Self::InvalidNotificationType => {
                400
            }
            Self::TemplateDataIncomplete { .. } | Self::Directory(_) => 500,
        }
    }
}
