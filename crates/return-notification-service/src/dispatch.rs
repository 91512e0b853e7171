//! 通知调度
//!
//! 执行实际发送：员工邮件群发、客户邮件、客户短信，并把三个渠道的
//! 结果聚合为一条记录。渠道之间相互独立，单渠道失败不阻止其他渠道，
//! 也不使整个操作失败——部分失败在这里是正常运行状态，不是异常。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::localization::{Localizer, TemplateKey};
use crate::model::Contractor;
use crate::policy::should_notify_client;
use crate::request::ReturnNotificationRequest;
use crate::template::TemplateData;

/// 渠道发送错误
///
/// 仅在调度阶段内部流转，记录进日志或结果，从不终止整个操作。
#[derive(Debug, Error)]
#[error("发送失败: 渠道={channel}, 原因={reason}")]
pub struct SendError {
    pub channel: String,
    pub reason: String,
}

/// 通知事件类型
///
/// 随消息传递给外部网关，用于下游的事件归类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationEvent {
    /// 退货状态变更
    ChangeReturnStatus,
}

impl NotificationEvent {
    /// 事件的线上名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChangeReturnStatus => "changeReturnStatus",
        }
    }
}

/// 发送上下文
///
/// 员工渠道只携带事件类型；客户渠道额外携带客户 id 和目标状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventContext {
    pub event: NotificationEvent,
    pub client_id: Option<i64>,
    pub status_to: Option<i64>,
}

impl EventContext {
    pub fn staff(event: NotificationEvent) -> Self {
        Self {
            event,
            client_id: None,
            status_to: None,
        }
    }

    pub fn client(event: NotificationEvent, client_id: i64, status_to: i64) -> Self {
        Self {
            event,
            client_id: Some(client_id),
            status_to: Some(status_to),
        }
    }
}

/// 外发邮件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundEmail {
    pub email_from: String,
    pub email_to: String,
    pub subject: String,
    pub message: String,
}

/// 短信发送结果
///
/// 外部通知管理器返回的原始结果，成功标志与错误信息相互独立。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmsOutcome {
    pub sent: bool,
    pub error: Option<String>,
}

/// 邮件网关接口
///
/// 对核心而言发送是一次性的同步调用，不做重试。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageGateway: Send + Sync {
    async fn send_email(
        &self,
        email: &OutboundEmail,
        reseller_id: i64,
        context: &EventContext,
    ) -> Result<(), SendError>;
}

/// 客户通知管理器接口
///
/// 负责客户侧短信渠道，结果（成功标志 + 可选错误文本）原样上抛。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientNotifier: Send + Sync {
    async fn notify(
        &self,
        reseller_id: i64,
        client_id: i64,
        event: NotificationEvent,
        status_to: i64,
        template_data: &TemplateData,
    ) -> SmsOutcome;
}

/// 通知设置接口
///
/// 提供发件地址与允许接收通知的员工邮箱，按销售商维度配置。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSettings: Send + Sync {
    /// 销售商的发件地址，未配置时为 None
    async fn sender_address(&self, reseller_id: i64) -> Option<String>;

    /// 允许接收该类通知的员工邮箱列表
    async fn permitted_staff_addresses(&self, reseller_id: i64, permit_key: &str) -> Vec<String>;
}

/// 短信渠道结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsChannelResult {
    /// 是否已发出
    pub is_sent: bool,
    /// 错误信息，无错误时为空字符串
    pub message: String,
}

/// 调度结果
///
/// 三个渠道槽位相互独立；未尝试的渠道保留默认值（false/空串）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    pub notification_employee_by_email: bool,
    pub notification_client_by_email: bool,
    pub notification_client_by_sms: SmsChannelResult,
    /// 完成时间
    pub completed_at: DateTime<Utc>,
}

impl Default for DispatchResult {
    fn default() -> Self {
        Self {
            notification_employee_by_email: false,
            notification_client_by_email: false,
            notification_client_by_sms: SmsChannelResult::default(),
            completed_at: Utc::now(),
        }
    }
}

/// 通知调度器
///
/// 聚合设置、邮件网关、客户通知管理器与模板渲染，按渠道顺序执行发送。
pub struct NotificationDispatcher<S, G, N>
where
    S: NotificationSettings,
    G: MessageGateway,
    N: ClientNotifier,
{
    settings: Arc<S>,
    gateway: Arc<G>,
    notifier: Arc<N>,
    localizer: Arc<dyn Localizer>,
    /// 员工邮件权限配置键
    staff_permit_key: String,
}

impl<S, G, N> NotificationDispatcher<S, G, N>
where
    S: NotificationSettings,
    G: MessageGateway,
    N: ClientNotifier,
{
    pub fn new(
        settings: Arc<S>,
        gateway: Arc<G>,
        notifier: Arc<N>,
        localizer: Arc<dyn Localizer>,
        staff_permit_key: impl Into<String>,
    ) -> Self {
        Self {
            settings,
            gateway,
            notifier,
            localizer,
            staff_permit_key: staff_permit_key.into(),
        }
    }

    /// 执行一次调度
    ///
    /// 员工邮件总是尝试；客户邮件与客户短信受策略和联系方式约束。
    pub async fn dispatch(
        &self,
        request: &ReturnNotificationRequest,
        client: &Contractor,
        template_data: &TemplateData,
    ) -> DispatchResult {
        let mut result = DispatchResult::default();

        result.notification_employee_by_email =
            self.notify_staff(request.reseller_id, template_data).await;

        if should_notify_client(request.notification_type, request.differences.as_ref()) {
            // 策略放行即保证存在目标状态
            if let Some(status_to) = request.differences.and_then(|transition| transition.to) {
                result.notification_client_by_email = self
                    .notify_client_email(request.reseller_id, client, status_to, template_data)
                    .await;

                if let Some(outcome) = self
                    .notify_client_sms(request.reseller_id, client, status_to, template_data)
                    .await
                {
                    result.notification_client_by_sms = SmsChannelResult {
                        is_sent: outcome.sent,
                        message: outcome.error.unwrap_or_default(),
                    };
                }
            }
        }

        result.completed_at = Utc::now();
        result
    }

    /// 员工邮件群发
    ///
    /// 未配置任何收件地址时记为未发送，不作为错误。
    /// 只要存在至少一个收件地址即记为已发送，单个地址的失败只记日志。
    async fn notify_staff(&self, reseller_id: i64, template_data: &TemplateData) -> bool {
        let email_from = self
            .settings
            .sender_address(reseller_id)
            .await
            .unwrap_or_default();
        let addresses = self
            .settings
            .permitted_staff_addresses(reseller_id, &self.staff_permit_key)
            .await;

        if addresses.is_empty() {
            info!(
                reseller_id,
                permit_key = %self.staff_permit_key,
                "没有允许接收通知的员工邮箱，跳过员工邮件"
            );
            return false;
        }

        let subject = self.localizer.render(
            TemplateKey::ComplaintEmployeeEmailSubject,
            Some(template_data.as_map()),
            reseller_id,
        );
        let body = self.localizer.render(
            TemplateKey::ComplaintEmployeeEmailBody,
            Some(template_data.as_map()),
            reseller_id,
        );
        let context = EventContext::staff(NotificationEvent::ChangeReturnStatus);

        for address in &addresses {
            let email = OutboundEmail {
                email_from: email_from.clone(),
                email_to: address.clone(),
                subject: subject.clone(),
                message: body.clone(),
            };
            if let Err(e) = self.gateway.send_email(&email, reseller_id, &context).await {
                warn!(reseller_id, email_to = %address, error = %e, "员工邮件发送失败");
            }
        }

        true
    }

    /// 客户邮件
    ///
    /// 发件地址与客户邮箱齐全时才尝试；发起即记为已发送，
    /// 网关层面的失败只记日志。
    async fn notify_client_email(
        &self,
        reseller_id: i64,
        client: &Contractor,
        status_to: i64,
        template_data: &TemplateData,
    ) -> bool {
        let Some(email_from) = self
            .settings
            .sender_address(reseller_id)
            .await
            .filter(|address| !address.is_empty())
        else {
            info!(reseller_id, "未配置发件地址，跳过客户邮件");
            return false;
        };
        let Some(email_to) = client
            .email
            .as_deref()
            .filter(|address| !address.is_empty())
        else {
            info!(reseller_id, client_id = client.id, "客户无邮箱，跳过客户邮件");
            return false;
        };

        let email = OutboundEmail {
            email_from,
            email_to: email_to.to_string(),
            subject: self.localizer.render(
                TemplateKey::ComplaintClientEmailSubject,
                Some(template_data.as_map()),
                reseller_id,
            ),
            message: self.localizer.render(
                TemplateKey::ComplaintClientEmailBody,
                Some(template_data.as_map()),
                reseller_id,
            ),
        };
        let context =
            EventContext::client(NotificationEvent::ChangeReturnStatus, client.id, status_to);

        if let Err(e) = self.gateway.send_email(&email, reseller_id, &context).await {
            warn!(reseller_id, client_id = client.id, error = %e, "客户邮件发送失败");
        }

        true
    }

    /// 客户短信
    ///
    /// 客户有手机号才尝试；结果无论成败都原样返回给调用方聚合。
    async fn notify_client_sms(
        &self,
        reseller_id: i64,
        client: &Contractor,
        status_to: i64,
        template_data: &TemplateData,
    ) -> Option<SmsOutcome> {
        client
            .mobile
            .as_deref()
            .filter(|mobile| !mobile.is_empty())?;

        let outcome = self
            .notifier
            .notify(
                reseller_id,
                client.id,
                NotificationEvent::ChangeReturnStatus,
                status_to,
                template_data,
            )
            .await;

        if let Some(error) = &outcome.error {
            warn!(reseller_id, client_id = client.id, error = %error, "客户短信发送失败");
        }

        Some(outcome)
    }
}

// ---------------------------------------------------------------------------
// 参考实现
// ---------------------------------------------------------------------------

/// 日志邮件网关
///
/// 模拟发送（仅记录日志），便于在无外部依赖的情况下验证调度管道的
/// 完整性。接入真实邮件服务时只需实现同一 trait。
pub struct LoggingMessageGateway;

#[async_trait]
impl MessageGateway for LoggingMessageGateway {
    async fn send_email(
        &self,
        email: &OutboundEmail,
        reseller_id: i64,
        context: &EventContext,
    ) -> Result<(), SendError> {
        let message_id = Uuid::now_v7().to_string();

        info!(
            channel = "EMAIL",
            reseller_id,
            message_id = %message_id,
            email_to = %email.email_to,
            event = context.event.as_str(),
            subject = %email.subject,
            "模拟发送邮件"
        );

        Ok(())
    }
}

/// 日志客户通知器
///
/// 模拟短信发送，总是返回成功。
pub struct LoggingClientNotifier;

#[async_trait]
impl ClientNotifier for LoggingClientNotifier {
    async fn notify(
        &self,
        reseller_id: i64,
        client_id: i64,
        event: NotificationEvent,
        status_to: i64,
        _template_data: &TemplateData,
    ) -> SmsOutcome {
        let message_id = Uuid::now_v7().to_string();

        info!(
            channel = "SMS",
            reseller_id,
            client_id,
            status_to,
            message_id = %message_id,
            event = event.as_str(),
            "模拟发送客户短信"
        );

        SmsOutcome {
            sent: true,
            error: None,
        }
    }
}

/// 静态通知设置
///
/// 以固定表提供发件地址与员工收件地址，供演示二进制和集成测试使用。
#[derive(Debug, Default)]
pub struct StaticSettings {
    sender_addresses: HashMap<i64, String>,
    staff_addresses: HashMap<(i64, String), Vec<String>>,
}

impl StaticSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sender(mut self, reseller_id: i64, address: impl Into<String>) -> Self {
        self.sender_addresses.insert(reseller_id, address.into());
        self
    }

    pub fn with_staff_addresses(
        mut self,
        reseller_id: i64,
        permit_key: impl Into<String>,
        addresses: Vec<String>,
    ) -> Self {
        self.staff_addresses
            .insert((reseller_id, permit_key.into()), addresses);
        self
    }
}

#[async_trait]
impl NotificationSettings for StaticSettings {
    async fn sender_address(&self, reseller_id: i64) -> Option<String> {
        self.sender_addresses.get(&reseller_id).cloned()
    }

    async fn permitted_staff_addresses(&self, reseller_id: i64, permit_key: &str) -> Vec<String> {
        self.staff_addresses
            .get(&(reseller_id, permit_key.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}
