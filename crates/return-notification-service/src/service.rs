//! 退货通知操作服务
//!
//! 端到端管道的编排入口：解析 → 实体解析 → 差异文案 → 模板组装 →
//! 策略判定与调度 → 聚合结果。解析、实体解析、模板组装阶段的失败
//! 终止整个操作；调度阶段的失败只体现在结果的渠道槽位上。

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument};

use crate::diff;
use crate::directory::PartyDirectory;
use crate::dispatch::{ClientNotifier, DispatchResult, MessageGateway, NotificationDispatcher, NotificationSettings};
use crate::error::Result;
use crate::localization::Localizer;
use crate::model::EmployeeRole;
use crate::request::ReturnNotificationRequest;
use crate::resolver::{EntityResolver, ResellerRef};
use crate::template::TemplateData;

/// 退货通知服务
///
/// 每次调用相互独立，不跨调用共享可变状态；
/// 解析出的实体在单次调用内作为只读快照使用。
pub struct ReturnNotificationService<D, S, G, N>
where
    D: PartyDirectory,
    S: NotificationSettings,
    G: MessageGateway,
    N: ClientNotifier,
{
    resolver: EntityResolver<D>,
    dispatcher: NotificationDispatcher<S, G, N>,
    localizer: Arc<dyn Localizer>,
}

impl<D, S, G, N> ReturnNotificationService<D, S, G, N>
where
    D: PartyDirectory,
    S: NotificationSettings,
    G: MessageGateway,
    N: ClientNotifier,
{
    pub fn new(
        directory: Arc<D>,
        settings: Arc<S>,
        gateway: Arc<G>,
        notifier: Arc<N>,
        localizer: Arc<dyn Localizer>,
        staff_permit_key: impl Into<String>,
    ) -> Self {
        Self {
            resolver: EntityResolver::new(directory),
            dispatcher: NotificationDispatcher::new(
                settings,
                gateway,
                notifier,
                localizer.clone(),
                staff_permit_key,
            ),
            localizer,
        }
    }

    /// 执行一次退货通知调度
    #[instrument(skip(self, payload))]
    pub async fn execute(&self, payload: &Value) -> Result<DispatchResult> {
        let request = ReturnNotificationRequest::parse(payload)?;
        info!(
            reseller_id = request.reseller_id,
            complaint_id = request.complaint_id,
            notification_type = ?request.notification_type,
            "收到退货通知请求"
        );

        let reseller = self.resolver.resolve_reseller(request.reseller_id).await?;
        let client = self
            .resolver
            .resolve_client(request.client_id, ResellerRef::Resolved(&reseller))
            .await?;
        let creator = self
            .resolver
            .resolve_employee(request.creator_id, EmployeeRole::Creator)
            .await?;
        let expert = self
            .resolver
            .resolve_employee(request.expert_id, EmployeeRole::Expert)
            .await?;

        let differences_text = diff::describe(
            request.notification_type,
            request.differences.as_ref(),
            request.reseller_id,
            self.localizer.as_ref(),
        )?;

        let template_data =
            TemplateData::assemble(&request, &client, &creator, &expert, &differences_text);
        template_data.ensure_complete()?;

        let result = self.dispatcher.dispatch(&request, &client, &template_data).await;

        info!(
            reseller_id = request.reseller_id,
            complaint_id = request.complaint_id,
            employee_email = result.notification_employee_by_email,
            client_email = result.notification_client_by_email,
            client_sms = result.notification_client_by_sms.is_sent,
            "退货通知调度完成"
        );

        Ok(result)
    }
}
