//! 退货通知服务入口
//!
//! 从标准输入读取一条 JSON 载荷，对演示名录执行一次通知调度，
//! 并把各渠道结果以 JSON 输出到标准输出。

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use return_notification::{
    Contractor, ContractorKind, Employee, InMemoryDirectory, Localizer, LoggingClientNotifier,
    LoggingMessageGateway, Reseller, ReturnNotificationService, StaticSettings, TemplateCatalog,
};
use returns_shared::config::AppConfig;
use returns_shared::observability;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load("return-notification-service").context("加载配置失败")?;
    observability::init(&config.observability)?;

    info!(
        service = %config.service_name,
        environment = %config.environment,
        "Starting return-notification-service..."
    );

    let permit_key = config.notification.staff_permit_key.clone();
    let settings = StaticSettings::new()
        .with_sender(1, "returns@example.com")
        .with_staff_addresses(
            1,
            permit_key.clone(),
            vec![
                "support@example.com".to_string(),
                "quality@example.com".to_string(),
            ],
        );
    let localizer: Arc<dyn Localizer> = Arc::new(TemplateCatalog::with_defaults());

    let service = ReturnNotificationService::new(
        Arc::new(demo_directory()),
        Arc::new(settings),
        Arc::new(LoggingMessageGateway),
        Arc::new(LoggingClientNotifier),
        localizer,
        permit_key,
    );

    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("读取标准输入失败")?;
    let payload: serde_json::Value = serde_json::from_str(&raw).context("载荷不是合法 JSON")?;

    match service.execute(&payload).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            error!(
                code = e.code(),
                http_status = e.http_status(),
                error = %e,
                "退货通知操作失败"
            );
            Err(e.into())
        }
    }
}

/// 演示名录
///
/// 销售商 1 名下有客户 2（带邮箱和手机号），员工 3/4 分别作为
/// 创建人和审核专家。
fn demo_directory() -> InMemoryDirectory {
    InMemoryDirectory::new()
        .with_reseller(Reseller { id: 1 })
        .with_contractor(Contractor {
            id: 2,
            kind: ContractorKind::Customer,
            name: "客户甲".to_string(),
            full_name: Some("客户甲有限公司".to_string()),
            reseller_id: 1,
            email: Some("client@example.com".to_string()),
            mobile: Some("13800000000".to_string()),
        })
        .with_employee(Employee {
            id: 3,
            name: "李四".to_string(),
            full_name: None,
        })
        .with_employee(Employee {
            id: 4,
            name: "王五".to_string(),
            full_name: None,
        })
}
