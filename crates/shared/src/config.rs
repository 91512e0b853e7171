//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// 日志级别（如 "info", "debug"）
    pub log_level: String,
    /// 日志输出格式：json（结构化）或 pretty（人类可读）
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

/// 通知配置
///
/// 外部协作方（名录、模板、网关）各自持有自己的配置，
/// 这里只保留调度核心本身需要的开关。
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// 员工邮件权限配置键，决定哪些员工邮箱可以收到退货通知
    pub staff_permit_key: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            staff_permit_key: "tsGoodsReturn".to_string(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. 环境变量（RETURNS_ 前缀，如 RETURNS_OBSERVABILITY_LOG_LEVEL）
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("RETURNS_ENV").unwrap_or_else(|_| "development".to_string());

        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let builder = Config::builder()
            // 默认配置
            .set_default("service_name", service_name)?
            .set_default("environment", env.clone())?
            // 加载默认配置文件
            .add_source(File::from(Path::new(&config_dir).join("default.toml")).required(false))
            // 加载环境特定配置
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", env))).required(false),
            )
            // 环境变量覆盖（RETURNS_OBSERVABILITY_LOG_LEVEL -> observability.log_level）
            .add_source(
                Environment::with_prefix("RETURNS")
                    .separator("_")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_observability_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, "pretty");
    }

    #[test]
    fn test_default_notification_config() {
        let config = NotificationConfig::default();
        assert_eq!(config.staff_permit_key, "tsGoodsReturn");
    }

    #[test]
    fn test_load_without_config_files() {
        // 配置文件不存在时应回退到默认值
        let config = AppConfig::load("return-notification-service")
            .expect("加载默认配置失败");

        assert_eq!(config.service_name, "return-notification-service");
        assert!(!config.environment.is_empty());
    }

    #[test]
    fn test_config_deserialize_from_toml() {
        let raw = r#"
            service_name = "return-notification-service"
            environment = "test"

            [observability]
            log_level = "debug"
            log_format = "json"

            [notification]
            staff_permit_key = "tsGoodsReturn"
        "#;

        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .expect("构建配置失败")
            .try_deserialize()
            .expect("反序列化配置失败");

        assert_eq!(config.environment, "test");
        assert_eq!(config.observability.log_level, "debug");
        assert_eq!(config.observability.log_format, "json");
    }
}
