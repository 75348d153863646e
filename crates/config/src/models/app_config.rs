use anyhow::{Context, Result};
use config::{
    builder::DefaultState, Config as ConfigBuilder, ConfigBuilder as Builder, Environment, File,
    FileFormat,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{
    cluster_state::{ClusterConfig, StateConfig},
    server_observability::{ObservabilityConfig, ServerConfig},
};
use crate::validation::ConfigValidator;

/// 默认配置文件搜索路径，按顺序取第一个存在的文件
pub const DEFAULT_CONFIG_PATHS: [&str; 3] = [
    "config/roleview.toml",
    "roleview.toml",
    "/etc/scheduler/roleview.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub cluster: ClusterConfig,
    pub state: StateConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 加载配置：默认值 <- 配置文件 <- `SCHEDULER_` 环境变量
    ///
    /// 环境变量中节名与键名之间用双下划线分隔，如 `SCHEDULER_CLUSTER__NAME`。
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Self::with_defaults(ConfigBuilder::builder())?;

        if let Some(path) = config_path {
            if Path::new(path).exists() {
                builder = builder.add_source(File::new(path, FileFormat::Toml));
            } else {
                return Err(anyhow::anyhow!("配置文件不存在: {}", path));
            }
        } else if let Some(path) = DEFAULT_CONFIG_PATHS
            .iter()
            .find(|path| Path::new(path).exists())
        {
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("SCHEDULER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .context("构建配置失败")?
            .try_deserialize()
            .context("反序列化配置失败")?;

        config.validate()?;

        Ok(config)
    }

    fn with_defaults(builder: Builder<DefaultState>) -> Result<Builder<DefaultState>> {
        let defaults = AppConfig::default();
        Ok(builder
            .set_default("server.bind_address", defaults.server.bind_address)?
            .set_default(
                "server.request_timeout_seconds",
                defaults.server.request_timeout_seconds,
            )?
            .set_default("server.cors_enabled", defaults.server.cors_enabled)?
            .set_default("cluster.name", defaults.cluster.name)?
            .set_default("state.snapshot_path", defaults.state.snapshot_path)?
            .set_default(
                "state.reload_interval_seconds",
                defaults.state.reload_interval_seconds,
            )?
            .set_default("observability.log_level", defaults.observability.log_level)?
            .set_default(
                "observability.log_format",
                defaults.observability.log_format.to_string(),
            )?
            .set_default(
                "observability.metrics_enabled",
                defaults.observability.metrics_enabled,
            )?
            .set_default(
                "observability.metrics_endpoint",
                defaults.observability.metrics_endpoint,
            )?)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_str).context("解析TOML配置失败")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("序列化配置为TOML失败")
    }
}

impl ConfigValidator for AppConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        self.server.validate()?;
        self.cluster.validate()?;
        self.state.validate()?;
        self.observability.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogFormat;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.server.request_timeout_seconds, 30);
        assert_eq!(config.cluster.name, "local");
        assert_eq!(config.state.reload_interval_seconds, 0);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_app_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_app_config_from_toml() {
        let toml_str = r#"
[server]
bind_address = "127.0.0.1:9000"
request_timeout_seconds = 10
cors_enabled = false

[cluster]
name = "smf1"

[state]
snapshot_path = "/var/lib/scheduler/snapshot.json"
reload_interval_seconds = 60

[observability]
log_level = "debug"
log_format = "json"
metrics_enabled = true
metrics_endpoint = "/metrics"
"#;

        let config = AppConfig::from_toml(toml_str).expect("Failed to parse TOML");
        assert_eq!(config.server.bind_address, "127.0.0.1:9000");
        assert!(!config.server.cors_enabled);
        assert_eq!(config.cluster.name, "smf1");
        assert_eq!(config.state.reload_interval_seconds, 60);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_app_config_from_toml_rejects_blank_cluster() {
        let toml_str = r#"
[server]
bind_address = "127.0.0.1:9000"
request_timeout_seconds = 10
cors_enabled = false

[cluster]
name = ""

[state]
snapshot_path = "snapshot.json"

[observability]
log_level = "info"
metrics_enabled = false
metrics_endpoint = "/metrics"
"#;

        assert!(AppConfig::from_toml(toml_str).is_err());
    }

    #[test]
    fn test_app_config_toml_round_trip() {
        let mut config = AppConfig::default();
        config.cluster.name = "smf1".to_string();

        let serialized = config.to_toml().expect("Failed to serialize");
        let parsed = AppConfig::from_toml(&serialized).expect("Failed to parse");
        assert_eq!(parsed.cluster.name, "smf1");
        assert_eq!(parsed.server.bind_address, config.server.bind_address);
    }
}
