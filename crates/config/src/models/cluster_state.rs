use serde::{Deserialize, Serialize};

use crate::validation::{ConfigValidator, ValidationUtils};
use crate::ConfigResult;

/// 集群配置，集群名称会出现在每个角色视图中
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub name: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            name: "local".to_string(),
        }
    }
}

impl ConfigValidator for ClusterConfig {
    fn validate(&self) -> ConfigResult<()> {
        ValidationUtils::validate_not_empty(&self.name, "cluster.name")
    }
}

/// 调度器状态快照配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    pub snapshot_path: String,
    /// 定期重新加载快照的间隔，0 表示不重新加载
    #[serde(default)]
    pub reload_interval_seconds: u64,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            snapshot_path: "config/snapshot.json".to_string(),
            reload_interval_seconds: 0,
        }
    }
}

impl ConfigValidator for StateConfig {
    fn validate(&self) -> ConfigResult<()> {
        ValidationUtils::validate_not_empty(&self.snapshot_path, "state.snapshot_path")?;
        if self.reload_interval_seconds > 86400 {
            return Err(crate::ConfigError::Validation(
                "state.reload_interval_seconds must be less than or equal to 86400".to_string(),
            ));
        }
        Ok(())
    }
}
