//! 分析参数配置
//!
//! 参数来源依次为：内置默认值 → JSON配置文件（`--config`）→ 命令行覆盖。
//! 配置对象显式传入处理流程，不存在进程级全局状态。

use super::constants::defaults;
use crate::core::{AmplitudeWindow, ByteOrder};
use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 分析参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// 幅度窗口下限（含）
    pub min_neutron_energy: u8,
    /// 幅度窗口上限（含）
    pub max_neutron_energy: u8,
    /// 记录字节序
    pub byte_order: ByteOrder,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_neutron_energy: defaults::MIN_NEUTRON_ENERGY,
            max_neutron_energy: defaults::MAX_NEUTRON_ENERGY,
            byte_order: ByteOrder::default(),
        }
    }
}

impl Settings {
    /// 从JSON文件加载；缺失字段使用默认值
    pub fn load(path: &Path) -> AnalysisResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::ConfigError(format!("无法读取 / cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&text).map_err(|e| match e {
            AnalysisError::ConfigError(msg) => {
                AnalysisError::ConfigError(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_json(text: &str) -> AnalysisResult<Self> {
        let settings: Settings = serde_json::from_str(text)
            .map_err(|e| AnalysisError::ConfigError(format!("JSON解析失败 / invalid JSON: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> AnalysisResult<()> {
        if self.min_neutron_energy > self.max_neutron_energy {
            return Err(AnalysisError::ConfigError(format!(
                "能量窗口下限大于上限 / minNeutronEnergy ({}) > maxNeutronEnergy ({})",
                self.min_neutron_energy, self.max_neutron_energy
            )));
        }
        Ok(())
    }

    /// 构建幅度窗口（先校验）
    pub fn amplitude_window(&self) -> AnalysisResult<AmplitudeWindow> {
        self.validate()?;
        Ok(AmplitudeWindow::new(
            self.min_neutron_energy,
            self.max_neutron_energy,
        ))
    }
}
