//! 常量和默认配置集中管理
//!
//! 将所有重要常量集中定义，避免"默认值漂移"和重复定义

/// 默认配置值
pub mod defaults {
    /// 中子能量窗口下限（含）
    ///
    /// 幅度低于该值的事件视为噪声，不参与分段
    pub const MIN_NEUTRON_ENERGY: u8 = 60;

    /// 中子能量窗口上限（含）
    pub const MAX_NEUTRON_ENERGY: u8 = 250;

    /// 默认日志过滤级别（未设置 RUST_LOG 时）
    pub const LOG_FILTER: &str = "warn";

    /// `--verbose` 时的日志过滤级别
    pub const VERBOSE_LOG_FILTER: &str = "debug";
}

/// 报告输出常量
pub mod report {
    /// 比值保留的小数位
    pub const RATIO_PRECISION: usize = 4;

    /// 文本报告分隔线
    pub const SEPARATOR: &str =
        "--------------------------------------------------------------------------------";
}
