//! 工具函数模块
//!
//! 提供文件路径处理、时长格式化等通用工具函数。

/// 文件路径处理工具函数
pub mod path {
    use std::path::Path;

    /// 提取文件名（返回String，用于日志显示）
    #[inline]
    pub fn extract_filename_lossy(path: &Path) -> String {
        path.file_name()
            .unwrap_or(path.as_os_str())
            .to_string_lossy()
            .to_string()
    }
}

/// 时长格式化
pub mod time {
    /// 秒数 -> "m:ss.mmm"
    pub fn format_elapsed(seconds: f64) -> String {
        let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
        let minutes = total_ms / 60_000;
        let secs = (total_ms % 60_000) / 1000;
        let millis = total_ms % 1000;
        format!("{minutes}:{secs:02}.{millis:03}")
    }
}

// 重新导出为平级函数
pub use path::extract_filename_lossy;
pub use time::format_elapsed;
