//! 统一错误处理框架
//!
//! 定义分析流程中的错误类型：输入缺失、文件打开失败、流读取失败等。
//! 除 `NoInputFiles` 外，所有错误都会终止整个运行，且不产出部分报告。

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 多重性分析相关的统一错误类型
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// 没有可处理的输入文件（可恢复：提示后正常退出）
    #[error("没有输入文件 / no input files")]
    NoInputFiles,

    /// 文件打开失败（致命）
    #[error("无法打开文件 / failed to open {}: {source}", .path.display())]
    FileOpenFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 文件读取中途失败（致命）
    #[error("读取文件失败 / failed to read {}: {source}", .path.display())]
    StreamReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 输入验证错误
    #[error("输入验证失败 / invalid input: {0}")]
    InvalidInput(String),

    /// 配置错误
    #[error("配置错误 / configuration error: {0}")]
    ConfigError(String),

    /// 报告写入失败
    #[error("无法写入报告 / failed to write report {}: {source}", .path.display())]
    OutputFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 多重性分析操作的标准Result类型
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// 记录解码错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// 剩余字节不足一个完整记录
    #[error("记录不完整 / short record: {available} of 6 bytes available")]
    ShortRecord { available: usize },
}

/// 错误类别枚举（用于选择提示文本和退出码）
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum ErrorCategory {
    /// 没有输入
    NoInput,
    /// I/O相关错误（文件不存在、权限不足、读取中断等）
    Io,
    /// 参数或配置错误
    Input,
    /// 其他未分类错误
    Other,
}

impl ErrorCategory {
    /// 从AnalysisError提取错误类别
    pub fn from_analysis_error(e: &AnalysisError) -> Self {
        match e {
            AnalysisError::NoInputFiles => Self::NoInput,
            AnalysisError::FileOpenFailure { .. } | AnalysisError::StreamReadFailure { .. } => {
                Self::Io
            }
            AnalysisError::InvalidInput(_) | AnalysisError::ConfigError(_) => Self::Input,
            AnalysisError::OutputFailure { .. } => Self::Other,
        }
    }

    /// 获取错误类别的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::NoInput => "无输入",
            Self::Io => "I/O错误",
            Self::Input => "参数错误",
            Self::Other => "其他错误",
        }
    }
}
