//! Neutron Multiplicity Analyzer
//!
//! 裂变中子计数实验的二进制探测器事件日志分析工具。
//!
//! ## 核心流程
//! - 定长6字节记录解码为事件（位字段解释 + 浮点通道解释）
//! - 能量窗口过滤后，依据单调计数器把事件流划分为裂变事件（act）
//! - 按act的最终计数（多重性）统计，并给出 n2/n3、n3/n4、n2/n4 比值
//! - 多文件严格顺序处理，支持协作式取消和进度通知

pub mod core;
pub mod error;
pub mod processing;
pub mod tools;

// 重新导出核心类型
pub use crate::core::{
    ActSegmenter, AmplitudeWindow, ByteOrder, DecodedEvent, FissionAct, MultiplicityAccumulator,
    MultiplicityReport, RawRecord, RecordDecoder,
};
pub use error::{AnalysisError, AnalysisResult, DecodeError};
pub use processing::{
    CancellationToken, ChannelObserver, ProcessingOutcome, ProgressObserver, StreamProcessor,
};
