//! 流式处理模块
//!
//! 负责按顺序读取事件文件、驱动解码/分段/统计流水线，
//! 并提供进度通知和协作式取消能力。

pub mod progress;
pub mod stream_processor;

// 重新导出公共接口
pub use progress::{
    CancellationToken, ChannelObserver, NullObserver, ProgressEvent, ProgressObserver,
};
pub use stream_processor::{FileSummary, ProcessingOutcome, StreamProcessor};
