//! 核心算法模块
//!
//! 包含记录解码、裂变事件分段和多重性统计的数据结构与算法实现。

pub mod multiplicity;
pub mod record;
pub mod segmenter;

// 重新导出公共接口
pub use multiplicity::{
    MultiplicityAccumulator, MultiplicityRatios, MultiplicityReport, MultiplicityRow,
};
pub use record::{
    ByteOrder, DecodedEvent, RECORD_SIZE, RawRecord, RecordDecoder, decode_channel_value,
    decode_event,
};
pub use segmenter::{ActSegmenter, AmplitudeWindow, FissionAct};
