//! 裂变事件分段状态机
//!
//! 依据硬件嵌入的单调计数器，把幅度窗口内的事件流划分为裂变事件（act）：
//! - 计数严格递增：事件并入当前act
//! - 计数持平或回落：关闭当前act（多重性 = 最后一个事件的计数），并以本事件开启新act
//!
//! 流结束时仍然打开的act不会被关闭，也不会计入统计。

use super::record::DecodedEvent;
use serde::{Deserialize, Serialize};

/// 幅度窗口（闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmplitudeWindow {
    pub min: u8,
    pub max: u8,
}

impl AmplitudeWindow {
    pub fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, amplitude: u8) -> bool {
        (self.min..=self.max).contains(&amplitude)
    }
}

/// 一次裂变事件：计数严格递增的有序事件序列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FissionAct {
    events: Vec<DecodedEvent>,
}

impl FissionAct {
    fn start(event: DecodedEvent) -> Self {
        Self {
            events: vec![event],
        }
    }

    pub fn events(&self) -> &[DecodedEvent] {
        &self.events
    }

    #[inline]
    fn last_count(&self) -> u16 {
        // 构造时至少有一个事件
        self.events.last().map_or(0, |e| e.sequence_count)
    }

    /// 多重性 = 最后一个事件的计数
    #[inline]
    pub fn multiplicity(&self) -> u16 {
        self.last_count()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// 分段器
#[derive(Debug, Clone)]
pub struct ActSegmenter {
    window: AmplitudeWindow,
    current: Option<FissionAct>,
}

impl ActSegmenter {
    pub fn new(window: AmplitudeWindow) -> Self {
        Self {
            window,
            current: None,
        }
    }

    pub fn window(&self) -> AmplitudeWindow {
        self.window
    }

    /// 观测一个事件，若某个act因此关闭则返回它
    pub fn observe(&mut self, event: DecodedEvent) -> Option<FissionAct> {
        if !self.window.contains(event.amplitude) {
            return None;
        }

        let Some(act) = self.current.as_mut() else {
            self.current = Some(FissionAct::start(event));
            return None;
        };

        // 计数未严格递增（含相等）即关闭
        if act.last_count() >= event.sequence_count {
            return self.current.replace(FissionAct::start(event));
        }

        act.events.push(event);
        None
    }

    /// 当前打开的act
    pub fn open_act(&self) -> Option<&FissionAct> {
        self.current.as_ref()
    }

    /// 结束当前流：取出仍打开的act（调用方不计入统计）
    pub fn finish(&mut self) -> Option<FissionAct> {
        self.current.take()
    }
}
