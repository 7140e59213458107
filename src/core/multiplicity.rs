//! 多重性统计
//!
//! 按关闭act的多重性计数，并派生 n2/n3、n3/n4、n2/n4 三个比值。

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// 多重性累加器
#[derive(Debug, Clone, Default)]
pub struct MultiplicityAccumulator {
    tally: BTreeMap<u16, u64>,
}

/// 多重性表中的一行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MultiplicityRow {
    pub multiplicity: u16,
    pub count: u64,
}

/// 派生比值
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MultiplicityRatios {
    pub ratio_2_3: f64,
    pub ratio_3_4: f64,
    pub ratio_2_4: f64,
}

/// 最终统计报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiplicityReport {
    /// 1..=最大多重性，空缺补0
    pub rows: Vec<MultiplicityRow>,
    pub ratios: MultiplicityRatios,
    /// 所有文件的记录总数（与幅度过滤无关）
    pub total_events: u64,
    pub total_acts: u64,
    pub mean_multiplicity: f64,
    pub elapsed_seconds: f64,
}

impl MultiplicityAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record(&mut self, multiplicity: u16) {
        *self.tally.entry(multiplicity).or_insert(0) += 1;
    }

    /// 指定多重性的计数，缺失为0
    #[inline]
    pub fn count(&self, multiplicity: u16) -> u64 {
        self.tally.get(&multiplicity).copied().unwrap_or(0)
    }

    pub fn tally(&self) -> &BTreeMap<u16, u64> {
        &self.tally
    }

    pub fn total_acts(&self) -> u64 {
        self.tally.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tally.is_empty()
    }

    /// 计算三个比值
    ///
    /// n4 先被钳制到至少1，再参与两个分母的 max(.., 1)。
    pub fn ratios(&self) -> MultiplicityRatios {
        let n2 = self.count(2) as f64;
        let n3 = self.count(3) as f64;
        let n4_floor = self.count(4).max(1) as f64;

        MultiplicityRatios {
            ratio_2_3: n2 / n3.max(1.0),
            ratio_3_4: n3 / n4_floor.max(1.0),
            ratio_2_4: n2 / n4_floor.max(1.0),
        }
    }

    pub fn report(&self, total_events: u64, elapsed: Duration) -> MultiplicityReport {
        let max_key = self.tally.keys().next_back().copied().unwrap_or(0);
        let rows = (1..=max_key)
            .map(|m| MultiplicityRow {
                multiplicity: m,
                count: self.count(m),
            })
            .collect();

        let total_acts = self.total_acts();
        let weighted: u64 = self.tally.iter().map(|(&m, &n)| m as u64 * n).sum();
        let mean_multiplicity = if total_acts > 0 {
            weighted as f64 / total_acts as f64
        } else {
            0.0
        };

        MultiplicityReport {
            rows,
            ratios: self.ratios(),
            total_events,
            total_acts,
            mean_multiplicity,
            elapsed_seconds: elapsed.as_secs_f64(),
        }
    }
}
