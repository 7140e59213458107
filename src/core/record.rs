//! 定长原始记录解码器
//!
//! 每条硬件记录由3个16位字组成（共6字节），无分隔符、无头尾。
//!
//! | 字 | 位     | 字段                        |
//! |----|--------|-----------------------------|
//! | 1  | 0-7    | amplitude                   |
//! | 1  | 8-15   | sequence_count - 1          |
//! | 2  | 0-7    | detector                    |
//! | 2  | 8-15   | time_tag                    |
//! | 3  | 0-15   | 仅用于浮点解释（word3:word2） |
//!
//! 位字段解释与浮点解释是两个互斥的视图，分段算法只使用位字段。

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 单条记录字节数
pub const RECORD_SIZE: usize = 6;

/// 生产硬件的字节序
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
    /// 与当前主机一致
    Native,
}

impl ByteOrder {
    #[inline]
    fn read_word(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::Little => u16::from_le_bytes(bytes),
            ByteOrder::Big => u16::from_be_bytes(bytes),
            ByteOrder::Native => u16::from_ne_bytes(bytes),
        }
    }

    #[inline]
    fn write_word(self, word: u16) -> [u8; 2] {
        match self {
            ByteOrder::Little => word.to_le_bytes(),
            ByteOrder::Big => word.to_be_bytes(),
            ByteOrder::Native => word.to_ne_bytes(),
        }
    }
}

impl FromStr for ByteOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "little" | "le" => Ok(ByteOrder::Little),
            "big" | "be" => Ok(ByteOrder::Big),
            "native" => Ok(ByteOrder::Native),
            other => Err(format!("未知字节序 / unknown byte order: {other}")),
        }
    }
}

/// 原始记录：按文件顺序读出的3个字
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord {
    pub words: [u16; 3],
}

impl RawRecord {
    /// 从字节切片读取一条记录
    ///
    /// 不足6字节时返回 `DecodeError::ShortRecord`，而不是静默截断。
    pub fn from_bytes(bytes: &[u8], order: ByteOrder) -> Result<Self, DecodeError> {
        if bytes.len() < RECORD_SIZE {
            return Err(DecodeError::ShortRecord {
                available: bytes.len(),
            });
        }

        Ok(Self {
            words: [
                order.read_word([bytes[0], bytes[1]]),
                order.read_word([bytes[2], bytes[3]]),
                order.read_word([bytes[4], bytes[5]]),
            ],
        })
    }

    /// 按指定字节序重新编码为6字节
    pub fn to_bytes(&self, order: ByteOrder) -> [u8; RECORD_SIZE] {
        let mut out = [0u8; RECORD_SIZE];
        for (i, word) in self.words.iter().enumerate() {
            out[i * 2..i * 2 + 2].copy_from_slice(&order.write_word(*word));
        }
        out
    }
}

/// 解码后的探测器事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecodedEvent {
    /// 幅度（word1低8位）
    pub amplitude: u8,
    /// 本次裂变中已观测事件数（word1高8位 + 1），取值1-256
    pub sequence_count: u16,
    /// 探测器编号（word2低8位）
    pub detector: u8,
    /// 时间标记（word2高8位）
    pub time_tag: u8,
    /// 未修改的word3
    pub raw_word3: u16,
}

impl DecodedEvent {
    /// 由位字段重建word2
    #[inline]
    pub fn raw_word2(&self) -> u16 {
        ((self.time_tag as u16) << 8) | self.detector as u16
    }

    /// 浮点通道值：word3为高半部分、word2为低半部分的IEEE-754单精度数
    #[inline]
    pub fn channel_value(&self) -> f32 {
        f32::from_bits(((self.raw_word3 as u32) << 16) | self.raw_word2() as u32)
    }
}

/// 位字段解释
#[inline]
pub fn decode_event(record: &RawRecord) -> DecodedEvent {
    let [word1, word2, word3] = record.words;
    DecodedEvent {
        amplitude: (word1 & 0xFF) as u8,
        sequence_count: (word1 >> 8) + 1,
        detector: (word2 & 0xFF) as u8,
        time_tag: (word2 >> 8) as u8,
        raw_word3: word3,
    }
}

/// 浮点解释（供分段算法之外的消费者使用）
#[inline]
pub fn decode_channel_value(record: &RawRecord) -> f32 {
    let [_, word2, word3] = record.words;
    f32::from_bits(((word3 as u32) << 16) | word2 as u32)
}

/// 记录解码器：字节 -> 事件
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordDecoder {
    order: ByteOrder,
}

impl RecordDecoder {
    pub fn new(order: ByteOrder) -> Self {
        Self { order }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// 解码一条6字节记录
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedEvent, DecodeError> {
        RawRecord::from_bytes(bytes, self.order).map(|raw| decode_event(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words_le(w1: u16, w2: u16, w3: u16) -> Vec<u8> {
        RawRecord {
            words: [w1, w2, w3],
        }
        .to_bytes(ByteOrder::Little)
        .to_vec()
    }

    #[test]
    fn test_bit_field_extraction() {
        let decoder = RecordDecoder::new(ByteOrder::Little);
        let event = decoder.decode(&words_le(0x0264, 0x1F03, 0xBEEF)).unwrap();

        assert_eq!(event.amplitude, 0x64);
        assert_eq!(event.sequence_count, 3);
        assert_eq!(event.detector, 0x03);
        assert_eq!(event.time_tag, 0x1F);
        assert_eq!(event.raw_word3, 0xBEEF);
    }

    #[test]
    fn test_sequence_count_range() {
        let decoder = RecordDecoder::default();
        let low = decoder.decode(&words_le(0x00FF, 0, 0)).unwrap();
        let high = decoder.decode(&words_le(0xFF00, 0, 0)).unwrap();

        assert_eq!(low.sequence_count, 1);
        assert_eq!(low.amplitude, 255);
        assert_eq!(high.sequence_count, 256);
        assert_eq!(high.amplitude, 0);
    }

    #[test]
    fn test_decoding_matches_word_formula_exhaustive_word1() {
        let decoder = RecordDecoder::default();
        for w1 in (0u16..=u16::MAX).step_by(251) {
            let w2 = w1.rotate_left(5);
            let event = decoder.decode(&words_le(w1, w2, 0)).unwrap();
            assert_eq!(event.amplitude as u16, w1 & 0xFF);
            assert_eq!(event.sequence_count, (w1 >> 8) + 1);
            assert_eq!(event.detector as u16, w2 & 0xFF);
            assert_eq!(event.time_tag as u16, w2 >> 8);
        }
    }

    #[test]
    fn test_big_endian_words() {
        let decoder = RecordDecoder::new(ByteOrder::Big);
        let event = decoder.decode(&[0x02, 0x64, 0x1F, 0x03, 0x00, 0x00]).unwrap();
        assert_eq!(event.amplitude, 0x64);
        assert_eq!(event.sequence_count, 3);
        assert_eq!(event.time_tag, 0x1F);
    }

    #[test]
    fn test_short_record_is_error() {
        let decoder = RecordDecoder::default();
        assert_eq!(
            decoder.decode(&[1, 2, 3, 4]),
            Err(DecodeError::ShortRecord { available: 4 })
        );
        assert_eq!(
            decoder.decode(&[]),
            Err(DecodeError::ShortRecord { available: 0 })
        );
    }

    #[test]
    fn test_channel_value_uses_word3_high_word2_low() {
        let bits = 1.5f32.to_bits();
        let record = RawRecord {
            words: [0x0000, (bits & 0xFFFF) as u16, (bits >> 16) as u16],
        };
        assert_eq!(decode_channel_value(&record), 1.5);
        assert_eq!(decode_event(&record).channel_value(), 1.5);
    }

    #[test]
    fn test_byte_order_parsing() {
        assert_eq!("LE".parse::<ByteOrder>(), Ok(ByteOrder::Little));
        assert_eq!("big".parse::<ByteOrder>(), Ok(ByteOrder::Big));
        assert_eq!("native".parse::<ByteOrder>(), Ok(ByteOrder::Native));
        assert!("middle".parse::<ByteOrder>().is_err());
    }
}
