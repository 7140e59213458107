//! 多文件流式处理器
//!
//! 严格按输入顺序逐个读取文件，逐条解码记录并驱动分段器和多重性累加器。
//! 每个文件使用独立的分段器，act不会跨越文件边界。
//!
//! 取消标志在每条记录之前轮询一次；取消后保留已累积的统计，不再处理后续文件。
//! 致命错误（打开失败、读取失败）直接返回Err，已累积的统计随之丢弃。

use super::progress::{CancellationToken, NullObserver, ProgressObserver};
use crate::core::{
    ActSegmenter, AmplitudeWindow, ByteOrder, MultiplicityAccumulator, MultiplicityReport,
    RECORD_SIZE, RecordDecoder,
};
use crate::error::{AnalysisError, AnalysisResult, DecodeError};
use crate::tools::utils;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// 读取缓冲区大小（记录长度的整数倍）
const READ_BUFFER_SIZE: usize = RECORD_SIZE * 8192;

/// 单个文件的处理摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub path: PathBuf,
    pub byte_length: u64,
    /// 计入总事件数的记录数（完整读完时为 byte_length / 6）
    pub record_count: u64,
    /// 落在幅度窗口内的事件数
    pub accepted_events: u64,
    pub closed_acts: u64,
    /// 末尾不足一条记录的字节数
    pub trailing_bytes: u64,
    pub cancelled: bool,
}

/// 一次运行的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingOutcome {
    pub report: MultiplicityReport,
    pub files: Vec<FileSummary>,
    pub cancelled: bool,
}

/// 运行期间的临时聚合状态
#[derive(Debug, Default)]
struct ProcessingSession {
    accumulator: MultiplicityAccumulator,
    total_events: u64,
    files: Vec<FileSummary>,
}

/// 单个字节流的扫描结果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct StreamScan {
    records: u64,
    accepted_events: u64,
    closed_acts: u64,
    trailing_bytes: u64,
    cancelled: bool,
}

/// 流式处理器
pub struct StreamProcessor<'a> {
    decoder: RecordDecoder,
    window: AmplitudeWindow,
    cancel: CancellationToken,
    observer: &'a dyn ProgressObserver,
}

impl<'a> StreamProcessor<'a> {
    pub fn new(window: AmplitudeWindow, byte_order: ByteOrder) -> Self {
        Self {
            decoder: RecordDecoder::new(byte_order),
            window,
            cancel: CancellationToken::new(),
            observer: &NullObserver,
        }
    }

    /// 使用外部取消标志
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// 设置进度观察者
    pub fn with_observer(mut self, observer: &'a dyn ProgressObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 按顺序处理全部文件并生成报告
    pub fn run(&self, files: &[PathBuf]) -> AnalysisResult<ProcessingOutcome> {
        if files.is_empty() {
            return Err(AnalysisError::NoInputFiles);
        }

        let started = Instant::now();
        let mut session = ProcessingSession::default();
        let mut cancelled = false;

        for path in files {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let summary = self.process_file(path, &mut session)?;
            let stop = summary.cancelled;
            session.files.push(summary);

            if stop {
                cancelled = true;
                break;
            }
        }

        let report = session
            .accumulator
            .report(session.total_events, started.elapsed());

        tracing::info!(
            files = session.files.len(),
            total_events = report.total_events,
            total_acts = report.total_acts,
            cancelled,
            "multiplicity run finished"
        );

        Ok(ProcessingOutcome {
            report,
            files: session.files,
            cancelled,
        })
    }

    fn process_file(
        &self,
        path: &Path,
        session: &mut ProcessingSession,
    ) -> AnalysisResult<FileSummary> {
        let file = File::open(path).map_err(|source| AnalysisError::FileOpenFailure {
            path: path.to_path_buf(),
            source,
        })?;
        let read_failure = |source| AnalysisError::StreamReadFailure {
            path: path.to_path_buf(),
            source,
        };
        let byte_length = file.metadata().map_err(read_failure)?.len();

        let name = utils::extract_filename_lossy(path);
        self.observer.start_file(&name);

        // reader 在扫描结束时释放，文件随之关闭
        let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
        let scan = self
            .scan_stream(reader, &mut session.accumulator)
            .map_err(read_failure)?;

        let record_count = if scan.cancelled {
            scan.records
        } else {
            byte_length / RECORD_SIZE as u64
        };
        session.total_events += record_count;

        if scan.trailing_bytes > 0 {
            tracing::warn!(
                file = %path.display(),
                trailing_bytes = scan.trailing_bytes,
                "file length is not a multiple of the record size; partial record ignored"
            );
        }
        tracing::debug!(
            file = %path.display(),
            byte_length,
            records = record_count,
            accepted = scan.accepted_events,
            acts = scan.closed_acts,
            cancelled = scan.cancelled,
            "file processed"
        );

        self.observer.end_file(&name);

        Ok(FileSummary {
            path: path.to_path_buf(),
            byte_length,
            record_count,
            accepted_events: scan.accepted_events,
            closed_acts: scan.closed_acts,
            trailing_bytes: scan.trailing_bytes,
            cancelled: scan.cancelled,
        })
    }

    /// 扫描一个字节流；分段状态只在本流内有效
    fn scan_stream<R: Read>(
        &self,
        mut reader: R,
        accumulator: &mut MultiplicityAccumulator,
    ) -> io::Result<StreamScan> {
        let mut segmenter = ActSegmenter::new(self.window);
        let mut scan = StreamScan::default();
        let mut buf = [0u8; RECORD_SIZE];

        loop {
            if self.cancel.is_cancelled() {
                scan.cancelled = true;
                break;
            }

            let filled = read_record(&mut reader, &mut buf)?;
            if filled == 0 {
                break;
            }

            let event = match self.decoder.decode(&buf[..filled]) {
                Ok(event) => event,
                Err(DecodeError::ShortRecord { available }) => {
                    scan.trailing_bytes = available as u64;
                    break;
                }
            };

            scan.records += 1;
            if self.window.contains(event.amplitude) {
                scan.accepted_events += 1;
            }
            if let Some(act) = segmenter.observe(event) {
                accumulator.record(act.multiplicity());
                scan.closed_acts += 1;
            }
        }

        // 末尾未关闭的act不计入统计
        if let Some(open) = segmenter.finish() {
            tracing::trace!(
                events = open.len(),
                multiplicity = open.multiplicity(),
                "trailing act left open at end of stream"
            );
        }

        Ok(scan)
    }
}

/// 读取至多一条记录，返回实际填充的字节数（0表示EOF）
fn read_record<R: Read>(reader: &mut R, buf: &mut [u8; RECORD_SIZE]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < RECORD_SIZE {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RawRecord;
    use std::io::Cursor;

    fn record(amplitude: u8, count: u16) -> [u8; RECORD_SIZE] {
        RawRecord {
            words: [((count - 1) << 8) | amplitude as u16, 0, 0],
        }
        .to_bytes(ByteOrder::Little)
    }

    fn stream(counts: &[u16], amplitude: u8) -> Vec<u8> {
        counts
            .iter()
            .flat_map(|&c| record(amplitude, c))
            .collect()
    }

    fn processor() -> StreamProcessor<'static> {
        StreamProcessor::new(AmplitudeWindow::new(60, 250), ByteOrder::Little)
    }

    /// 读取指定字节数后触发取消的读取器
    struct CancelAfter {
        inner: Cursor<Vec<u8>>,
        remaining: usize,
        token: CancellationToken,
    }

    impl Read for CancelAfter {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.inner.read(buf)?;
            self.remaining = self.remaining.saturating_sub(n);
            if self.remaining == 0 {
                self.token.cancel();
            }
            Ok(n)
        }
    }

    /// 只按1-2字节分片返回数据的读取器
    struct Trickle(Cursor<Vec<u8>>);

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let len = buf.len().min(2);
            self.0.read(&mut buf[..len])
        }
    }

    /// 读到一半报错的读取器
    struct FailingReader {
        data: Cursor<Vec<u8>>,
        fail_at: u64,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.position() >= self.fail_at {
                return Err(io::Error::other("device detached"));
            }
            let len = buf.len().min(RECORD_SIZE);
            self.data.read(&mut buf[..len])
        }
    }

    #[test]
    fn test_scan_closes_acts_and_drops_trailing() {
        let sp = processor();
        let mut acc = MultiplicityAccumulator::new();
        let scan = sp
            .scan_stream(Cursor::new(stream(&[1, 2, 3, 1, 2, 1], 100)), &mut acc)
            .unwrap();

        assert_eq!(scan.records, 6);
        assert_eq!(scan.accepted_events, 6);
        assert_eq!(scan.closed_acts, 2);
        assert_eq!(acc.count(3), 1);
        assert_eq!(acc.count(2), 1);
        assert_eq!(acc.count(1), 0);
    }

    #[test]
    fn test_scan_counts_filtered_records() {
        let sp = processor();
        let mut acc = MultiplicityAccumulator::new();
        let mut bytes = stream(&[1, 2], 100);
        bytes.extend(record(10, 1)); // 窗口外，不关闭
        bytes.extend(stream(&[3, 1], 100));

        let scan = sp.scan_stream(Cursor::new(bytes), &mut acc).unwrap();
        assert_eq!(scan.records, 5);
        assert_eq!(scan.accepted_events, 4);
        assert_eq!(acc.tally().iter().collect::<Vec<_>>(), vec![(&3, &1)]);
    }

    #[test]
    fn test_scan_reports_trailing_bytes() {
        let sp = processor();
        let mut acc = MultiplicityAccumulator::new();
        let mut bytes = stream(&[1, 2, 1], 100);
        bytes.extend([0xAA, 0xBB, 0xCC, 0xDD]);

        let scan = sp.scan_stream(Cursor::new(bytes), &mut acc).unwrap();
        assert_eq!(scan.records, 3);
        assert_eq!(scan.trailing_bytes, 4);
        assert_eq!(acc.count(2), 1);
    }

    #[test]
    fn test_scan_reassembles_fragmented_reads() {
        let sp = processor();
        let mut acc = MultiplicityAccumulator::new();
        let scan = sp
            .scan_stream(Trickle(Cursor::new(stream(&[1, 2, 3, 1], 100))), &mut acc)
            .unwrap();
        assert_eq!(scan.records, 4);
        assert_eq!(acc.count(3), 1);
    }

    #[test]
    fn test_scan_stops_mid_stream_on_cancel() {
        let token = CancellationToken::new();
        let sp = processor().with_cancellation(token.clone());
        let mut acc = MultiplicityAccumulator::new();

        // 读完前4条记录后取消：[1,2,1] 已关闭一个act(2)，剩余 [3,1,...] 不再读取
        let bytes = stream(&[1, 2, 1, 3, 1, 2, 1], 100);
        let reader = CancelAfter {
            inner: Cursor::new(bytes),
            remaining: RECORD_SIZE * 4,
            token: token.clone(),
        };

        let scan = sp.scan_stream(reader, &mut acc).unwrap();
        assert!(scan.cancelled);
        assert_eq!(scan.records, 4);
        assert_eq!(acc.count(2), 1);
        assert_eq!(acc.total_acts(), 1);
    }

    #[test]
    fn test_scan_propagates_read_error() {
        let sp = processor();
        let mut acc = MultiplicityAccumulator::new();
        let reader = FailingReader {
            data: Cursor::new(stream(&[1, 2, 1, 2], 100)),
            fail_at: (RECORD_SIZE * 2) as u64,
        };

        let err = sp.scan_stream(reader, &mut acc).unwrap_err();
        assert_eq!(err.to_string(), "device detached");
    }

    #[test]
    fn test_run_rejects_empty_input() {
        let result = processor().run(&[]);
        assert!(matches!(result, Err(AnalysisError::NoInputFiles)));
    }

    #[test]
    fn test_read_record_reports_partial_fill() {
        let mut buf = [0u8; RECORD_SIZE];
        let mut cursor = Cursor::new(vec![1u8, 2, 3]);
        assert_eq!(read_record(&mut cursor, &mut buf).unwrap(), 3);
        assert_eq!(read_record(&mut cursor, &mut buf).unwrap(), 0);
    }
}
