//! 进度通知与协作式取消
//!
//! 处理流程只依赖 `ProgressObserver` 能力，不关心通知是同步调用、
//! 排队消息还是通道发送。观察者只拿到 `&self`，无法修改处理器状态。

use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 进度观察者
pub trait ProgressObserver {
    /// 文件开始处理（在该文件任何记录计入统计之前）
    fn start_file(&self, name: &str);

    /// 文件处理结束（读尽或被取消之后）
    fn end_file(&self, name: &str);
}

/// 空观察者
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn start_file(&self, _name: &str) {}
    fn end_file(&self, _name: &str) {}
}

/// 进度事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Started(String),
    Finished(String),
}

/// 基于通道的观察者：发送即返回，由接收端异步消费
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: Sender<ProgressEvent>,
}

impl ChannelObserver {
    /// 创建观察者及其接收端（无界通道，发送不会阻塞）
    pub fn new() -> (Self, Receiver<ProgressEvent>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { sender }, receiver)
    }

    fn send(&self, event: ProgressEvent) {
        // 接收端已退出时丢弃通知
        let _ = self.sender.send(event);
    }
}

impl ProgressObserver for ChannelObserver {
    fn start_file(&self, name: &str) {
        self.send(ProgressEvent::Started(name.to_string()));
    }

    fn end_file(&self, name: &str) {
        self.send(ProgressEvent::Finished(name.to_string()));
    }
}

/// 取消标志（可跨线程共享）
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_channel_observer_preserves_order() {
        let (observer, receiver) = ChannelObserver::new();
        observer.start_file("a.dat");
        observer.end_file("a.dat");
        observer.start_file("b.dat");
        drop(observer);

        let events: Vec<ProgressEvent> = receiver.iter().collect();
        assert_eq!(
            events,
            vec![
                ProgressEvent::Started("a.dat".into()),
                ProgressEvent::Finished("a.dat".into()),
                ProgressEvent::Started("b.dat".into()),
            ]
        );
    }

    #[test]
    fn test_channel_observer_survives_dropped_receiver() {
        let (observer, receiver) = ChannelObserver::new();
        drop(receiver);
        observer.start_file("orphan.dat");
        observer.end_file("orphan.dat");
    }

    #[test]
    fn test_cancellation_visible_across_threads() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());

        let remote = token.clone();
        thread::spawn(move || remote.cancel()).join().unwrap();

        assert!(token.is_cancelled());
    }
}
