//! 取消信号
//!
//! 调用方持有 `CancelHandle`，评分流程持有 `CancelSignal`。
//! 句柄被丢弃而没有调用 `cancel()` 时视为永不取消。

use tokio::sync::watch;

/// 取消句柄
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    /// 创建一对句柄和信号
    pub fn new() -> (CancelHandle, CancelSignal) {
        let (sender, receiver) = watch::channel(false);
        (CancelHandle { sender }, CancelSignal { receiver })
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

/// 取消信号，可以随意克隆给多个任务
#[derive(Debug, Clone)]
pub struct CancelSignal {
    receiver: watch::Receiver<bool>,
}

impl CancelSignal {
    /// 永远不会触发的信号
    pub fn never() -> Self {
        let (_, receiver) = watch::channel(false);
        CancelSignal { receiver }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// 等待取消；句柄已丢弃且未取消时永远挂起
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        if receiver.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
