use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// 去抖動計時器：收到新值就重新計時，安靜 `delay` 之後才送出最後一個值。
///
/// 計時任務由 `Debouncer` 持有，drop 時中止；`close` 會先把尚未送出的值送出。
pub struct Debouncer<T> {
    input: Option<mpsc::UnboundedSender<T>>,
    worker: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run(delay, input_rx, settled_tx));
        (
            Self {
                input: Some(input_tx),
                worker: Some(worker),
            },
            settled_rx,
        )
    }

    /// 回傳 false 表示計時器已經關閉
    pub fn push(&self, value: T) -> bool {
        match &self.input {
            Some(tx) => tx.send(value).is_ok(),
            None => false,
        }
    }

    /// 停止接收新值；尚在等待的值會立即送出，之後接收端會結束
    pub fn close(&mut self) {
        self.input.take();
        // 讓 worker 自行結束，不要在 drop 時中止
        self.worker.take();
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }
    }
}

async fn run<T>(
    delay: Duration,
    mut input: mpsc::UnboundedReceiver<T>,
    settled: mpsc::UnboundedSender<T>,
) {
    while let Some(mut latest) = input.recv().await {
        loop {
            tokio::select! {
                next = input.recv() => match next {
                    Some(value) => latest = value,
                    None => {
                        let _ = settled.send(latest);
                        return;
                    }
                },
                _ = tokio::time::sleep(delay) => break,
            }
        }
        if settled.send(latest).is_err() {
            return;
        }
    }
}
