//! Traits for abstracting over the component that actually opens and closes
//! the connection.
use super::{command::WorkerCommand, event::WorkOutcome};
use crate::error::{Error, Result, WorkError};
use async_trait::async_trait;
use std::fmt;
use tokio::sync::mpsc;

/// Performs the real work of opening and closing the connection.
///
/// The worker runs each call in its own task and feeds the result back into
/// its queue as a work event, so implementations may take as long as they
/// need. A connection that fails after it has been established is reported
/// through the `WorkReporter` handed to `start_work`.
///
/// 执行打开和关闭连接的实际工作。
///
/// 工作器在独立的任务中运行每次调用，并将结果作为工作事件送回其队列，因此实现可以按需耗时。
/// 连接建立后发生的失败通过传递给 `start_work` 的 `WorkReporter` 报告。
#[async_trait]
pub trait WorkExecutor: Send + Sync + 'static {
    type Request: Clone + fmt::Debug + Send + Sync + 'static;
    type Response: Clone + fmt::Debug + Send + Sync + 'static;

    /// Opens the connection described by `request`.
    /// 打开由 `request` 描述的连接。
    async fn start_work(
        &self,
        request: Self::Request,
        reporter: WorkReporter<Self::Response>,
    ) -> std::result::Result<Self::Response, WorkError>;

    /// Closes the connection gracefully.
    /// 优雅地关闭连接。
    async fn stop_work(&self, request: Self::Request)
    -> std::result::Result<Self::Response, WorkError>;

    /// Tears the connection down without waiting for a graceful close.
    /// 不等待优雅关闭，直接拆除连接。
    async fn force_stop_work(&self, request: Self::Request);
}

/// Lets the executor report that an established connection failed.
///
/// A reporter is bound to one start attempt. Once the worker has moved on to
/// another attempt, or has been stopped, reports from an older reporter are
/// discarded. Holding a reporter does not keep the worker alive.
///
/// 允许执行器报告已建立的连接发生失败。
///
/// 报告器绑定到一次启动尝试。一旦工作器进入另一次尝试或已停止，来自旧报告器的报告会被丢弃。
/// 持有报告器不会使工作器保持存活。
pub struct WorkReporter<Resp> {
    attempt: u64,
    command_tx: mpsc::WeakSender<WorkerCommand<Resp>>,
}

impl<Resp> Clone for WorkReporter<Resp> {
    fn clone(&self) -> Self {
        Self {
            attempt: self.attempt,
            command_tx: self.command_tx.clone(),
        }
    }
}

impl<Resp> fmt::Debug for WorkReporter<Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkReporter")
            .field("attempt", &self.attempt)
            .finish()
    }
}

impl<Resp> WorkReporter<Resp> {
    pub(crate) fn new(attempt: u64, command_tx: mpsc::WeakSender<WorkerCommand<Resp>>) -> Self {
        Self {
            attempt,
            command_tx,
        }
    }

    /// The start attempt this reporter belongs to.
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Reports that the connection failed.
    ///
    /// Fails with `Error::ChannelClosed` if the worker no longer exists.
    ///
    /// 报告连接失败。如果工作器已不存在，则返回 `Error::ChannelClosed`。
    pub async fn report_failure(&self, error: WorkError) -> Result<()> {
        let command_tx = self.command_tx.upgrade().ok_or(Error::ChannelClosed)?;
        command_tx
            .send(WorkerCommand::WorkOutcome {
                attempt: self.attempt,
                outcome: WorkOutcome::Failed(error),
            })
            .await
            .map_err(|_| Error::ChannelClosed)
    }
}
