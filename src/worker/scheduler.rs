//! 重试调度器
//! Retry Scheduler
//!
//! 该模块管理唯一一个待触发的重试定时器。每次设置或取消定时器都会递增代数，
//! actor 只接受与当前代数匹配的触发，因此已取消或被替换的定时器永远无法启动工作。
//!
//! This module manages the single pending retry timer. Every arm or cancel
//! bumps a generation counter and the actor only honors a firing that matches
//! the current generation, so a cancelled or superseded timer can never start
//! work.

use super::command::WorkerCommand;
use crate::backoff::BackoffStrategy;
use std::time::Duration;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::trace;

/// Arms and cancels the retry timer of one worker.
///
/// 设置和取消单个工作器的重试定时器。
pub(crate) struct RetryScheduler<S, Resp> {
    strategy: S,
    command_tx: mpsc::WeakSender<WorkerCommand<Resp>>,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl<S, Resp> RetryScheduler<S, Resp>
where
    S: BackoffStrategy,
    Resp: Send + 'static,
{
    pub(crate) fn new(strategy: S, command_tx: mpsc::WeakSender<WorkerCommand<Resp>>) -> Self {
        Self {
            strategy,
            command_tx,
            generation: 0,
            pending: None,
        }
    }

    /// Arms the timer for the attempt numbered `retry_count`, replacing any
    /// timer that is still pending. Returns the chosen delay.
    ///
    /// 为编号为 `retry_count` 的尝试设置定时器，替换任何仍待触发的定时器。返回选定的延迟。
    pub(crate) fn schedule(&mut self, retry_count: u32) -> Duration {
        self.cancel_pending();
        self.generation += 1;

        let generation = self.generation;
        let delay = self.strategy.backoff_duration(retry_count);
        let command_tx = self.command_tx.clone();

        trace!(retry_count, generation, ?delay, "Retry scheduled");
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(command_tx) = command_tx.upgrade() {
                let _ = command_tx
                    .send(WorkerCommand::RetryFired { generation })
                    .await;
            }
        }));
        delay
    }

    /// Cancels the pending timer, if any. A firing already in the queue is
    /// invalidated by the generation bump.
    ///
    /// 取消待触发的定时器（如果有）。已在队列中的触发会因代数递增而失效。
    pub(crate) fn unschedule(&mut self) {
        self.cancel_pending();
        self.generation += 1;
        trace!(generation = self.generation, "Retry unscheduled");
    }

    /// Consumes a firing. Returns `true` only for the currently armed timer;
    /// the timer is disarmed by this call.
    ///
    /// 消费一次触发。仅对当前设置的定时器返回 `true`；此调用会解除该定时器。
    pub(crate) fn take_fired(&mut self, generation: u64) -> bool {
        if generation == self.generation && self.pending.is_some() {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl<S, Resp> Drop for RetryScheduler<S, Resp> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
