//! The implementation of the worker actor.
//!
//! 工作器 actor 的实现。

use super::{
    command::WorkerCommand,
    event::{WorkOutcome, WorkerEvent},
    executor::{WorkExecutor, WorkReporter},
    factory::ConfigFactory,
    machine::Worker,
    scheduler::RetryScheduler,
    side_effect::SideEffect,
    state::WorkerState,
    transitions::Transition,
};
use crate::backoff::BackoffStrategy;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, trace};

/// Counters kept by the worker actor.
///
/// 工作器actor维护的计数器。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Events that produced a transition.
    /// 产生了状态转换的事件数。
    pub accepted_transitions: u64,
    /// Events that did not apply to the state they met.
    /// 不适用于当时状态的事件数。
    pub ignored_events: u64,
    /// Retry firings and work outcomes dropped because they belonged to a
    /// cancelled timer or a superseded start attempt.
    /// 因属于已取消的定时器或已被替代的启动尝试而被丢弃的输入数。
    pub stale_inputs: u64,
    /// The latest start attempt number.
    /// 最新的启动尝试编号。
    pub current_attempt: u64,
}

/// The actor that owns the worker state machine.
///
/// This actor runs in a dedicated task, is the only writer of the worker
/// state, and drains one ordered queue fed by the public handle, the retry
/// timer and the work executor.
///
/// 拥有工作器状态机的actor。
///
/// 此actor在专用任务中运行，是工作器状态的唯一写入者，并消费一个由公共句柄、
/// 重试定时器和工作执行器共同驱动的有序队列。
pub(crate) struct WorkerActor<F, E, S>
where
    F: ConfigFactory,
    E: WorkExecutor<Request = F::Request>,
{
    pub(crate) worker: Worker<F, E::Response>,
    pub(crate) executor: Arc<E>,
    pub(crate) scheduler: RetryScheduler<S, E::Response>,
    pub(crate) command_rx: mpsc::Receiver<WorkerCommand<E::Response>>,
    pub(crate) command_tx: mpsc::WeakSender<WorkerCommand<E::Response>>,
    pub(crate) state_tx: watch::Sender<WorkerState<F::Request, E::Response>>,
    pub(crate) attempt: u64,
    pub(crate) stats: WorkerStats,
}

impl<F, E, S> WorkerActor<F, E, S>
where
    F: ConfigFactory,
    E: WorkExecutor<Request = F::Request>,
    S: BackoffStrategy,
{
    pub(crate) fn new(
        worker: Worker<F, E::Response>,
        executor: Arc<E>,
        strategy: S,
        command_rx: mpsc::Receiver<WorkerCommand<E::Response>>,
        command_tx: mpsc::WeakSender<WorkerCommand<E::Response>>,
        state_tx: watch::Sender<WorkerState<F::Request, E::Response>>,
    ) -> Self {
        Self {
            worker,
            executor,
            scheduler: RetryScheduler::new(strategy, command_tx.clone()),
            command_rx,
            command_tx,
            state_tx,
            attempt: 0,
            stats: WorkerStats::default(),
        }
    }

    /// Runs the actor's main event loop.
    ///
    /// The loop ends once the worker is destroyed. If every handle is dropped
    /// first, the worker is destroyed on the way out so live work is not
    /// leaked.
    ///
    /// 运行 actor 的主事件循环。工作器被销毁后循环结束。如果所有句柄先被丢弃，
    /// 工作器会在退出时被销毁，以免泄漏活动的工作。
    pub(crate) async fn run(mut self) {
        while let Some(command) = self.command_rx.recv().await {
            self.handle_command(command);
            if self.worker.state().is_destroyed() {
                break;
            }
        }

        if !self.worker.state().is_destroyed() {
            debug!(
                worker = %self.worker.name(),
                work_active = self.worker.state().is_work_active(),
                retry_pending = self.worker.state().is_retry_pending(),
                "All worker handles dropped, destroying worker"
            );
            self.handle_event(WorkerEvent::OnLifecycleDestroyed);
        }
        info!(
            worker = %self.worker.name(),
            stats = ?self.stats,
            retry_pending = self.scheduler.is_pending(),
            "Worker actor stopped"
        );
    }

    /// Handles a command taken from the queue.
    ///
    /// 处理从队列中取出的命令。
    pub(crate) fn handle_command(&mut self, command: WorkerCommand<E::Response>) {
        match command {
            WorkerCommand::Lifecycle(signal) => self.handle_event(signal.into()),
            WorkerCommand::RetryFired { generation } => {
                if self.scheduler.take_fired(generation) {
                    self.handle_event(WorkerEvent::OnShouldStart);
                } else {
                    self.stats.stale_inputs += 1;
                    trace!(
                        worker = %self.worker.name(),
                        generation,
                        "Dropping retry firing from a cancelled timer"
                    );
                }
            }
            WorkerCommand::WorkOutcome { attempt, outcome } => {
                if attempt == self.attempt {
                    self.handle_event(outcome.into());
                } else {
                    self.stats.stale_inputs += 1;
                    trace!(
                        worker = %self.worker.name(),
                        attempt,
                        current_attempt = self.attempt,
                        "Dropping outcome of a superseded attempt"
                    );
                }
            }
            WorkerCommand::GetStats { response_tx } => {
                let _ = response_tx.send(self.stats.clone());
            }
        }
    }

    fn handle_event(&mut self, event: WorkerEvent<E::Response>) {
        match self.worker.process(event) {
            Transition::Valid(transition) => {
                self.stats.accepted_transitions += 1;
                self.state_tx.send_replace(transition.to);
                if let Some(side_effect) = transition.side_effect {
                    self.dispatch(side_effect);
                }
            }
            Transition::Ignored { .. } => {
                self.stats.ignored_events += 1;
            }
        }
    }

    /// Hands a side effect to the scheduler or the executor. Never blocks:
    /// executor calls run in their own tasks and report back through the
    /// queue.
    ///
    /// 将副作用交给调度器或执行器。从不阻塞：执行器调用在各自的任务中运行，并通过队列回报结果。
    fn dispatch(&mut self, side_effect: SideEffect<F::Request>) {
        match side_effect {
            SideEffect::ScheduleRetry(retry_count) => {
                let delay = self.scheduler.schedule(retry_count);
                debug!(
                    worker = %self.worker.name(),
                    retry_count,
                    ?delay,
                    "Retry scheduled"
                );
            }
            SideEffect::UnscheduleRetry => self.scheduler.unschedule(),
            SideEffect::StartWork(request) => {
                self.attempt += 1;
                self.stats.current_attempt = self.attempt;
                let attempt = self.attempt;
                let executor = self.executor.clone();
                let command_tx = self.command_tx.clone();
                let reporter = WorkReporter::new(attempt, command_tx.clone());

                tokio::spawn(async move {
                    let outcome = match executor.start_work(request, reporter).await {
                        Ok(response) => WorkOutcome::Started(response),
                        Err(error) => WorkOutcome::Failed(error),
                    };
                    deliver(&command_tx, attempt, outcome).await;
                });
            }
            SideEffect::StopWork(request) => {
                let attempt = self.attempt;
                let executor = self.executor.clone();
                let command_tx = self.command_tx.clone();

                tokio::spawn(async move {
                    let outcome = match executor.stop_work(request).await {
                        Ok(response) => WorkOutcome::Stopped(response),
                        Err(error) => WorkOutcome::Failed(error),
                    };
                    deliver(&command_tx, attempt, outcome).await;
                });
            }
            SideEffect::ForceStopWork(request) => {
                // Anything the abandoned attempt reports from now on is stale.
                self.attempt += 1;
                self.stats.current_attempt = self.attempt;
                let executor = self.executor.clone();

                tokio::spawn(async move {
                    executor.force_stop_work(request).await;
                });
            }
        }
    }
}

async fn deliver<Resp>(
    command_tx: &mpsc::WeakSender<WorkerCommand<Resp>>,
    attempt: u64,
    outcome: WorkOutcome<Resp>,
) {
    let Some(command_tx) = command_tx.upgrade() else {
        trace!(attempt, "Worker gone, dropping work outcome");
        return;
    };
    if command_tx
        .send(WorkerCommand::WorkOutcome { attempt, outcome })
        .await
        .is_err()
    {
        trace!(attempt, "Worker gone, dropping work outcome");
    }
}
