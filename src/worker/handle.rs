//! The user-facing API of a running worker.

use super::{
    actor::{WorkerActor, WorkerStats},
    command::WorkerCommand,
    event::LifecycleSignal,
    executor::WorkExecutor,
    factory::ConfigFactory,
    machine::Worker,
    state::WorkerState,
};
use crate::{
    backoff::BackoffStrategy,
    config::Config,
    error::{Error, Result},
};
use std::{fmt, sync::Arc};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::info;

/// A handle to a running worker actor.
///
/// The handle is the lifecycle source of the worker: `start`, `stop` and
/// `destroy` enqueue lifecycle signals. It also exposes read-only snapshots
/// of the worker state. Dropping every handle destroys the worker.
///
/// 正在运行的工作器actor的句柄。
///
/// 句柄是工作器的生命周期来源：`start`、`stop` 和 `destroy` 将生命周期信号入队。
/// 它还提供工作器状态的只读快照。丢弃所有句柄会销毁工作器。
pub struct WorkerHandle<Req, Resp> {
    pub(crate) command_tx: mpsc::Sender<WorkerCommand<Resp>>,
    pub(crate) state_rx: watch::Receiver<WorkerState<Req, Resp>>,
}

impl<Req, Resp> Clone for WorkerHandle<Req, Resp> {
    fn clone(&self) -> Self {
        Self {
            command_tx: self.command_tx.clone(),
            state_rx: self.state_rx.clone(),
        }
    }
}

impl<Req, Resp> fmt::Debug for WorkerHandle<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerHandle")
            .field("closed", &self.command_tx.is_closed())
            .finish()
    }
}

impl<Req, Resp> WorkerHandle<Req, Resp>
where
    Req: Clone + fmt::Debug + Send + Sync + 'static,
    Resp: Clone + fmt::Debug + Send + Sync + 'static,
{
    /// Spawns the actor for `worker` on the current tokio runtime, using the
    /// backoff policy described by `config.backoff`.
    ///
    /// 在当前tokio运行时上为 `worker` 启动actor，使用 `config.backoff` 描述的退避策略。
    pub fn spawn<F, E>(config: Config, worker: Worker<F, Resp>, executor: E) -> Self
    where
        F: ConfigFactory<Request = Req>,
        E: WorkExecutor<Request = Req, Response = Resp>,
    {
        let strategy = config.backoff.build_strategy();
        Self::spawn_with_backoff(config, worker, executor, strategy)
    }

    /// Spawns the actor with a caller-supplied backoff policy.
    ///
    /// 使用调用者提供的退避策略启动actor。
    pub fn spawn_with_backoff<F, E, S>(
        config: Config,
        worker: Worker<F, Resp>,
        executor: E,
        strategy: S,
    ) -> Self
    where
        F: ConfigFactory<Request = Req>,
        E: WorkExecutor<Request = Req, Response = Resp>,
        S: BackoffStrategy,
    {
        let (command_tx, command_rx) =
            mpsc::channel(config.worker.command_channel_capacity.max(1));
        let (state_tx, state_rx) = watch::channel(worker.state().clone());

        info!(worker = %worker.name(), "Worker actor created and running");
        let actor = WorkerActor::new(
            worker,
            Arc::new(executor),
            strategy,
            command_rx,
            command_tx.downgrade(),
            state_tx,
        );
        tokio::spawn(actor.run());

        Self {
            command_tx,
            state_rx,
        }
    }

    /// Asks the worker to bring the connection up.
    ///
    /// Returns once the signal is queued, not once the connection is up.
    /// Fails with `Error::Destroyed` after the worker has been destroyed.
    ///
    /// 请求工作器建立连接。信号入队后即返回，而不是在连接建立后返回。
    /// 工作器被销毁后返回 `Error::Destroyed`。
    pub async fn start(&self) -> Result<()> {
        self.signal(LifecycleSignal::Started).await
    }

    /// Asks the worker to close the connection gracefully.
    /// 请求工作器优雅地关闭连接。
    pub async fn stop(&self) -> Result<()> {
        self.signal(LifecycleSignal::Stopped).await
    }

    /// Destroys the worker. Active work is force stopped and the actor exits.
    /// 销毁工作器。活动的工作会被强制停止，actor随之退出。
    pub async fn destroy(&self) -> Result<()> {
        self.signal(LifecycleSignal::Destroyed).await
    }

    /// The latest published state snapshot.
    /// 最新发布的状态快照。
    pub fn state(&self) -> WorkerState<Req, Resp> {
        self.state_rx.borrow().clone()
    }

    /// A receiver that observes every published state snapshot.
    /// 观察每一个已发布状态快照的接收器。
    pub fn subscribe(&self) -> watch::Receiver<WorkerState<Req, Resp>> {
        self.state_rx.clone()
    }

    /// Waits until the published state satisfies `predicate` and returns it.
    ///
    /// Fails with `Error::ChannelClosed` if the actor exits before that.
    ///
    /// 等待直到已发布的状态满足 `predicate` 并将其返回。如果actor在此之前退出，
    /// 则返回 `Error::ChannelClosed`。
    pub async fn wait_for<P>(&self, predicate: P) -> Result<WorkerState<Req, Resp>>
    where
        P: FnMut(&WorkerState<Req, Resp>) -> bool,
    {
        let mut state_rx = self.state_rx.clone();
        let state = state_rx
            .wait_for(predicate)
            .await
            .map_err(|_| Error::ChannelClosed)?
            .clone();
        Ok(state)
    }

    /// Reads the actor's counters.
    /// 读取actor的计数器。
    pub async fn stats(&self) -> Result<WorkerStats> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(WorkerCommand::GetStats { response_tx })
            .await
            .map_err(|_| self.closed_error())?;
        response_rx.await.map_err(|_| self.closed_error())
    }

    /// Whether the actor has exited.
    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }

    async fn signal(&self, signal: LifecycleSignal) -> Result<()> {
        self.command_tx
            .send(WorkerCommand::Lifecycle(signal))
            .await
            .map_err(|_| self.closed_error())
    }

    fn closed_error(&self) -> Error {
        if self.state_rx.borrow().is_destroyed() {
            Error::Destroyed
        } else {
            Error::ChannelClosed
        }
    }
}
