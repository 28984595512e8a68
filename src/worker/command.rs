//! Commands consumed by the worker actor.

use super::{
    event::{LifecycleSignal, WorkOutcome},
    actor::WorkerStats,
};
use tokio::sync::oneshot;

/// Everything that can enter the worker actor's queue.
///
/// Lifecycle signals from the handle, retry timer firings and work outcomes
/// from the executor all travel through this single ordered queue, so the
/// state machine sees them one at a time and in arrival order.
///
/// 进入工作器actor队列的所有内容。
///
/// 来自句柄的生命周期信号、重试定时器触发以及来自执行器的工作结果都通过这一个有序队列传递，
/// 因此状态机按到达顺序逐个处理它们。
#[derive(Debug)]
pub(crate) enum WorkerCommand<Resp> {
    /// Command from the public API carrying a lifecycle signal.
    /// 来自公共API的命令，携带生命周期信号。
    Lifecycle(LifecycleSignal),
    /// Internal command from the retry scheduler. Only the latest armed
    /// generation is honored.
    /// 来自重试调度器的内部命令。只有最新设置的代数会被采纳。
    RetryFired { generation: u64 },
    /// Internal command from an executor call or a `WorkReporter`, tagged
    /// with the start attempt it belongs to.
    /// 来自执行器调用或 `WorkReporter` 的内部命令，标记其所属的启动尝试。
    WorkOutcome {
        attempt: u64,
        outcome: WorkOutcome<Resp>,
    },
    /// Command from the public API to read the actor's counters.
    /// 来自公共API的命令，用于读取actor的计数器。
    GetStats {
        response_tx: oneshot::Sender<WorkerStats>,
    },
}
