//! Inputs of the worker state machine.
//!
//! 工作器状态机的输入事件。

use crate::error::WorkError;

/// An event processed by the worker.
///
/// Lifecycle events come from whoever owns the worker, `OnShouldStart` from
/// the retry timer, and the `OnWork*` events from the work executor.
///
/// 由工作器处理的事件。生命周期事件来自工作器的所有者，`OnShouldStart` 来自重试定时器，
/// `OnWork*` 事件来自工作执行器。
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent<Resp> {
    /// The owner wants the connection running.
    /// 所有者希望连接运行。
    OnLifecycleStarted,
    /// The owner wants the connection stopped.
    /// 所有者希望连接停止。
    OnLifecycleStopped,
    /// The owner is going away for good.
    /// 所有者将永久离开。
    OnLifecycleDestroyed,
    /// The retry timer fired.
    /// 重试定时器已触发。
    OnShouldStart,
    /// The executor opened the connection.
    /// 执行器已打开连接。
    OnWorkStarted(Resp),
    /// The executor closed the connection gracefully.
    /// 执行器已优雅地关闭连接。
    OnWorkStopped(Resp),
    /// The executor failed to open, or lost, the connection.
    /// 执行器未能打开连接，或连接已丢失。
    OnWorkFailed(WorkError),
}

impl<Resp> WorkerEvent<Resp> {
    /// Gets the string representation of this event (for logging).
    /// 获取此事件的字符串表示（用于日志）。
    pub fn name(&self) -> &'static str {
        match self {
            Self::OnLifecycleStarted => "OnLifecycleStarted",
            Self::OnLifecycleStopped => "OnLifecycleStopped",
            Self::OnLifecycleDestroyed => "OnLifecycleDestroyed",
            Self::OnShouldStart => "OnShouldStart",
            Self::OnWorkStarted(_) => "OnWorkStarted",
            Self::OnWorkStopped(_) => "OnWorkStopped",
            Self::OnWorkFailed(_) => "OnWorkFailed",
        }
    }
}

/// A lifecycle signal raised by the owner of the worker.
///
/// 由工作器所有者发出的生命周期信号。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleSignal {
    Started,
    Stopped,
    Destroyed,
}

impl<Resp> From<LifecycleSignal> for WorkerEvent<Resp> {
    fn from(signal: LifecycleSignal) -> Self {
        match signal {
            LifecycleSignal::Started => Self::OnLifecycleStarted,
            LifecycleSignal::Stopped => Self::OnLifecycleStopped,
            LifecycleSignal::Destroyed => Self::OnLifecycleDestroyed,
        }
    }
}

/// The outcome of one executor call, before it is turned into an event.
///
/// 单次执行器调用的结果，在被转换为事件之前。
#[derive(Debug, Clone)]
pub enum WorkOutcome<Resp> {
    Started(Resp),
    Stopped(Resp),
    Failed(WorkError),
}

impl<Resp> From<WorkOutcome<Resp>> for WorkerEvent<Resp> {
    fn from(outcome: WorkOutcome<Resp>) -> Self {
        match outcome {
            WorkOutcome::Started(response) => Self::OnWorkStarted(response),
            WorkOutcome::Stopped(response) => Self::OnWorkStopped(response),
            WorkOutcome::Failed(error) => Self::OnWorkFailed(error),
        }
    }
}
