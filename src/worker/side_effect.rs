//! Outputs of the worker state machine.
//!
//! 工作器状态机的输出副作用。

/// An instruction emitted alongside an accepted transition. Side effects are
/// never optional once the transition has been accepted.
///
/// 随已接受的状态转换一起发出的指令。一旦转换被接受，副作用就不可跳过。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect<Req> {
    /// Arm the retry timer for the attempt numbered `retry_count`.
    /// 为编号为 `retry_count` 的尝试设置重试定时器。
    ScheduleRetry(u32),
    /// Cancel the pending retry timer.
    /// 取消待触发的重试定时器。
    UnscheduleRetry,
    /// Open the connection.
    /// 打开连接。
    StartWork(Req),
    /// Close the connection gracefully.
    /// 优雅地关闭连接。
    StopWork(Req),
    /// Abandon the connection without waiting for a graceful close.
    /// 放弃连接，不等待优雅关闭。
    ForceStopWork(Req),
}

impl<Req> SideEffect<Req> {
    /// Gets the string representation of this side effect (for logging).
    pub fn name(&self) -> &'static str {
        match self {
            Self::ScheduleRetry(_) => "ScheduleRetry",
            Self::UnscheduleRetry => "UnscheduleRetry",
            Self::StartWork(_) => "StartWork",
            Self::StopWork(_) => "StopWork",
            Self::ForceStopWork(_) => "ForceStopWork",
        }
    }
}
