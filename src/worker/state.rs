//! Defines the lifecycle states of a worker.
//!
//! 定义工作器的生命周期状态。

/// The state of a worker. Exactly one is active at a time.
///
/// Every value is an immutable snapshot: the controller builds a new one on
/// each accepted transition and never mutates a snapshot it has handed out.
///
/// 工作器的状态。任意时刻只有一个处于活动状态。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerState<Req, Resp> {
    /// No work is active and no retry is pending. Keeps the last request and
    /// response around for diagnostics.
    /// 没有活动的工作，也没有待处理的重试。保留最后的请求和响应用于诊断。
    Stopped {
        request: Option<Req>,
        response: Option<Resp>,
    },

    /// A start has been decided; waiting for the scheduled retry to fire.
    /// 已决定启动；正在等待已调度的重试触发。
    WillStart { retry_count: u32 },

    /// The start side effect has been dispatched; waiting for its outcome.
    /// 启动副作用已分发；正在等待结果。
    Starting { retry_count: u32, request: Req },

    /// The work is active.
    /// 工作处于活动状态。
    Started { request: Req, response: Resp },

    /// A graceful stop has been dispatched; waiting for confirmation.
    /// 已分发优雅停止；正在等待确认。
    Stopping { request: Req },

    /// Terminal. No further transitions are accepted.
    /// 终止状态。不再接受任何转换。
    Destroyed,
}

impl<Req, Resp> WorkerState<Req, Resp> {
    /// The state every worker starts in: stopped, with nothing recorded.
    /// 每个工作器的初始状态：已停止，且没有任何记录。
    pub fn initial() -> Self {
        Self::Stopped {
            request: None,
            response: None,
        }
    }

    /// Gets the string representation of this state (for logging).
    /// 获取此状态的字符串表示（用于日志）。
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stopped { .. } => "Stopped",
            Self::WillStart { .. } => "WillStart",
            Self::Starting { .. } => "Starting",
            Self::Started { .. } => "Started",
            Self::Stopping { .. } => "Stopping",
            Self::Destroyed => "Destroyed",
        }
    }

    /// The retry count carried by `WillStart` and `Starting`.
    pub fn retry_count(&self) -> Option<u32> {
        match self {
            Self::WillStart { retry_count } | Self::Starting { retry_count, .. } => {
                Some(*retry_count)
            }
            _ => None,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(self, Self::Destroyed)
    }

    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started { .. })
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped { .. })
    }

    /// Whether a retry timer is armed in this state.
    /// 此状态下是否有重试定时器处于待触发状态。
    pub fn is_retry_pending(&self) -> bool {
        matches!(self, Self::WillStart { .. })
    }

    /// Whether the executor may be holding live work in this state.
    /// 此状态下执行器是否可能持有活动的工作。
    pub fn is_work_active(&self) -> bool {
        matches!(
            self,
            Self::Starting { .. } | Self::Started { .. } | Self::Stopping { .. }
        )
    }
}

impl<Req, Resp> Default for WorkerState<Req, Resp> {
    fn default() -> Self {
        Self::initial()
    }
}
