//! 连接生命周期控制器
//! Connection Lifecycle Controller
//!
//! 该模块持有工作器的当前状态，并以纯同步的方式逐个处理事件：
//! 计算新状态和需要分发的副作用，并在返回之前通知所有转换监听器。
//! 它不执行任何I/O，也不分发副作用；这些由 actor 负责。
//!
//! This module owns the worker's current state and processes events one at a
//! time, synchronously: it computes the new state and the side effect to
//! dispatch, and notifies every transition listener before returning. It does
//! no I/O and dispatches nothing; that is the actor's job.

use super::{
    event::WorkerEvent,
    factory::ConfigFactory,
    side_effect::SideEffect,
    state::WorkerState,
    transitions::{Transition, TransitionListener, TransitionNotifier, ValidTransition},
};
use std::fmt;
use tracing::{debug, trace, warn};

type Next<Req, Resp> = (WorkerState<Req, Resp>, Option<SideEffect<Req>>);

/// The lifecycle controller of a single connection.
///
/// 单个连接的生命周期控制器。
pub struct Worker<F: ConfigFactory, Resp> {
    /// 工作器名称，用于日志记录
    /// Worker name for logging
    name: String,
    /// 当前状态快照
    /// Current state snapshot
    state: WorkerState<F::Request, Resp>,
    /// 请求工厂
    /// Request factory
    factory: F,
    /// 转换通知器
    /// Transition notifier
    notifier: TransitionNotifier<F::Request, Resp>,
}

impl<F: ConfigFactory, Resp: fmt::Debug> fmt::Debug for Worker<F, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("listeners", &self.notifier.len())
            .finish_non_exhaustive()
    }
}

impl<F, Resp> Worker<F, Resp>
where
    F: ConfigFactory,
    Resp: Clone + fmt::Debug,
{
    /// Creates a stopped worker.
    /// 创建一个处于停止状态的工作器。
    pub fn new(name: impl Into<String>, factory: F) -> Self {
        Self {
            name: name.into(),
            state: WorkerState::initial(),
            factory,
            notifier: TransitionNotifier::new(),
        }
    }

    /// Injects a transition listener. Listeners are called in registration
    /// order for every accepted transition.
    ///
    /// 注入一个转换监听器。对于每个已接受的转换，监听器按注册顺序被调用。
    pub fn with_listener(mut self, listener: TransitionListener<F::Request, Resp>) -> Self {
        self.notifier.register(listener);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current state snapshot.
    /// 当前状态快照。
    pub fn state(&self) -> &WorkerState<F::Request, Resp> {
        &self.state
    }

    /// Processes one event against the current state.
    ///
    /// An accepted event replaces the current state and is reported to every
    /// listener before this returns. Any event that does not apply to the
    /// current state is ignored: no state change, no side effect, no
    /// notification.
    ///
    /// 根据当前状态处理一个事件。被接受的事件会替换当前状态，并在返回之前通知所有监听器。
    /// 任何不适用于当前状态的事件都会被忽略：没有状态变化、没有副作用、没有通知。
    pub fn process(&mut self, event: WorkerEvent<Resp>) -> Transition<F::Request, Resp> {
        let Some((to, side_effect)) = self.next(&event) else {
            trace!(
                worker = %self.name,
                state = self.state.name(),
                event = event.name(),
                "Event ignored"
            );
            return Transition::Ignored {
                state: self.state.clone(),
                event,
            };
        };

        let from = std::mem::replace(&mut self.state, to.clone());
        debug!(
            worker = %self.name,
            from = from.name(),
            event = event.name(),
            to = to.name(),
            side_effect = side_effect.as_ref().map(SideEffect::name),
            "State transition executed"
        );

        let transition = ValidTransition {
            from,
            event,
            to,
            side_effect,
        };
        self.notifier.notify(&transition);
        Transition::Valid(transition)
    }

    /// The transition table.
    /// 转换表。
    fn next(&self, event: &WorkerEvent<Resp>) -> Option<Next<F::Request, Resp>> {
        use SideEffect::*;
        use WorkerEvent::*;
        use WorkerState::*;

        let next = match (&self.state, event) {
            (Stopped { .. }, OnLifecycleStarted) => {
                (WillStart { retry_count: 0 }, Some(ScheduleRetry(0)))
            }
            (Stopped { .. }, OnLifecycleDestroyed) => (Destroyed, None),

            (WillStart { retry_count }, OnShouldStart) => self.begin_start(*retry_count),
            (WillStart { .. }, OnLifecycleStopped) => (WorkerState::initial(), Some(UnscheduleRetry)),
            (WillStart { .. }, OnLifecycleDestroyed) => (Destroyed, Some(UnscheduleRetry)),

            (Starting { request, .. }, OnWorkStarted(response)) => (
                Started {
                    request: request.clone(),
                    response: response.clone(),
                },
                None,
            ),
            (Starting { retry_count, .. }, OnWorkFailed(_)) => Self::retry_after_failure(*retry_count),
            // The attempt is still in flight; abandon it.
            (Starting { request, .. }, OnLifecycleStopped) => (
                Stopped {
                    request: Some(request.clone()),
                    response: None,
                },
                Some(ForceStopWork(request.clone())),
            ),
            (Starting { request, .. }, OnLifecycleDestroyed) => {
                (Destroyed, Some(ForceStopWork(request.clone())))
            }

            (Started { request, .. }, OnLifecycleStopped) => self.begin_stop(request),
            (Started { request, .. }, OnLifecycleDestroyed) => {
                (Destroyed, Some(ForceStopWork(request.clone())))
            }
            // The connection had worked: retry fast instead of accumulating backoff.
            (Started { .. }, OnWorkFailed(_)) => (WillStart { retry_count: 0 }, Some(ScheduleRetry(0))),

            (Stopping { request }, OnWorkStopped(response)) => (
                Stopped {
                    request: Some(request.clone()),
                    response: Some(response.clone()),
                },
                None,
            ),
            (Stopping { request }, OnLifecycleDestroyed) => {
                (Destroyed, Some(ForceStopWork(request.clone())))
            }

            (Destroyed, _) => return None,
            // Unlisted pairs are no-ops.
            _ => return None,
        };
        Some(next)
    }

    fn begin_start(&self, retry_count: u32) -> Next<F::Request, Resp> {
        match self.factory.create_open_request() {
            Ok(request) => (
                WorkerState::Starting {
                    retry_count,
                    request: request.clone(),
                },
                Some(SideEffect::StartWork(request)),
            ),
            Err(error) => {
                warn!(
                    worker = %self.name,
                    retry_count,
                    %error,
                    "Failed to create open request, treating as failed start"
                );
                Self::retry_after_failure(retry_count)
            }
        }
    }

    fn begin_stop(&self, started_request: &F::Request) -> Next<F::Request, Resp> {
        match self.factory.create_close_request() {
            Ok(request) => (
                WorkerState::Stopping {
                    request: request.clone(),
                },
                Some(SideEffect::StopWork(request)),
            ),
            // Not a plain OnWorkFailed: the caller asked to stop, so do not reconnect.
            Err(error) => {
                warn!(
                    worker = %self.name,
                    %error,
                    "Failed to create close request, force stopping"
                );
                (
                    WorkerState::Stopped {
                        request: Some(started_request.clone()),
                        response: None,
                    },
                    Some(SideEffect::ForceStopWork(started_request.clone())),
                )
            }
        }
    }

    fn retry_after_failure(retry_count: u32) -> Next<F::Request, Resp> {
        (
            WorkerState::WillStart {
                retry_count: retry_count.saturating_add(1),
            },
            Some(SideEffect::ScheduleRetry(retry_count)),
        )
    }
}
