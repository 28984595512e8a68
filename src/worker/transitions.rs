//! 状态转换记录与监听器模块
//! State Transition Records and Listeners Module
//!
//! 该模块定义了状态机每次处理事件的结果，以及在副作用被分发之前
//! 观察每一次已接受转换的监听器机制。
//!
//! This module defines the result of each event processed by the state
//! machine, and the listener mechanism that observes every accepted
//! transition before its side effect is dispatched.

use super::{event::WorkerEvent, side_effect::SideEffect, state::WorkerState};
use std::fmt;
use tracing::{debug, info};

/// An accepted transition: the old state, the event that triggered it, the
/// new state and the side effect to dispatch.
///
/// 已接受的状态转换：旧状态、触发事件、新状态以及需要分发的副作用。
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTransition<Req, Resp> {
    pub from: WorkerState<Req, Resp>,
    pub event: WorkerEvent<Resp>,
    pub to: WorkerState<Req, Resp>,
    pub side_effect: Option<SideEffect<Req>>,
}

/// The result of processing one event.
///
/// 处理单个事件的结果。
#[derive(Debug, Clone, PartialEq)]
pub enum Transition<Req, Resp> {
    /// The event matched the current state.
    /// 事件与当前状态匹配。
    Valid(ValidTransition<Req, Resp>),
    /// The event does not apply to the current state and was dropped without
    /// a state change or side effect.
    /// 事件不适用于当前状态，已被丢弃，不产生状态变化或副作用。
    Ignored {
        state: WorkerState<Req, Resp>,
        event: WorkerEvent<Resp>,
    },
}

impl<Req, Resp> Transition<Req, Resp> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// The state the worker is in after this transition.
    /// 此转换之后工作器所处的状态。
    pub fn state(&self) -> &WorkerState<Req, Resp> {
        match self {
            Self::Valid(transition) => &transition.to,
            Self::Ignored { state, .. } => state,
        }
    }

    pub fn side_effect(&self) -> Option<&SideEffect<Req>> {
        match self {
            Self::Valid(transition) => transition.side_effect.as_ref(),
            Self::Ignored { .. } => None,
        }
    }

    /// Splits the transition into the resulting state and its side effect.
    /// 将转换拆分为结果状态及其副作用。
    pub fn into_parts(self) -> (WorkerState<Req, Resp>, Option<SideEffect<Req>>) {
        match self {
            Self::Valid(transition) => (transition.to, transition.side_effect),
            Self::Ignored { state, .. } => (state, None),
        }
    }
}

/// 转换监听器类型定义
/// Transition listener type definition
///
/// Listeners run synchronously on the worker's event loop and must return
/// quickly; hand anything slow off to another task.
///
/// 监听器在工作器的事件循环上同步运行，必须快速返回；任何耗时操作都应交给其他任务。
pub type TransitionListener<Req, Resp> = Box<dyn Fn(&ValidTransition<Req, Resp>) + Send + Sync>;

/// A listener that logs every accepted transition through `tracing`.
///
/// 通过 `tracing` 记录每一次已接受转换的监听器。
pub fn logging_listener<Req, Resp>(worker: impl Into<String>) -> TransitionListener<Req, Resp>
where
    Req: fmt::Debug,
    Resp: fmt::Debug,
{
    let worker = worker.into();
    Box::new(move |transition: &ValidTransition<Req, Resp>| {
        match (&transition.to, &transition.event) {
            (WorkerState::Started { .. }, _) | (WorkerState::Destroyed, _) => {
                info!(
                    worker = %worker,
                    from = transition.from.name(),
                    to = transition.to.name(),
                    "Worker transition"
                );
            }
            (_, WorkerEvent::OnWorkFailed(error)) => {
                info!(
                    worker = %worker,
                    from = transition.from.name(),
                    to = transition.to.name(),
                    %error,
                    "Work failed"
                );
            }
            _ => {}
        }
        debug!(
            worker = %worker,
            from = ?transition.from,
            event = ?transition.event,
            to = ?transition.to,
            side_effect = ?transition.side_effect,
            "Transition accepted"
        );
    })
}

/// Fans an accepted transition out to every registered listener.
///
/// 将已接受的转换分发给所有已注册的监听器。
pub(crate) struct TransitionNotifier<Req, Resp> {
    listeners: Vec<TransitionListener<Req, Resp>>,
}

impl<Req, Resp> fmt::Debug for TransitionNotifier<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionNotifier")
            .field("listeners_count", &self.listeners.len())
            .finish()
    }
}

impl<Req, Resp> TransitionNotifier<Req, Resp> {
    pub(crate) fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub(crate) fn register(&mut self, listener: TransitionListener<Req, Resp>) {
        self.listeners.push(listener);
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn notify(&self, transition: &ValidTransition<Req, Resp>) {
        for listener in &self.listeners {
            listener(transition);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Valid = ValidTransition<&'static str, u32>;

    fn sample() -> Valid {
        ValidTransition {
            from: WorkerState::initial(),
            event: WorkerEvent::OnLifecycleStarted,
            to: WorkerState::WillStart { retry_count: 0 },
            side_effect: Some(SideEffect::ScheduleRetry(0)),
        }
    }

    #[test]
    fn test_notifier_reaches_every_listener() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = TransitionNotifier::new();
        for id in 0..2 {
            let seen = seen.clone();
            notifier.register(Box::new(move |t: &Valid| {
                seen.lock().unwrap().push((id, t.to.name()));
            }));
        }
        assert_eq!(notifier.len(), 2);

        notifier.notify(&sample());

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![(0, "WillStart"), (1, "WillStart")]);
    }

    #[test]
    fn test_transition_accessors() {
        let valid = Transition::Valid(sample());
        assert!(valid.is_valid());
        assert_eq!(valid.state(), &WorkerState::WillStart { retry_count: 0 });
        assert_eq!(valid.side_effect(), Some(&SideEffect::ScheduleRetry(0)));

        let ignored: Transition<&'static str, u32> = Transition::Ignored {
            state: WorkerState::Destroyed,
            event: WorkerEvent::OnShouldStart,
        };
        assert!(!ignored.is_valid());
        assert_eq!(ignored.side_effect(), None);
        assert_eq!(ignored.into_parts(), (WorkerState::Destroyed, None));
    }

    #[test]
    fn test_logging_listener_accepts_transitions() {
        let listener = logging_listener::<&'static str, u32>("test");
        listener(&sample());
    }
}
