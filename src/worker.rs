//! 连接生命周期工作器模块
//! Connection Lifecycle Worker Module
//!
//! 该模块将单个连接的生命周期建模为一个确定性的状态机：
//! 控制器（`Worker`）计算状态转换和副作用，actor 串行地处理所有事件来源，
//! 并将副作用交给重试调度器和工作执行器。
//!
//! This module models the lifecycle of a single connection as a deterministic
//! state machine: the controller (`Worker`) computes transitions and side
//! effects, and the actor serializes every event source and hands the side
//! effects to the retry scheduler and the work executor.

mod actor;
mod command;
mod event;
mod executor;
mod factory;
mod handle;
mod machine;
mod scheduler;
mod side_effect;
mod state;
mod transitions;

pub use actor::WorkerStats;
pub use event::{LifecycleSignal, WorkOutcome, WorkerEvent};
pub use executor::{WorkExecutor, WorkReporter};
pub use factory::{ConfigFactory, FnConfigFactory};
pub use handle::WorkerHandle;
pub use machine::Worker;
pub use side_effect::SideEffect;
pub use state::WorkerState;
pub use transitions::{Transition, TransitionListener, ValidTransition, logging_listener};
