#![deny(clippy::expect_used, clippy::unwrap_used)]

//! The root of the connection lifecycle worker library.
//! 连接生命周期工作器库的根。

pub mod backoff;
pub mod config;
pub mod error;
pub mod worker;

pub use config::Config;
pub use error::{Error, Result, WorkError};
pub use worker::{Worker, WorkerEvent, WorkerHandle, WorkerState};
