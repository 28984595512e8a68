//! 定义了库中所有可能的错误类型。
//! Defines all possible error types in the library.

use std::{fmt, sync::Arc};
use thiserror::Error;

/// The primary error type for the lifecycle worker library.
/// 生命周期工作器库的主要错误类型。
#[derive(Debug, Error)]
pub enum Error {
    /// The worker actor has stopped and no longer accepts commands.
    /// 工作器actor已停止，不再接受命令。
    #[error("Internal channel is broken")]
    ChannelClosed,

    /// The worker has been destroyed and cannot be started again.
    /// 工作器已被销毁，无法再次启动。
    #[error("Worker has been destroyed")]
    Destroyed,
}

/// A specialized `Result` type for this library.
/// 本库专用的 `Result` 类型。
pub type Result<T> = std::result::Result<T, Error>;

/// An opaque failure reported by the work executor or the config factory.
///
/// Work failures are ordinary values: the worker recovers from them by
/// scheduling a retry, so they are cheap to clone and carry into transition
/// records.
///
/// 由工作执行器或配置工厂报告的不透明失败。工作失败是普通的值：
/// 工作器通过调度重试从中恢复，因此它们可以廉价克隆并记录在状态转换中。
#[derive(Clone, Error)]
#[error("{message}")]
pub struct WorkError {
    message: String,
    #[source]
    source: Option<Arc<dyn std::error::Error + Send + Sync + 'static>>,
}

impl WorkError {
    /// Creates a work error from a message.
    /// 使用消息创建工作错误。
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an underlying cause, using its `Display` output as the message.
    /// 包装底层原因，使用其 `Display` 输出作为消息。
    pub fn from_source<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: source.to_string(),
            source: Some(Arc::new(source)),
        }
    }

    /// The human readable failure description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for WorkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkError")
            .field("message", &self.message)
            .field("has_source", &self.source.is_some())
            .finish()
    }
}

impl PartialEq for WorkError {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
    }
}

impl From<std::io::Error> for WorkError {
    fn from(err: std::io::Error) -> Self {
        Self::from_source(err)
    }
}
