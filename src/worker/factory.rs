//! Producers of the opaque open/close request descriptors.
//!
//! 不透明的打开/关闭请求描述符的生产者。

use crate::error::WorkError;
use std::fmt;

/// Produces the request used to open the connection and the one used to
/// close it.
///
/// The worker asks for a request at the moment it dispatches the matching
/// side effect, never earlier, so the request always reflects the latest
/// configuration. A failure to produce the open request counts as a failed
/// start attempt.
///
/// 生成用于打开连接的请求和用于关闭连接的请求。
/// 工作器在分发相应副作用的那一刻才请求，从不提前，因此请求总是反映最新的配置。
/// 生成打开请求失败视为一次启动尝试失败。
pub trait ConfigFactory: Send + 'static {
    type Request: Clone + fmt::Debug + Send + Sync + 'static;

    /// Builds the request for opening the connection.
    /// 构建用于打开连接的请求。
    fn create_open_request(&self) -> Result<Self::Request, WorkError>;

    /// Builds the request for closing the connection.
    /// 构建用于关闭连接的请求。
    fn create_close_request(&self) -> Result<Self::Request, WorkError>;
}

/// A `ConfigFactory` assembled from two closures.
///
/// 由两个闭包组装而成的 `ConfigFactory`。
pub struct FnConfigFactory<O, C> {
    open: O,
    close: C,
}

impl<O, C> FnConfigFactory<O, C> {
    pub fn new(open: O, close: C) -> Self {
        Self { open, close }
    }
}

impl<O, C> fmt::Debug for FnConfigFactory<O, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConfigFactory").finish_non_exhaustive()
    }
}

impl<Req, O, C> ConfigFactory for FnConfigFactory<O, C>
where
    Req: Clone + fmt::Debug + Send + Sync + 'static,
    O: Fn() -> Result<Req, WorkError> + Send + 'static,
    C: Fn() -> Result<Req, WorkError> + Send + 'static,
{
    type Request = Req;

    fn create_open_request(&self) -> Result<Req, WorkError> {
        (self.open)()
    }

    fn create_close_request(&self) -> Result<Req, WorkError> {
        (self.close)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    #[test]
    fn test_fn_factory_is_lazy() {
        let opened = Arc::new(AtomicU32::new(0));
        let opened_clone = opened.clone();
        let factory = FnConfigFactory::new(
            move || Ok(format!("open-{}", opened_clone.fetch_add(1, Ordering::SeqCst))),
            || Err(WorkError::new("no close config")),
        );

        assert_eq!(opened.load(Ordering::SeqCst), 0);
        assert_eq!(factory.create_open_request().ok(), Some("open-0".to_string()));
        assert_eq!(factory.create_open_request().ok(), Some("open-1".to_string()));
        assert_eq!(
            factory.create_close_request().err().map(|e| e.to_string()),
            Some("no close config".to_string())
        );
    }
}
