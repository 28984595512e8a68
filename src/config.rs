//! 定义了工作器和重试策略的可配置参数。
//! Defines configurable parameters for the worker and its retry policy.

use crate::backoff::{BackoffStrategy, ExponentialBackoff, ExponentialWithJitterBackoff};
use std::time::Duration;

/// A structure containing all configurable parameters for a worker.
///
/// 包含所有工作器可配置参数的结构体。
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Actor and channel-related parameters.
    /// Actor与通道相关参数。
    pub worker: WorkerConfig,

    /// Retry backoff-related parameters.
    /// 重试退避相关参数。
    pub backoff: BackoffConfig,
}

/// Actor and channel-related parameters.
///
/// Actor与通道相关参数。
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// The capacity of the single ordered queue feeding the worker actor.
    /// Lifecycle commands, retry timers and work outcomes all share it.
    ///
    /// 驱动工作器actor的单一有序队列的容量。
    /// 生命周期命令、重试定时器和工作结果共享此队列。
    pub command_channel_capacity: usize,
}

/// Retry backoff-related parameters.
///
/// 重试退避相关参数。
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Delay before the first start attempt (retry count 0).
    /// 第一次启动尝试（重试次数为0）之前的延迟。
    pub initial_delay: Duration,
    /// Upper bound for any computed delay.
    /// 任何计算出的延迟的上限。
    pub max_delay: Duration,
    /// Growth factor applied per failed attempt.
    /// 每次失败尝试应用的增长因子。
    pub multiplier: f64,
    /// Extra random fraction added on top of the exponential delay.
    /// `0.0` disables jitter and keeps delays non-decreasing.
    ///
    /// 在指数延迟基础上添加的额外随机比例。`0.0` 禁用抖动并保持延迟单调不减。
    pub jitter: f64,
}

impl BackoffConfig {
    /// Builds the backoff strategy described by this configuration.
    /// 根据此配置构建退避策略。
    pub fn build_strategy(&self) -> Box<dyn BackoffStrategy> {
        let base = ExponentialBackoff::new(self.initial_delay, self.max_delay, self.multiplier);
        if self.jitter > 0.0 {
            Box::new(ExponentialWithJitterBackoff::new(base, self.jitter))
        } else {
            Box::new(base)
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            command_channel_capacity: 128,
        }
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_strategy_doubles_from_initial_delay() {
        let strategy = BackoffConfig::default().build_strategy();
        assert_eq!(strategy.backoff_duration(0), Duration::from_millis(100));
        assert_eq!(strategy.backoff_duration(1), Duration::from_millis(200));
        assert_eq!(strategy.backoff_duration(3), Duration::from_millis(800));
        assert_eq!(strategy.backoff_duration(64), Duration::from_secs(30));
    }

    #[test]
    fn test_jittered_strategy_stays_within_bounds() {
        let config = BackoffConfig {
            jitter: 0.5,
            ..Default::default()
        };
        let strategy = config.build_strategy();
        for _ in 0..32 {
            let delay = strategy.backoff_duration(1);
            assert!(delay >= Duration::from_millis(199));
            assert!(delay <= Duration::from_millis(300));
        }
        assert_eq!(strategy.backoff_duration(64), Duration::from_secs(30));
    }
}
