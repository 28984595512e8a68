//! 重试退避策略
//! Retry backoff strategies
//!
//! 该模块将重试次数映射为重试前的等待时长。工作器核心从不依赖具体的曲线，
//! 只依赖 `BackoffStrategy` 特征。
//!
//! This module maps a retry count to the delay before the next start attempt.
//! The worker core never depends on a concrete curve, only on the
//! `BackoffStrategy` trait.

use std::time::Duration;

/// Computes the delay before a start attempt from the retry count.
///
/// Implementations should be non-decreasing in `retry_count`. There is no
/// maximum retry count: capping the delay is the strategy's business, giving
/// up is not.
///
/// 根据重试次数计算启动尝试前的延迟。
pub trait BackoffStrategy: Send + Sync + 'static {
    /// Returns the delay to wait before the attempt numbered `retry_count`.
    /// 返回编号为 `retry_count` 的尝试之前需要等待的延迟。
    fn backoff_duration(&self, retry_count: u32) -> Duration;
}

/// `initial * (retry_count + 1)`, capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearBackoff {
    initial: Duration,
    max: Duration,
}

impl LinearBackoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max: max.max(initial),
        }
    }
}

impl BackoffStrategy for LinearBackoff {
    fn backoff_duration(&self, retry_count: u32) -> Duration {
        self.initial
            .saturating_mul(retry_count.saturating_add(1))
            .min(self.max)
    }
}

/// `initial * multiplier^retry_count`, capped at `max`.
///
/// 指数退避：`initial * multiplier^retry_count`，上限为 `max`。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialBackoff {
    initial: Duration,
    max: Duration,
    multiplier: f64,
}

impl ExponentialBackoff {
    /// Creates an exponential strategy. A multiplier below `1.0` (or NaN) is
    /// raised to `1.0` so the curve stays non-decreasing.
    ///
    /// 创建指数退避策略。小于 `1.0`（或NaN）的乘数会被提升为 `1.0`，以保证曲线单调不减。
    pub fn new(initial: Duration, max: Duration, multiplier: f64) -> Self {
        let multiplier = if multiplier >= 1.0 { multiplier } else { 1.0 };
        Self {
            initial,
            max: max.max(initial),
            multiplier,
        }
    }

    pub fn max(&self) -> Duration {
        self.max
    }
}

impl BackoffStrategy for ExponentialBackoff {
    fn backoff_duration(&self, retry_count: u32) -> Duration {
        let secs = self.initial.as_secs_f64() * self.multiplier.powf(f64::from(retry_count));
        if !secs.is_finite() || secs >= self.max.as_secs_f64() {
            return self.max;
        }
        Duration::from_secs_f64(secs)
    }
}

/// Exponential backoff with a random stretch in `[1, 1 + jitter)`, capped at
/// the base strategy's `max`.
///
/// Spreads reconnect storms when many workers fail together. Two consecutive
/// delays at the cap can come out in either order.
///
/// 带随机抖动的指数退避，抖动因子位于 `[1, 1 + jitter)`，上限仍为基础策略的 `max`。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialWithJitterBackoff {
    base: ExponentialBackoff,
    jitter: f64,
}

impl ExponentialWithJitterBackoff {
    pub fn new(base: ExponentialBackoff, jitter: f64) -> Self {
        let jitter = if jitter.is_finite() { jitter.clamp(0.0, 1.0) } else { 0.0 };
        Self { base, jitter }
    }
}

impl BackoffStrategy for ExponentialWithJitterBackoff {
    fn backoff_duration(&self, retry_count: u32) -> Duration {
        let delay = self.base.backoff_duration(retry_count);
        let factor = 1.0 + self.jitter * rand::random::<f64>();
        Duration::try_from_secs_f64(delay.as_secs_f64() * factor)
            .unwrap_or(self.base.max())
            .min(self.base.max())
    }
}

impl<S: BackoffStrategy + ?Sized> BackoffStrategy for Box<S> {
    fn backoff_duration(&self, retry_count: u32) -> Duration {
        (**self).backoff_duration(retry_count)
    }
}
