//! Generative backend contract.
//!
//! The backend is an opaque collaborator: `generate(prompt) -> text`. This
//! module defines the trait, its typed failure modes, a timeout wrapper
//! (the one hard concurrency boundary in the crate), and an explicit
//! TTL-cached capability probe with an injected clock.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::GenerationConfig;

/// The backend's failure modes, passed through to callers unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// The text-generation capability is not present on this device.
    #[error("text generation capability is unavailable")]
    Unavailable,
    /// A prior explicit user action is required before generation is
    /// permitted (e.g. confirming a model download).
    #[error("text generation requires a prior user action")]
    UserActivationRequired,
    /// The backend did not answer within the configured timeout.
    #[error("text generation timed out")]
    Timeout,
}

/// An opaque text-generation capability.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// Wraps any generator with a hard timeout. Dropping the returned future
/// cancels the inner call.
pub struct TimeoutGenerator<G> {
    inner: G,
    timeout: Duration,
}

impl<G: Generator> TimeoutGenerator<G> {
    pub fn new(inner: G, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn from_config(inner: G, config: &GenerationConfig) -> Self {
        Self::new(inner, Duration::from_millis(config.timeout_ms))
    }
}

#[async_trait]
impl<G: Generator> Generator for TimeoutGenerator<G> {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        tokio::time::timeout(self.timeout, self.inner.generate(prompt))
            .await
            .map_err(|_| GenerateError::Timeout)?
    }
}

/// Whether the generation capability can be used right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable,
    /// Usable only after the user approves a one-time download.
    AfterDownload,
}

/// Probes the host for the generation capability. Injected into the
/// assembler rather than queried ad hoc, so tests can fake it.
pub trait CapabilityProvider: Send + Sync {
    fn probe(&self) -> Availability;
}

type Clock = Box<dyn Fn() -> Instant + Send + Sync>;

/// TTL cache over a [`CapabilityProvider`].
///
/// Probing the host can be slow; the result rarely changes. The clock is
/// injected so expiry is deterministic under test.
pub struct AvailabilityCache {
    provider: Box<dyn CapabilityProvider>,
    ttl: Duration,
    clock: Clock,
    cached: Mutex<Option<(Instant, Availability)>>,
}

impl AvailabilityCache {
    pub fn new(provider: Box<dyn CapabilityProvider>, ttl: Duration) -> Self {
        Self::with_clock(provider, ttl, Box::new(Instant::now))
    }

    pub fn from_config(provider: Box<dyn CapabilityProvider>, config: &GenerationConfig) -> Self {
        Self::new(provider, Duration::from_millis(config.availability_ttl_ms))
    }

    pub fn with_clock(provider: Box<dyn CapabilityProvider>, ttl: Duration, clock: Clock) -> Self {
        Self {
            provider,
            ttl,
            clock,
            cached: Mutex::new(None),
        }
    }

    /// Return the cached availability, re-probing after the TTL elapses.
    pub fn get(&self) -> Availability {
        let now = (self.clock)();
        let mut cached = self.cached.lock().expect("cache mutex poisoned");

        if let Some((at, value)) = *cached {
            if now.duration_since(at) < self.ttl {
                return value;
            }
        }

        let value = self.provider.probe();
        *cached = Some((now, value));
        value
    }

    /// Drop the cached probe so the next `get` asks the provider again.
    pub fn invalidate(&self) {
        *self.cached.lock().expect("cache mutex poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingProvider {
        probes: Arc<AtomicUsize>,
        result: Availability,
    }

    impl CapabilityProvider for CountingProvider {
        fn probe(&self) -> Availability {
            self.probes.fetch_add(1, Ordering::SeqCst);
            self.result
        }
    }

    struct EchoGenerator;

    #[async_trait]
    impl Generator for EchoGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
            Ok(format!("echo: {prompt}"))
        }
    }

    struct SlowGenerator;

    #[async_trait]
    impl Generator for SlowGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".to_string())
        }
    }

    struct FailingGenerator(GenerateError);

    #[async_trait]
    impl Generator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
            Err(self.0)
        }
    }

    /// Deterministic clock: a base instant plus a controllable offset.
    fn fake_clock() -> (Clock, Arc<AtomicU64>) {
        let base = Instant::now();
        let offset_ms = Arc::new(AtomicU64::new(0));
        let handle = offset_ms.clone();
        let clock: Clock = Box::new(move || {
            base + Duration::from_millis(handle.load(Ordering::SeqCst))
        });
        (clock, offset_ms)
    }

    #[tokio::test]
    async fn timeout_generator_passes_through_fast_results() {
        let generator = TimeoutGenerator::new(EchoGenerator, Duration::from_secs(5));
        let out = generator.generate("hello").await.unwrap();
        assert_eq!(out, "echo: hello");
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_generator_times_out_slow_backends() {
        let generator = TimeoutGenerator::new(SlowGenerator, Duration::from_millis(100));
        let err = generator.generate("hello").await.unwrap_err();
        assert_eq!(err, GenerateError::Timeout);
    }

    #[tokio::test]
    async fn backend_errors_pass_through_unchanged() {
        for inner_err in [GenerateError::Unavailable, GenerateError::UserActivationRequired] {
            let generator =
                TimeoutGenerator::new(FailingGenerator(inner_err), Duration::from_secs(5));
            let err = generator.generate("hello").await.unwrap_err();
            assert_eq!(err, inner_err);
        }
    }

    #[test]
    fn cache_probes_once_within_ttl() {
        let probes = Arc::new(AtomicUsize::new(0));
        let (clock, _offset) = fake_clock();
        let cache = AvailabilityCache::with_clock(
            Box::new(CountingProvider {
                probes: probes.clone(),
                result: Availability::Available,
            }),
            Duration::from_millis(1000),
            clock,
        );

        assert_eq!(cache.get(), Availability::Available);
        assert_eq!(cache.get(), Availability::Available);
        assert_eq!(probes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cache_reprobes_after_ttl() {
        let probes = Arc::new(AtomicUsize::new(0));
        let (clock, offset) = fake_clock();
        let cache = AvailabilityCache::with_clock(
            Box::new(CountingProvider {
                probes: probes.clone(),
                result: Availability::AfterDownload,
            }),
            Duration::from_millis(1000),
            clock,
        );

        cache.get();
        offset.store(1500, Ordering::SeqCst);
        cache.get();
        assert_eq!(probes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn invalidate_forces_reprobe() {
        let probes = Arc::new(AtomicUsize::new(0));
        let (clock, _offset) = fake_clock();
        let cache = AvailabilityCache::with_clock(
            Box::new(CountingProvider {
                probes: probes.clone(),
                result: Availability::Unavailable,
            }),
            Duration::from_millis(1000),
            clock,
        );

        cache.get();
        cache.invalidate();
        cache.get();
        assert_eq!(probes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn config_wires_timeout_and_ttl() {
        let config = GenerationConfig::default();
        let generator = TimeoutGenerator::from_config(EchoGenerator, &config);
        let out = generator.generate("hi").await.unwrap();
        assert_eq!(out, "echo: hi");

        let probes = Arc::new(AtomicUsize::new(0));
        let cache = AvailabilityCache::from_config(
            Box::new(CountingProvider {
                probes: probes.clone(),
                result: Availability::Available,
            }),
            &config,
        );
        cache.get();
        cache.get();
        assert_eq!(probes.load(Ordering::SeqCst), 1);
    }
}
