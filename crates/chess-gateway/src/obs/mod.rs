//! Lightweight in-process metrics (dependency-free).
//!
//! Metrics are stored as atomics behind a `DashMap` and rendered by the
//! `/metrics` handler as Prometheus text.

pub mod metrics;
