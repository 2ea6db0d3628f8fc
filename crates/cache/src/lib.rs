//! Time-bounded memoization.
//!
//! This crate provides the explicit cache component that replaces ad-hoc
//! process-wide memoization: a mapping from cache key to `(value, expiry)`
//! with a fixed time-to-live and an explicit invalidation entry point.
//! Values are cloned out (callers store `Arc`ed snapshots), so cached data
//! is read-only after construction within a cache interval.

mod memo;

pub use crate::memo::MemoCache;
