//! # ミドルウェア
//!
//! Contact Service 用のミドルウェアを提供する。

mod admission;
mod cache_control;

pub use admission::{AdmissionDecision, AdmissionState, OriginVerdict, admission_gate, decide};
pub use cache_control::no_cache;
