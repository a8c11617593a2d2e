// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Engine error types.

use thiserror::Error;

/// Rejected viewport mutation.
///
/// These indicate a NaN or infinity produced upstream (usually a division by
/// a dimension that has not been measured yet) and are never coerced to a
/// default value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewportError {
    #[error("non-finite {field}: {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("user scale must be finite and positive, got {0}")]
    InvalidScale(f64),
}

/// Terminal failure decoding an image source. The engine never retries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("image source not found: {0}")]
    NotFound(String),

    #[error("failed to decode {source_key}: {reason}")]
    Decode { source_key: String, reason: String },
}
