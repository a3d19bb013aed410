//! Error types for Device Context.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for callers
//!
//! Every error here is caught at the boundary of the sub-resolver that
//! encountered it and converted into an absent attribute; nothing in the
//! public surface returns these directly. They exist so collaborator
//! implementations and resolvers share one vocabulary for what went wrong.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Device Context operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Runtime permission checks (location).
    Permission,
    /// Optional capability probing and invocation.
    Capability,
    /// Malformed input handed to a collaborator (e.g. bad coordinates).
    Input,
    /// Platform service missing or unable to respond.
    Service,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Permission => write!(f, "permission"),
            ErrorCategory::Capability => write!(f, "capability"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Service => write!(f, "service"),
        }
    }
}

/// Unified error type for Device Context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Permission errors (10-19)
    #[error("location permission denied")]
    PermissionDenied,

    // Capability errors (20-29)
    #[error("optional capability not found: {service}")]
    CapabilityAbsent { service: String },

    #[error("capability invocation failed: {service}: {reason}")]
    CapabilityInvocationFailed { service: String, reason: String },

    // Input errors (30-39)
    #[error("malformed input: {0}")]
    MalformedInput(String),

    // Service errors (40-49)
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Permission errors
    /// - 20-29: Capability errors
    /// - 30-39: Input errors
    /// - 40-49: Service errors
    pub fn code(&self) -> u32 {
        match self {
            Error::PermissionDenied => 10,
            Error::CapabilityAbsent { .. } => 20,
            Error::CapabilityInvocationFailed { .. } => 21,
            Error::MalformedInput(_) => 30,
            Error::ServiceUnavailable(_) => 40,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::PermissionDenied => ErrorCategory::Permission,
            Error::CapabilityAbsent { .. } | Error::CapabilityInvocationFailed { .. } => {
                ErrorCategory::Capability
            }
            Error::MalformedInput(_) => ErrorCategory::Input,
            Error::ServiceUnavailable(_) => ErrorCategory::Service,
        }
    }

    /// Returns whether this error is potentially recoverable.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Permission can be granted later
            Error::PermissionDenied => true,
            // The optional module can be installed; absence is a normal state
            Error::CapabilityAbsent { .. } => true,
            // Transient service hiccups
            Error::CapabilityInvocationFailed { .. } => true,
            // Bad input will stay bad
            Error::MalformedInput(_) => false,
            // The service may come back
            Error::ServiceUnavailable(_) => true,
        }
    }
}
