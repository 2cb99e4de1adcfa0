// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types for input validation
//!
//! The numeric pipeline degrades to empty results instead of failing, so the
//! only errors here come from rejecting caller-supplied parameters.

/// Errors raised while validating analytics inputs
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("Unsupported lookback window: {0} days (expected one of 7, 30, 90, 180, 365, 730)")]
    UnsupportedLookback(u32),

    #[error("Invalid FTP: {0} W (must be a finite value greater than zero)")]
    InvalidFtp(f64),

    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for analytics input validation
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_lookback_message() {
        let err = AnalyticsError::UnsupportedLookback(45);
        assert!(err.to_string().contains("45 days"));
    }

    #[test]
    fn test_invalid_config_message() {
        let err = AnalyticsError::InvalidConfig("pause threshold must be positive".to_string());
        assert!(err.to_string().contains("pause threshold must be positive"));
    }
}
