use thiserror::Error;

macro_rules! config_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvalidConfiguration {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidConfiguration {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! observation_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvalidObservation {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidObservation {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The estimator itself is total: running over budget, empty functions and zero-sized
/// instructions are all reflected numerically. Errors only surface for programmer mistakes
/// at the two boundaries, building a configuration and handing over an observation.
///
/// # Examples
///
/// ```rust
/// use slotscope::{Error, EstimatorConfig};
///
/// match EstimatorConfig::new(-1) {
///     Err(Error::InvalidConfiguration { message, .. }) => println!("rejected: {}", message),
///     Ok(_) => unreachable!(),
///     Err(e) => println!("other: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The estimator was configured with values that have no meaning.
    ///
    /// Raised for a negative code budget, a placement divisor that is not positive, a
    /// negative fall-through penalty, an unknown target name, or when merging states that
    /// were built against different budgets.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was rejected
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Invalid configuration - {file}:{line}: {message}")]
    InvalidConfiguration {
        /// The message to be printed for the InvalidConfiguration error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A function observation carried data the estimator cannot account for.
    ///
    /// Currently this means a negative instruction size. The observation is rejected as a
    /// whole and no counter is touched.
    #[error("Invalid observation - {file}:{line}: {message}")]
    InvalidObservation {
        /// The message to be printed for the InvalidObservation error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Failed to acquire the lock guarding a shared estimator.
    ///
    /// Only happens when a thread panicked while holding the write lock.
    #[error("Failed to lock target")]
    LockError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_records_location() {
        let err = config_error!("budget {} is negative", -4);
        match err {
            Error::InvalidConfiguration {
                message,
                file,
                line,
            } => {
                assert_eq!(message, "budget -4 is negative");
                assert!(file.ends_with("error.rs"));
                assert!(line > 0);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_observation_error_display() {
        let err = observation_error!("negative size");
        let text = err.to_string();
        assert!(text.starts_with("Invalid observation - "));
        assert!(text.ends_with("negative size"));
    }
}
