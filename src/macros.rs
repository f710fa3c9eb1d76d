//! Emission macros
//!
//! Sugar over [`Logger::emit`](crate::Logger::emit) and
//! [`Logger::emit_with`](crate::Logger::emit_with): the trailing arguments
//! are packed into the by-value capture tuple for you.
//!
//! # Examples
//!
//! ```
//! use quick_logger_system::prelude::*;
//! use quick_logger_system::info;
//!
//! let logger = Logger::new();
//!
//! // Ready text
//! info!(logger, 0, "Server started");
//!
//! // Deferred formatting; the port is captured by value and rendered on
//! // the consumer
//! let port = 8080;
//! info!(logger, 0, "Server listening on port {}", port);
//! ```

/// Emit at an explicit severity.
///
/// # Examples
///
/// ```
/// # use quick_logger_system::prelude::*;
/// # let logger = Logger::new();
/// use quick_logger_system::emit;
/// emit!(logger, Severity::Info, 0, "Simple message");
/// emit!(logger, Severity::Error, 1, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! emit {
    ($logger:expr, $severity:expr, $shard:expr, $template:expr $(,)?) => {
        $logger.emit($severity, $shard, $template)
    };
    ($logger:expr, $severity:expr, $shard:expr, $template:expr, $($arg:expr),+ $(,)?) => {
        $logger.emit_with($severity, $shard, $template, ($($arg,)+))
    };
}

/// Emit an error-severity record.
///
/// # Examples
///
/// ```
/// # use quick_logger_system::prelude::*;
/// # let logger = Logger::new();
/// use quick_logger_system::error;
/// error!(logger, 0, "Failed to connect to database");
/// error!(logger, 0, "Code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $shard:expr, $($rest:tt)+) => {
        $crate::emit!($logger, $crate::Severity::Error, $shard, $($rest)+)
    };
}

/// Emit a warn-severity record.
///
/// # Examples
///
/// ```
/// # use quick_logger_system::prelude::*;
/// # let logger = Logger::new();
/// use quick_logger_system::warn;
/// warn!(logger, 0, "Low disk space");
/// warn!(logger, 0, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $shard:expr, $($rest:tt)+) => {
        $crate::emit!($logger, $crate::Severity::Warn, $shard, $($rest)+)
    };
}

/// Emit a fault-severity record.
///
/// # Examples
///
/// ```
/// # use quick_logger_system::prelude::*;
/// # let logger = Logger::new();
/// use quick_logger_system::fault;
/// fault!(logger, 0, "Subsystem degraded: {}", "checkpointer");
/// ```
#[macro_export]
macro_rules! fault {
    ($logger:expr, $shard:expr, $($rest:tt)+) => {
        $crate::emit!($logger, $crate::Severity::Fault, $shard, $($rest)+)
    };
}

/// Emit an info-severity record.
///
/// # Examples
///
/// ```
/// # use quick_logger_system::prelude::*;
/// # let logger = Logger::new();
/// use quick_logger_system::info;
/// info!(logger, 0, "Application started");
/// info!(logger, 0, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $shard:expr, $($rest:tt)+) => {
        $crate::emit!($logger, $crate::Severity::Info, $shard, $($rest)+)
    };
}

/// Emit a debug-severity record.
///
/// # Examples
///
/// ```
/// # use quick_logger_system::prelude::*;
/// # let logger = Logger::new();
/// use quick_logger_system::debug;
/// debug!(logger, 0, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $shard:expr, $($rest:tt)+) => {
        $crate::emit!($logger, $crate::Severity::Debug, $shard, $($rest)+)
    };
}

/// Emit a trace-severity record.
///
/// # Examples
///
/// ```
/// # use quick_logger_system::prelude::*;
/// # let logger = Logger::new();
/// use quick_logger_system::trace;
/// trace!(logger, 0, "Entering function: calculate()");
/// trace!(logger, 0, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $shard:expr, $($rest:tt)+) => {
        $crate::emit!($logger, $crate::Severity::Trace, $shard, $($rest)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Logger, Severity};

    // A fresh logger rejects emissions, so the macro tests only exercise
    // expansion and the capture path.

    #[test]
    fn test_emit_macro() {
        let logger = Logger::new();
        assert!(!emit!(logger, Severity::Info, 0, "Test message"));
        assert!(!emit!(logger, Severity::Info, 0, "Formatted: {}", 42));
        assert!(!emit!(logger, Severity::Info, 0, "Pair: {} {}", 1, 2,));
    }

    #[test]
    fn test_severity_macros() {
        let logger = Logger::new();
        assert!(!error!(logger, 0, "Error message"));
        assert!(!warn!(logger, 0, "Retry {} of {}", 1, 3));
        assert!(!fault!(logger, 0, "Degraded: {}", "disk"));
        assert!(!info!(logger, 0, "Items: {}", 100));
        assert!(!debug!(logger, 0, "Count: {}", 5));
        assert!(!trace!(logger, 1, "Value: {}", 10));
    }

    #[test]
    fn test_macro_accepts_owned_and_borrowed_args() {
        let logger = Logger::new();
        let owned = String::from("owned");
        assert!(!info!(logger, 0, "{} and {}", owned, 7u64));
    }
}
