//! Canonical logging macros
//!
//! Event values come from `canspec_core_types::schema`; field names match
//! its `FIELD_*` keys.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use canspec_core::log_op_start;
/// log_op_start!("parse");
/// log_op_start!("parse", format = "CSV");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        $crate::logging_facility::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        $crate::logging_facility::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use canspec_core::log_op_end;
/// log_op_end!("parse", duration_ms = 3, message_count = 12);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        $crate::logging_facility::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        $crate::logging_facility::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// The error is converted into an [`ExError`](crate::errors::ExError) so the
/// event always carries the stable error code, plus the request and trace
/// ids when the error has them.
///
/// # Example
///
/// ```
/// # use canspec_core::{log_op_error, errors::CanSpecError};
/// let err = CanSpecError::UnsupportedFormat { format: "DBC".to_string() };
/// log_op_error!("parse", err, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::logging_facility::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            request_id = ex_err.request_id().map(|id| id.as_str()),
            trace_id = ex_err.trace_id().map(|id| id.as_str()),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::logging_facility::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            request_id = ex_err.request_id().map(|id| id.as_str()),
            trace_id = ex_err.trace_id().map(|id| id.as_str()),
            $($field)*
        );
    }};
}
