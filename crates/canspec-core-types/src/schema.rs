//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical between log events, error
//! reports and test assertions.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Entity identifiers
pub const FIELD_IMPORT_ID: &str = "import_id";
pub const FIELD_ANALYSIS_ID: &str = "analysis_id";
pub const FIELD_FORMAT: &str = "format";

// Collection sizes
pub const FIELD_MESSAGE_COUNT: &str = "message_count";
pub const FIELD_SIGNAL_COUNT: &str = "signal_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
