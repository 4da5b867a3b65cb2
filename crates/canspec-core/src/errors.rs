use canspec_core_types::{RequestContext, RequestId, TraceId};
use thiserror::Error;

use crate::model::MessageId;

/// Result type alias using CanSpecError
pub type Result<T> = std::result::Result<T, CanSpecError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every domain failure maps onto one of these kinds, and every kind maps to
/// a stable code that callers (upload layer, CLI, tests) can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Parsing
    UnsupportedFormat,
    MalformedJson,
    InvalidDlc,
    InputTooLarge,

    // Import lifecycle
    IllegalStatusTransition,
    NotFound,
    AlreadyExists,
    DuplicateImport,

    // Configuration
    InvalidConfig,

    // Integration
    Io,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::UnsupportedFormat => "ERR_UNSUPPORTED_FORMAT",
            ExErrorKind::MalformedJson => "ERR_MALFORMED_JSON",
            ExErrorKind::InvalidDlc => "ERR_INVALID_DLC",
            ExErrorKind::InputTooLarge => "ERR_INPUT_TOO_LARGE",
            ExErrorKind::IllegalStatusTransition => "ERR_ILLEGAL_STATUS_TRANSITION",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::DuplicateImport => "ERR_DUPLICATE_IMPORT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries a kind for programmatic handling plus optional context used when
/// the error is logged or handed to an outer layer.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message_id: Option<MessageId>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (import id, analysis id, file name)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add CAN message context
    pub fn with_message_id(mut self, id: MessageId) -> Self {
        self.message_id = Some(id);
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Attach the request and trace ids of `context`
    pub fn with_context(mut self, context: &RequestContext) -> Self {
        self.request_id = Some(context.request_id.clone());
        self.trace_id = context.trace_id.clone();
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn message_id(&self) -> Option<MessageId> {
        self.message_id
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(message_id) = &self.message_id {
            write!(f, " (message_id: {})", message_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for the import and compatibility engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CanSpecError {
    // ===== Parsing =====
    /// Format tag is neither CSV nor JSON
    #[error("Unsupported specification format: {format}")]
    UnsupportedFormat { format: String },

    /// JSON payload is syntactically or structurally invalid
    #[error("Malformed JSON specification: {detail}")]
    MalformedJson { detail: String },

    /// Declared DLC is outside the range allowed by the frame type
    #[error("Message {message_id} declares invalid DLC {dlc}")]
    InvalidDlc { message_id: MessageId, dlc: u32 },

    /// Raw input exceeds the configured size cap
    #[error("Input of {size} bytes exceeds the limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },

    // ===== Import lifecycle =====
    /// Status change not allowed by the import state machine
    #[error("Import {import_id} cannot move from {from} to {to}")]
    IllegalStatusTransition {
        import_id: String,
        from: String,
        to: String,
    },

    /// Import not present in the repository
    #[error("Import not found: {import_id}")]
    ImportNotFound { import_id: String },

    /// Import id already present in the repository
    #[error("Import already exists: {import_id}")]
    AlreadyExists { import_id: String },

    /// Same file content was already imported
    #[error("Content {content_hash} was already imported as {existing_import_id}")]
    DuplicateImport {
        content_hash: String,
        existing_import_id: String,
    },

    // ===== Configuration =====
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Generic =====
    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from CanSpecError to ExError
impl From<CanSpecError> for ExError {
    fn from(err: CanSpecError) -> Self {
        match err {
            CanSpecError::UnsupportedFormat { format } => {
                ExError::new(ExErrorKind::UnsupportedFormat)
                    .with_op("parse")
                    .with_message(format!("Unsupported format tag '{}'", format))
            }

            CanSpecError::MalformedJson { detail } => ExError::new(ExErrorKind::MalformedJson)
                .with_op("parse")
                .with_message(detail),

            CanSpecError::InvalidDlc { message_id, dlc } => ExError::new(ExErrorKind::InvalidDlc)
                .with_op("parse")
                .with_message_id(message_id)
                .with_message(format!("DLC {} is out of range", dlc)),

            CanSpecError::InputTooLarge { size, limit } => {
                ExError::new(ExErrorKind::InputTooLarge).with_message(format!(
                    "Input of {} bytes exceeds the limit of {} bytes",
                    size, limit
                ))
            }

            CanSpecError::IllegalStatusTransition {
                import_id,
                from,
                to,
            } => ExError::new(ExErrorKind::IllegalStatusTransition)
                .with_entity_id(import_id)
                .with_message(format!("Cannot move from {} to {}", from, to)),

            CanSpecError::ImportNotFound { import_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(import_id)
                .with_message("Import not found"),

            CanSpecError::AlreadyExists { import_id } => ExError::new(ExErrorKind::AlreadyExists)
                .with_entity_id(import_id)
                .with_message("Import already exists"),

            CanSpecError::DuplicateImport {
                content_hash,
                existing_import_id,
            } => ExError::new(ExErrorKind::DuplicateImport)
                .with_entity_id(existing_import_id)
                .with_message(format!("Content {} was already imported", content_hash)),

            CanSpecError::InvalidConfig { reason } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(reason)
            }

            CanSpecError::Io { message } => ExError::new(ExErrorKind::Io).with_message(message),

            CanSpecError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for CanSpecError {
    fn from(err: serde_json::Error) -> Self {
        CanSpecError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CanSpecError {
    fn from(err: std::io::Error) -> Self {
        CanSpecError::Io {
            message: err.to_string(),
        }
    }
}
