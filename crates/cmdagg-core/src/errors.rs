use thiserror::Error;

/// Result type alias using VmError
pub type Result<T> = std::result::Result<T, VmError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Construction/insertion
    InvalidArgument,

    // Lookup
    NotFound,

    // Execution
    InvalidOperation,
    OperationFailed,

    // Event bus
    DuplicateRegistration,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidArgument => "ERR_INVALID_ARGUMENT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidOperation => "ERR_INVALID_OPERATION",
            ExErrorKind::OperationFailed => "ERR_OPERATION_FAILED",
            ExErrorKind::DuplicateRegistration => "ERR_DUPLICATE_REGISTRATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and enough
/// context (operation, command key, property) to make log lines useful.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    command_key: Option<String>,
    property: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            command_key: None,
            property: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add command key context
    pub fn with_command_key(mut self, key: impl Into<String>) -> Self {
        self.command_key = Some(key.into());
        self
    }

    /// Add property name context
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the command key context, if any
    pub fn command_key(&self) -> Option<&str> {
        self.command_key.as_deref()
    }

    /// Get the property context, if any
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
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
        if let Some(key) = &self.command_key {
            write!(f, " (command_key: {})", key)?;
        }
        if let Some(property) = &self.property {
            write!(f, " (property: {})", property)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for command and view-model operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VmError {
    /// A required argument was missing or malformed at construction/insertion
    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument { argument: String, reason: String },

    /// No command is registered under the key
    #[error("Command not found: {key}")]
    CommandNotFound { key: String },

    /// A master-only hierarchy was executed without its own operation
    #[error("Hierarchy command has no master operation to execute")]
    MasterOperationMissing,

    /// An async operation was run synchronously from inside an executor
    #[error("Cannot block on an async operation from within an executor; use execute_async")]
    NestedBlockingExecute,

    /// A wrapped execute-operation reported a failure
    #[error("Operation failed: {message}")]
    OperationFailed { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl VmError {
    /// Shorthand for a missing required argument
    pub fn missing(argument: &str) -> Self {
        VmError::InvalidArgument {
            argument: argument.to_string(),
            reason: "value cannot be absent".to_string(),
        }
    }

    /// Shorthand used by wrapped operations to report their own failure
    pub fn operation(message: impl Into<String>) -> Self {
        VmError::OperationFailed {
            message: message.into(),
        }
    }
}

/// Conversion from VmError to ExError
impl From<VmError> for ExError {
    fn from(err: VmError) -> Self {
        match err {
            VmError::InvalidArgument { argument, reason } => {
                ExError::new(ExErrorKind::InvalidArgument)
                    .with_message(format!("Invalid argument '{}': {}", argument, reason))
            }

            VmError::CommandNotFound { key } => ExError::new(ExErrorKind::NotFound)
                .with_command_key(key)
                .with_message("Command not found"),

            VmError::MasterOperationMissing => ExError::new(ExErrorKind::InvalidOperation)
                .with_op("hierarchy_execute")
                .with_message("Hierarchy command has no master operation"),

            VmError::NestedBlockingExecute => ExError::new(ExErrorKind::InvalidOperation)
                .with_op("command_execute")
                .with_message("Synchronous execute of an async operation inside an executor"),

            VmError::OperationFailed { message } => {
                ExError::new(ExErrorKind::OperationFailed).with_message(message)
            }

            VmError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error, used when decoding options or parameters
impl From<serde_json::Error> for VmError {
    fn from(err: serde_json::Error) -> Self {
        VmError::InvalidArgument {
            argument: "json".to_string(),
            reason: err.to_string(),
        }
    }
}
