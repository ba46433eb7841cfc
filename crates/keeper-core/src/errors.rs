use thiserror::Error;

/// Result type alias using KeeperError
pub type Result<T> = std::result::Result<T, KeeperError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error raised anywhere in ansible-keeper classifies into one of these
/// kinds. Each kind maps to a stable error code that callers and tests can
/// match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// Malformed command token or argument
    InvalidInput,
    /// Host, group, variable or node absent when presence is required
    NotFound,
    /// Target present when absence is required
    AlreadyExists,
    /// A multi-step mutation stopped after some of its writes
    PartialApplication,
    /// Coordination store unreachable, connection lost or timed out
    Connectivity,
    /// Store refused the call (read-only session, ACL, auth)
    Forbidden,
    /// Any other store-side failure
    Persistence,
    /// Value encoding/decoding failure
    Serialization,
    /// Invalid or unreadable configuration
    Config,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::PartialApplication => "ERR_PARTIAL_APPLICATION",
            ExErrorKind::Connectivity => "ERR_CONNECTIVITY",
            ExErrorKind::Forbidden => "ERR_FORBIDDEN",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification plus enough context (operation, entity name,
/// store path) to act on the failure.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    path: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            path: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (host or group name)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add store path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
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

    /// Get the entity context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the store path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the error message
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
            write!(f, " (entity: {})", entity_id)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for inventory operations
#[derive(Error, Debug, Clone)]
pub enum KeeperError {
    // ===== Input Errors =====
    /// Token does not match the grammar the operation expects
    #[error("Syntax error in '{token}': expected {expected}")]
    Syntax { token: String, expected: String },

    // ===== Existence Errors =====
    #[error("Host does not exist: {host}")]
    HostNotFound { host: String },

    #[error("Group does not exist: {group}")]
    GroupNotFound { group: String },

    /// A host variable vanished between listing and re-check
    #[error("Hostvar {variable} for host {host} does not exist")]
    VariableNotFound { host: String, variable: String },

    #[error("Host already exists: {host}")]
    HostAlreadyExists { host: String },

    #[error("Host {host} already exists in group {group}")]
    AlreadyInGroup { host: String, group: String },

    #[error("Host {host} does not exist in group {group}")]
    NotInGroup { host: String, group: String },

    /// Rename source is absent
    #[error("Rename source does not exist: {name}")]
    SourceNotFound { name: String },

    /// Rename target is already taken
    #[error("Rename target already exists: {name}")]
    TargetExists { name: String },

    // ===== Mutation Errors =====
    /// A multi-step mutation failed after performing some writes
    ///
    /// Nothing is rolled back; `completed` lists the steps that took effect.
    #[error("{op} on {entity} stopped after [{}]: {source}", .completed.join(", "))]
    PartialApplication {
        op: String,
        entity: String,
        completed: Vec<String>,
        source: ExError,
    },

    // ===== Generic Errors =====
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Failure surfaced by the store layer
    #[error(transparent)]
    Store(#[from] ExError),
}

impl KeeperError {
    /// Create a syntax error for a token
    pub fn syntax(token: impl Into<String>, expected: impl Into<String>) -> Self {
        KeeperError::Syntax {
            token: token.into(),
            expected: expected.into(),
        }
    }

    /// Canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        ExError::from(self.clone()).kind()
    }

    /// True if the store could not be reached
    pub fn is_connectivity(&self) -> bool {
        self.kind() == ExErrorKind::Connectivity
    }
}

/// Conversion from KeeperError to ExError
///
/// Used by the logging macros so every failure is reported with a stable kind
/// and code.
impl From<KeeperError> for ExError {
    fn from(err: KeeperError) -> Self {
        match err {
            KeeperError::Syntax { token, expected } => ExError::new(ExErrorKind::InvalidInput)
                .with_entity_id(token)
                .with_message(format!("expected {}", expected)),

            KeeperError::HostNotFound { host } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(host)
                .with_message("Host not found"),

            KeeperError::GroupNotFound { group } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(group)
                .with_message("Group not found"),

            KeeperError::VariableNotFound { host, variable } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(host)
                    .with_message(format!("Hostvar {} not found", variable))
            }

            KeeperError::HostAlreadyExists { host } => ExError::new(ExErrorKind::AlreadyExists)
                .with_entity_id(host)
                .with_message("Host already exists"),

            KeeperError::AlreadyInGroup { host, group } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_entity_id(host)
                    .with_message(format!("Host already in group {}", group))
            }

            KeeperError::NotInGroup { host, group } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(host)
                .with_message(format!("Host not in group {}", group)),

            KeeperError::SourceNotFound { name } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(name)
                .with_op("rename")
                .with_message("Rename source not found"),

            KeeperError::TargetExists { name } => ExError::new(ExErrorKind::AlreadyExists)
                .with_entity_id(name)
                .with_op("rename")
                .with_message("Rename target already exists"),

            KeeperError::PartialApplication {
                op,
                entity,
                completed,
                source,
            } => ExError::new(ExErrorKind::PartialApplication)
                .with_op(op)
                .with_entity_id(entity)
                .with_message(format!(
                    "completed [{}] before failure: {}",
                    completed.join(", "),
                    source
                )),

            KeeperError::Config { reason } => {
                ExError::new(ExErrorKind::Config).with_message(reason)
            }

            KeeperError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            KeeperError::Store(inner) => inner,
        }
    }
}

impl From<serde_json::Error> for KeeperError {
    fn from(err: serde_json::Error) -> Self {
        KeeperError::Serialization {
            message: err.to_string(),
        }
    }
}
