//! Error types for async-snmp-session.
//!
//! All errors are `#[non_exhaustive]` to allow adding new variants without breaking changes.

use crate::types::SnmpType;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// OID validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidErrorKind {
    /// Empty OID string.
    Empty,
    /// Invalid arc value.
    InvalidArc,
    /// Alphabetic character in a numeric OID.
    NotNumeric,
    /// OID has too many arcs (exceeds MAX_OID_LEN).
    TooManyArcs { count: usize, max: usize },
}

impl std::fmt::Display for OidErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty OID"),
            Self::InvalidArc => write!(f, "invalid arc value"),
            Self::NotNumeric => write!(f, "OID is not purely numeric"),
            Self::TooManyArcs { count, max } => {
                write!(f, "OID has {} arcs, exceeds maximum {}", count, max)
            }
        }
    }
}

/// SNMP error status codes (RFC 3416).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    NoAccess,
    WrongType,
    WrongLength,
    WrongEncoding,
    WrongValue,
    NoCreation,
    InconsistentValue,
    ResourceUnavailable,
    CommitFailed,
    UndoFailed,
    AuthorizationError,
    NotWritable,
    InconsistentName,
    /// Unknown/future error status code.
    Unknown(i32),
}

impl ErrorStatus {
    /// Create from raw status code.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            7 => Self::WrongType,
            8 => Self::WrongLength,
            9 => Self::WrongEncoding,
            10 => Self::WrongValue,
            11 => Self::NoCreation,
            12 => Self::InconsistentValue,
            13 => Self::ResourceUnavailable,
            14 => Self::CommitFailed,
            15 => Self::UndoFailed,
            16 => Self::AuthorizationError,
            17 => Self::NotWritable,
            18 => Self::InconsistentName,
            other => Self::Unknown(other),
        }
    }

    /// Convert to raw status code.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::NoAccess => 6,
            Self::WrongType => 7,
            Self::WrongLength => 8,
            Self::WrongEncoding => 9,
            Self::WrongValue => 10,
            Self::NoCreation => 11,
            Self::InconsistentValue => 12,
            Self::ResourceUnavailable => 13,
            Self::CommitFailed => 14,
            Self::UndoFailed => 15,
            Self::AuthorizationError => 16,
            Self::NotWritable => 17,
            Self::InconsistentName => 18,
            Self::Unknown(code) => *code,
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::NoAccess => write!(f, "noAccess"),
            Self::WrongType => write!(f, "wrongType"),
            Self::WrongLength => write!(f, "wrongLength"),
            Self::WrongEncoding => write!(f, "wrongEncoding"),
            Self::WrongValue => write!(f, "wrongValue"),
            Self::NoCreation => write!(f, "noCreation"),
            Self::InconsistentValue => write!(f, "inconsistentValue"),
            Self::ResourceUnavailable => write!(f, "resourceUnavailable"),
            Self::CommitFailed => write!(f, "commitFailed"),
            Self::UndoFailed => write!(f, "undoFailed"),
            Self::AuthorizationError => write!(f, "authorizationError"),
            Self::NotWritable => write!(f, "notWritable"),
            Self::InconsistentName => write!(f, "inconsistentName"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// A SET value that could not be marshalled into its wire type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueFailure {
    /// The tag the value was destined for.
    pub tag: String,
    /// The type the value was parsed as.
    pub ty: SnmpType,
    /// The input, `None` when no value was supplied.
    pub input: Option<String>,
}

impl std::fmt::Display for ValueFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.input {
            Some(input) => write!(f, "{}: cannot encode {:?} as {}", self.tag, input, self.ty),
            None => write!(f, "{}: missing {} value", self.tag, self.ty),
        }
    }
}

/// Library error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A tag could not be resolved to a numeric OID.
    #[error("unknown object id: {tag}")]
    UnknownObjectId { tag: String },

    /// A SET value has neither a MIB type nor a usable caller-supplied type.
    #[error("could not determine type for {tag}")]
    UndeterminedType { tag: String },

    /// The engine could not open a session.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// The engine reported a timeout.
    #[error("timed out: {message}")]
    Timeout { message: String },

    /// SNMP protocol error returned by agent.
    #[error("SNMP error: {status} at index {index}")]
    Snmp { status: ErrorStatus, index: u32 },

    /// noSuchName returned while NoSuchName retry is disabled.
    #[error("no such name at index {index}")]
    NoSuchName { index: u32 },

    /// One or more SET values could not be marshalled.
    #[error("{} invalid value(s): {}", failures.len(), failures.first().map(ToString::to_string).unwrap_or_default())]
    InvalidValue { failures: Vec<ValueFailure> },

    /// Invalid OID format.
    #[error("invalid OID: {kind}")]
    InvalidOid {
        kind: OidErrorKind,
        input: Option<Box<str>>,
    },

    /// Non-increasing OID detected during walk (agent misbehavior).
    #[error("walk detected non-increasing OID: {previous} >= {current}")]
    NonIncreasingOid {
        previous: crate::oid::Oid,
        current: crate::oid::Oid,
    },

    /// The operation needs a newer protocol version than the session uses.
    #[error("{operation} is not available with {version}")]
    Unsupported {
        operation: &'static str,
        version: crate::version::Version,
    },

    /// Any other engine failure, with the engine's system error code.
    #[error("engine error: {message}")]
    Engine { message: String, code: i32 },
}

impl Error {
    /// Create an unknown object id error.
    pub fn unknown_object_id(tag: impl Into<String>) -> Self {
        Self::UnknownObjectId { tag: tag.into() }
    }

    /// Create an invalid OID error from a kind (no input string).
    pub fn invalid_oid(kind: OidErrorKind) -> Self {
        Self::InvalidOid { kind, input: None }
    }

    /// Create an invalid OID error with the input string that failed.
    pub fn invalid_oid_with_input(kind: OidErrorKind, input: impl Into<Box<str>>) -> Self {
        Self::InvalidOid {
            kind,
            input: Some(input.into()),
        }
    }

    /// Numeric code recorded in the session error state.
    ///
    /// SNMP errors report their status, engine errors their system code.
    pub fn error_code(&self) -> i32 {
        match self {
            Self::Snmp { status, .. } => status.as_i32(),
            Self::NoSuchName { .. } => ErrorStatus::NoSuchName.as_i32(),
            Self::Engine { code, .. } => *code,
            _ => 0,
        }
    }

    /// SNMP error index recorded in the session error state.
    pub fn error_index(&self) -> u32 {
        match self {
            Self::Snmp { index, .. } | Self::NoSuchName { index } => *index,
            _ => 0,
        }
    }
}

/// Snapshot of the most recent error on a session.
///
/// Cleared at the start of every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorState {
    /// Human readable message.
    pub message: String,
    /// SNMP error status or engine system error code.
    pub code: i32,
    /// SNMP error index (1-based, 0 when not applicable).
    pub index: u32,
}

impl ErrorState {
    pub(crate) fn clear(&mut self) {
        self.message.clear();
        self.code = 0;
        self.index = 0;
    }

    pub(crate) fn record(&mut self, error: &Error) {
        self.message = error.to_string();
        self.code = error.error_code();
        self.index = error.error_index();
    }

    /// Whether an error has been recorded since the last clear.
    pub fn is_set(&self) -> bool {
        !self.message.is_empty()
    }
}
