//! 💀 Errors: the typed vocabulary of everything that can go sideways between a bucket and a table.
//!
//! 🎬 *[a CSV leaves the bucket. it never arrives at the table. the detectives are called.]*
//!
//! Backends classify their SDK/engine failures exactly once, at the boundary, into a
//! [`LakeError`]. Callers above that line match on [`ErrorKind`] and never see an
//! `SdkError<HeadBucketError, HttpResponse>` in the wild. The supervisor and CLI then wrap
//! these in `anyhow` context, same as the rest of the app.
//!
//! 🦆 The duck has read every variant. It has opinions about `Engine`.

use std::path::PathBuf;

/// 📦 Result alias for everything below the supervisor.
pub type LakeResult<T> = std::result::Result<T, LakeError>;

/// 🏷️ Fieldless tag for a [`LakeError`], for callers who want to `match` without
/// destructuring messages. Tests love it. Tests are callers too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    StoreUnavailable,
    AccessDenied,
    NotFound,
    TableExists,
    UnknownTable,
    SchemaInference,
    QuerySyntax,
    TypeMismatch,
    IoWrite,
    IoRead,
    SessionClosed,
    Presign,
    Engine,
}

/// 💀 Everything the object store client and the engine session can fail with.
#[derive(Debug, thiserror::Error)]
pub enum LakeError {
    /// 📡 Backend unreachable, timed out, or answered with something we can't use.
    #[error("object store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// 🔒 Credentials rejected. The bouncer read the access key and laughed.
    #[error("access denied: {message}")]
    AccessDenied { message: String },

    /// 🔍 No such bucket or key.
    #[error("not found: s3://{bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// 🚫 Loading into a name that is already bound. Unlike the object store, we don't overwrite.
    #[error("table '{table}' already exists in this session")]
    TableExists { table: String },

    #[error("unknown table: {message}")]
    UnknownTable { message: String },

    /// 📐 The delimited file didn't hold its shape, or the engine couldn't infer one.
    #[error("schema inference failed for '{table}': {message}")]
    SchemaInference { table: String, message: String },

    #[error("query syntax error: {message}")]
    QuerySyntax { message: String },

    #[error("type mismatch: {message}")]
    TypeMismatch { message: String },

    /// 💾 Writing a local file failed. Disk full, directory missing, permissions by someone who hates us.
    #[error("failed to write '{}': {source}", path.display())]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 📂 Reading a local source file failed before a byte reached the store.
    #[error("failed to read '{}': {message}", path.display())]
    IoRead { path: PathBuf, message: String },

    /// 🔒 The session was closed. It's not you, it's `close()`.
    #[error("engine session is closed")]
    SessionClosed,

    /// ⏱️ The SDK refused to presign with these parameters (e.g. a TTL over a week).
    #[error("cannot presign s3://{bucket}/{key}: {message}")]
    Presign {
        bucket: String,
        key: String,
        message: String,
    },

    /// 🤷 The engine failed in a way none of the other kinds describe.
    #[error("engine error: {message}")]
    Engine { message: String },
}

impl LakeError {
    /// 🏷️ The fieldless kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LakeError::StoreUnavailable { .. } => ErrorKind::StoreUnavailable,
            LakeError::AccessDenied { .. } => ErrorKind::AccessDenied,
            LakeError::NotFound { .. } => ErrorKind::NotFound,
            LakeError::TableExists { .. } => ErrorKind::TableExists,
            LakeError::UnknownTable { .. } => ErrorKind::UnknownTable,
            LakeError::SchemaInference { .. } => ErrorKind::SchemaInference,
            LakeError::QuerySyntax { .. } => ErrorKind::QuerySyntax,
            LakeError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            LakeError::IoWrite { .. } => ErrorKind::IoWrite,
            LakeError::IoRead { .. } => ErrorKind::IoRead,
            LakeError::SessionClosed => ErrorKind::SessionClosed,
            LakeError::Presign { .. } => ErrorKind::Presign,
            LakeError::Engine { .. } => ErrorKind::Engine,
        }
    }

    pub(crate) fn io_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LakeError::IoWrite {
            path: path.into(),
            source,
        }
    }
}
