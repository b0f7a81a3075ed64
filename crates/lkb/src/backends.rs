//! 🔌 Backends: where the real I/O happens.
//!
//! 🪣 The object store holds the bytes. 🦆 The engine holds the tables.
//! They never speak to each other directly; the supervisor carries every byte across by hand,
//! like a parent passing notes between two kids who are "not talking right now".
//!
//! 🧠 Knowledge graph:
//! - `s3/`: [`S3ObjectStore`], an `aws-sdk-s3` client with the bucket contract bolted on.
//!   Config co-located: [`StoreConfig`] lives next to the client that uses it.
//! - `duck/`: [`DuckDbSession`], one in-memory DuckDB connection per session.
//! - Each backend maps its SDK/engine errors into [`crate::error::LakeError`] in its own
//!   `*_errors.rs`, exactly once, at the edge.
//!
//! 🦆 The duck is here because every file must have one. This time it has a job.

pub mod duck;
pub mod s3;

pub use duck::DuckDbSession;
pub use s3::{ObjectStream, S3ObjectStore, StoreConfig};
