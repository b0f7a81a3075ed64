//! 🪣🚀🌐 S3 Backend: the bucket side of the bridge.
//!
//! This module wraps the AWS S3 SDK and exposes the object store contract: bucket
//! lifecycle, put/get/list/delete, presigned URLs. Works against anything that speaks
//! S3 with static keys (MinIO on a laptop, MinIO in a cluster, the real thing).
//!
//! 🧠 Knowledge graph:
//! - Config co-located: `StoreConfig` lives in `s3_store.rs`
//! - Transport: `GetObject` → `ByteStream::into_async_read()` for streams,
//!   `ByteStream::try_next()` chunks for file downloads
//! - Errors: `s3_errors.rs` classifies `SdkError` into `LakeError` once
//! - Tests: `fake_s3.rs` is a wiremock responder that plays an S3 server in RAM
//!
//! 🦆 The duck has no clearance for AWS. It watches from the edge of the VPC.

mod s3_errors;
mod s3_store;

#[cfg(test)]
pub(crate) mod fake_s3;

pub use s3_store::{ObjectStream, S3ObjectStore, StoreConfig};
