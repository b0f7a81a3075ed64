//! 🏷️ S3 error triage: turning `SdkError<WhateverError, HttpResponse>` into a word a caller can match on.
//!
//! The SDK gives us five flavors of failure and a few hundred error codes. The bridge contract
//! cares about three outcomes: the backend is gone, the backend hates our keys, or the thing
//! isn't there. Everything lands in one of those buckets. (Pun acknowledged. Pun retained.)

use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use crate::error::{ErrorKind, LakeError};

/// 🔒 Codes that mean "your credentials, not your request, are the problem".
const ACCESS_DENIED_CODES: &[&str] = &[
    "AccessDenied",
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "ExpiredToken",
];

/// 🔍 Codes that mean "there is nothing here".
const NOT_FOUND_CODES: &[&str] = &["NoSuchKey", "NoSuchBucket", "NotFound"];

/// 🪣 Codes that mean "the bucket you asked to create is already yours".
const BUCKET_ALREADY_THERE_CODES: &[&str] = &["BucketAlreadyOwnedByYou", "BucketAlreadyExists"];

/// 🎯 Decide the kind from what the service told us. `None` status = never got an answer.
pub(super) fn kind_for(status: Option<u16>, code: Option<&str>) -> ErrorKind {
    let Some(status) = status else {
        return ErrorKind::StoreUnavailable;
    };
    if matches!(status, 401 | 403) || code.is_some_and(|c| ACCESS_DENIED_CODES.contains(&c)) {
        return ErrorKind::AccessDenied;
    }
    if status == 404 || code.is_some_and(|c| NOT_FOUND_CODES.contains(&c)) {
        return ErrorKind::NotFound;
    }
    ErrorKind::StoreUnavailable
}

/// 🪣 True if a `CreateBucket` failure just means someone (probably us) got there first.
pub(super) fn is_bucket_already_there<E>(err: &SdkError<E, HttpResponse>) -> bool
where
    E: ProvideErrorMetadata,
{
    err.code()
        .is_some_and(|code| BUCKET_ALREADY_THERE_CODES.contains(&code))
}

/// 💀 Classify an SDK failure for `s3://{bucket}/{key}` into a [`LakeError`].
pub(super) fn classify<E>(err: SdkError<E, HttpResponse>, bucket: &str, key: &str) -> LakeError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let (status, code) = match &err {
        SdkError::ServiceError(service) => (
            Some(service.raw().status().as_u16()),
            service.err().code().map(str::to_string),
        ),
        // -- 📡 dispatch failures, timeouts, unparseable responses: we never got a verdict
        _ => (None, None),
    };
    let message = format!(
        "s3://{bucket}/{key}: {}",
        DisplayErrorContext(&err)
    );

    match kind_for(status, code.as_deref()) {
        ErrorKind::AccessDenied => LakeError::AccessDenied { message },
        ErrorKind::NotFound => LakeError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        },
        _ => LakeError::StoreUnavailable { message },
    }
}

/// 📡 A body stream that broke mid-flight. The object existed; the wire didn't cooperate.
pub(super) fn stream_broke(
    bucket: &str,
    key: &str,
    err: impl std::fmt::Display,
) -> LakeError {
    LakeError::StoreUnavailable {
        message: format!("s3://{bucket}/{key}: body stream failed: {err}"),
    }
}
