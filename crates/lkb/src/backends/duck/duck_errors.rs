//! 🏷️ DuckDB error triage.
//!
//! DuckDB tells you what went wrong in the first words of its message: "Catalog Error:",
//! "Parser Error:", "Binder Error:". We read the prefix and file it under the right kind.
//! Reading error strings is not glamorous. Neither is a 3am page. Pick your battles.

use crate::error::LakeError;

/// 🎯 Map an engine failure message into a [`LakeError`].
pub(super) fn classify_message(message: String) -> LakeError {
    if message.starts_with("Catalog Error") {
        // -- 📚 the catalog also holds functions; calling one that doesn't exist is a query typo
        if message.contains("Function with name") {
            return LakeError::QuerySyntax { message };
        }
        return LakeError::UnknownTable { message };
    }
    if message.starts_with("Parser Error") {
        return LakeError::QuerySyntax { message };
    }
    if message.starts_with("Binder Error") {
        // -- 🔍 a column that doesn't exist is a typo in the query, not a type problem
        if message.contains("Referenced column") || message.contains("not found in FROM clause") {
            return LakeError::QuerySyntax { message };
        }
        return LakeError::TypeMismatch { message };
    }
    if message.starts_with("Conversion Error")
        || message.starts_with("Mismatch Type Error")
        || message.starts_with("Invalid Input Error")
    {
        return LakeError::TypeMismatch { message };
    }
    LakeError::Engine { message }
}

/// 💀 Map a `duckdb::Error` into a [`LakeError`].
pub(super) fn classify(err: duckdb::Error) -> LakeError {
    classify_message(err.to_string())
}
