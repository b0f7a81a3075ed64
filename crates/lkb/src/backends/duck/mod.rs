//! 🦆 DuckDB Backend: the table side of the bridge.
//!
//! One in-memory DuckDB connection per [`DuckDbSession`]. Load delimited files into named
//! tables, run SQL, hand back stringified rows, export results as delimited files.
//!
//! 🧠 Knowledge graph:
//! - `duck_session.rs`: the session and every operation on it
//! - `duck_errors.rs`: DuckDB's error prefixes ("Catalog Error: ...") mapped into `LakeError`
//! - Synchronous on purpose. DuckDB is in-process; there's no wire to await.
//!
//! 🦆 Finally, a duck with a job title.

mod duck_errors;
mod duck_session;

pub use duck_session::DuckDbSession;
