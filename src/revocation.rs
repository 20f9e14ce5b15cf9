//! Revocation status evaluation.
//!
//! Two modes share one entry point: a backend mode that delegates to an
//! external verification service, and a default emulator mode that probes
//! candidate OCSP/CRL URLs itself and consults a local mock revoked-serial
//! list. Emulator verdicts are always best-effort and never definitive.

pub mod classify;
pub mod evaluator;
pub mod store;
pub mod transport;
pub mod types;

pub use classify::{UrlClass, classify_url};
pub use evaluator::check_revocation_status;
pub use store::{LocalStore, MOCK_REVOKED_SERIALS_KEY};
pub use transport::{HttpTransport, NetworkError, RevocationTransport};
pub use types::{RevocationRequest, RevocationStatus, Source, Status};
