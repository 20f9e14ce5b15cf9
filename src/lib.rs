pub mod asn1;
pub mod checker;
pub mod config;
pub mod input;
pub mod pki;
pub mod revocation;
pub mod telemetry;
