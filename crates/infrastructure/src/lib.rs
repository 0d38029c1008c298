//! Splitdns Infrastructure Layer
//!
//! The custom DNS resolver stage, the chain builder and the adapter that
//! turns resolver responses into wire messages.
pub mod dns;
