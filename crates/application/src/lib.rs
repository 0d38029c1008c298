//! Splitdns Application Layer
//!
//! Ports the resolver chain is assembled from, and the per-query services
//! that do not depend on a particular record store.
pub mod ports;
pub mod services;
