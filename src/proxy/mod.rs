//! Development request forwarding.
//!
//! A [`ProxyTable`] maps path prefixes to a backend origin; the
//! [`Forwarder`] carries a matched request to that origin and relays the
//! answer. The table is only consulted by the development server.

pub mod forward;
pub mod headers;
pub mod rules;

pub use forward::{ForwardedResponse, Forwarder};
pub use rules::{ForwardTarget, ProxyRule, ProxyTable, Route};
