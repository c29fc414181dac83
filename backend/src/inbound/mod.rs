//! Inbound adapters translating external requests into domain service calls.
//!
//! Only HTTP is served; framework details stay inside [`http`].

pub mod http;
