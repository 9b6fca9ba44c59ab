//! Outer interfaces: the HTTP REST API

pub mod http;
