//! Command/query split
//!
//! Commands change stored state; queries only read it. Each request type declares its
//! response through `mediator::Request` and its side through the markers in [`middleware`].

pub mod middleware;
