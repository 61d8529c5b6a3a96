//! Problem-to-notebook pipelines for LeetTutor.
//!
//! This crate ties together fetching, HTML conversion, dependency sniffing and
//! harness synthesis into the ordered cells appended to a notebook through a
//! [`DocumentEditPort`](port::DocumentEditPort).

pub mod applier;
pub mod assembler;
pub mod deps;
pub mod harness;
pub mod pipeline;
pub mod port;
