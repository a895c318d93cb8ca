//! mpackr — a streaming MessagePack codec for the classic format.
//!
//! This crate implements the classic MessagePack tag set (pre-str/bin
//! split): a pull-style decoder that reads one value at a time from a
//! blocking byte source, and a minimal encoder. The decoder promotes
//! integers to the narrowest lossless width, enforces configurable size
//! limits before allocating, and lets callers peek the next value's type
//! without consuming it.
//!
//! # Architecture
//!
//! - **`marker`** — format tag byte constants
//! - **`channel`** — byte sources (`Channel` trait, `ReadChannel`, `BytesChannel`)
//! - **`accept`** — per-token sinks driven by the dispatcher
//! - **`unpacker`** — the streaming decoder and its typed read surface
//! - **`pack`** — encoding into a `bytes::BytesMut`
//! - **`types`** — semantic classification used when peeking

pub mod accept;
pub mod channel;
pub mod error;
pub mod marker;
pub mod pack;
pub mod types;
pub mod unpacker;
