//! Async adapters that move whole rencode values over byte streams.

pub mod reader;
mod scan;
pub mod writer;

pub use reader::ValueReader;
pub use writer::ValueWriter;
