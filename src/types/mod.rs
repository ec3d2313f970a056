//! Rencode value model.

mod number;
mod value;

pub use number::BigNumber;
pub use value::{Dict, Integer, Value};
