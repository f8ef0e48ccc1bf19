//! Row, value, and column models

mod column;
mod id;
mod row;
mod value;

pub use column::*;
pub use id::*;
pub use row::*;
pub use value::*;
