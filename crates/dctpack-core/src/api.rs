//! Path based entry points, one module per action.

pub mod decode;
pub mod encode;
