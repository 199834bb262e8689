//! Windows packaging.

pub mod nsis;
