//! AIQ terminal client: ask one question, stream three AI answers,
//! and read the synthesized consensus report.

pub mod api;
pub mod banner;
pub mod consts;
pub mod error;
pub mod pages;
pub mod report;
pub mod session;
pub mod spinner;
pub mod stream;
