//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod convert_handler;

pub use convert_handler::*;
