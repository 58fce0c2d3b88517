pub mod check;
mod command_result;
pub mod helper;
pub mod init;
pub mod wrap;

pub use command_result::*;
