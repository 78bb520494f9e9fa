mod command_result;
pub mod diff;
pub mod init;
mod options;
pub mod sync;

pub use command_result::*;
