//! CLI command implementations

pub mod evaluate;
pub mod init;
pub mod inspect;
pub mod train;
