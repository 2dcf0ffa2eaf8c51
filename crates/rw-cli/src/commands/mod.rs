//! CLI command implementations

pub(crate) mod common;
pub(crate) mod create;
pub(crate) mod init;
pub(crate) mod run;
pub(crate) mod status;
pub(crate) mod undo;
