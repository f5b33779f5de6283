//! CLI subcommands

pub mod info;
pub mod judges;
pub mod run;
