//! File system and subprocess helpers shared by the stages.

pub mod fs;
pub mod process;
