//! Analysis of study sessions exported from a time tracking application.
//! Sessions of a single category can be split into study sets of three lectures each, and
//! sessions of every study category can be summarized per calendar week.
//!

pub mod analysis;
pub mod cli;
pub mod export;
pub mod utils;
