pub mod acquire;
pub mod adapters;
pub mod config;
pub mod dedup;
pub mod domain;
pub mod error;
pub mod exec;
pub mod fasta;
pub mod fs_util;
pub mod index;
pub mod output;
pub mod pipeline;
pub mod store;
pub mod validate;
