//! Integration tests for sidetree

mod cli_parse;
mod diff_aggregation;
mod lazy_load_cache;
mod tree_service;
mod tree_synthesis;
