//! Integration tests for Shelf-Feed

mod crawl_tests;
mod reconcile_tests;
