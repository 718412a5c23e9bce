//! Forum API library.
//!
//! A read-only REST service over a forum database: forums, topics, posts
//! and users, with pagination, filtering, sorting and keyword search.

pub mod config;
pub mod db;
pub mod pagination;
pub mod service;
pub mod web;
