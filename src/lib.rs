//! Short URL service built around a reversible identifier codec.
//!
//! Stored entries get sequential identifiers; [`codec::Codec`] turns each
//! identifier into a short token (and back) by shuffling its bits with a fixed
//! permutation table and writing the result in a compact alphabet. The
//! remaining modules are the HTTP service that stores and redirects entries.

pub mod app;
pub mod codec;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod types;
pub mod validations;
