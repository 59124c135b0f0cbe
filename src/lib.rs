pub mod auth;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod storage;
