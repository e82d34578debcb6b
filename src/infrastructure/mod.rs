pub mod config;
pub mod http;
pub mod lifecycle;
pub mod middleware;
