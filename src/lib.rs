pub mod api;
pub mod config;
pub mod extract;
pub mod http;
pub mod humanize;
pub mod link;
pub mod observability;
pub mod pipeline;
pub mod strategies;
