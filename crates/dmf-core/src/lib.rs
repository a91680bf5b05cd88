pub mod config;
pub mod logging;

pub mod credentials;
pub mod extract;
pub mod fetch;
pub mod http;
pub mod install;
pub mod item;
pub mod pipeline;
pub mod resolve;
pub mod retry;
pub mod summary;
