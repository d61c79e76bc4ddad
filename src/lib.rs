pub mod api;
pub mod config;
pub mod dispatcher;
pub mod rng;
pub mod shutdown;
