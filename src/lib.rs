pub mod app;
pub mod config;
pub mod feeds;
pub mod logging;
pub mod service;
pub mod store;
pub mod tweet;
pub mod tweet_message;
pub mod ui;
