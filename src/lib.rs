pub mod access;
pub mod app;
pub mod config;
pub mod gateway;
pub mod shared;
pub mod wizard;
