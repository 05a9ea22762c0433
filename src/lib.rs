pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod geo;
pub mod models;
pub mod seed;
pub mod state;
