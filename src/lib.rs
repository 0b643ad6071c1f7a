pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod model;
pub mod models;
pub mod repo;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;
pub mod views;
