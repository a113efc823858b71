pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod media;
pub mod models;
pub mod navigation;
pub mod ordering;
pub mod slug;
