pub mod broadcast;
pub mod commands;
pub mod config;
pub mod database;
pub mod handlers;
pub mod translation;
