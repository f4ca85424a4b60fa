pub mod animation;
pub mod app;
pub mod autoplay;
pub mod cli;
pub mod commands;
pub mod config;
pub mod document;
pub mod fullscreen;
pub mod hooks;
pub mod input;
pub mod markup;
pub mod navigator;
pub mod observer;
pub mod parser;
pub mod performance;
pub mod platform;
pub mod presentation;
pub mod scheduler;
pub mod store;
pub mod theme;
