// src/handlers/mod.rs

pub mod question;
pub mod root;
pub mod scheduler;
pub mod send;
