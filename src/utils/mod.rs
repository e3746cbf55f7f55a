// src/utils/mod.rs

pub mod network;
pub mod rate_limit;
