// src/models/mod.rs

pub mod attempt;
pub mod health;
pub mod question;
