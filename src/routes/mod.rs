//! Route modules for Prensa Server

pub mod health;
pub mod pdf;
