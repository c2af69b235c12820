//! Route handlers organized by resource

pub mod health;
pub mod superheroes;
pub mod auth;
pub mod pages;
