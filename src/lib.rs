//! Bingo Bot, a GroupMe webhook bot that posts bingo cards.

pub mod cards;
pub mod channels;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod routes;
