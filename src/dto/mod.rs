pub mod auth;
pub mod cart;
pub mod favorites;
pub mod menu;
pub mod orders;
pub mod reviews;
