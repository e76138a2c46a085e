pub mod common;
pub mod rating;
pub mod ranking;
pub mod resort;
pub mod user;
