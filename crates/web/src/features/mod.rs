pub mod admin;
pub mod rankings;
pub mod ratings;
pub mod resorts;
pub mod users;
