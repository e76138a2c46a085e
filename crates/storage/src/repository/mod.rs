pub mod ranking;
pub mod rating;
pub mod resort;
pub mod user;

pub use ranking::RankingRepository;
pub use rating::RatingRepository;
pub use resort::ResortRepository;
pub use user::UserRepository;
