pub mod metric;
pub mod rating;
pub mod resort;
pub mod user;

pub use metric::Metric;
pub use rating::{CategoryScores, MAX_SCORE, MIN_SCORE, Rating, RatingWithAuthor, SCORE_STEP};
pub use resort::{Location, Resort, ResortWithRatings};
pub use user::User;
