use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::ResortStore;
use crate::dto::resort::{CountryCount, CreateResortRequest, ResortFilter, ResortSort};
use crate::dto::user::CreateUserRequest;
use crate::error::{Result, StorageError};
use crate::models::{CategoryScores, Location, Rating, RatingWithAuthor, Resort, ResortWithRatings, User};

#[derive(Debug, Default)]
struct State {
    resorts: Vec<Resort>,
    ratings: Vec<Rating>,
    users: Vec<User>,
}

impl State {
    fn refresh_aggregates(&mut self, resort_id: Uuid) -> Option<Resort> {
        let overalls: Vec<f64> = self
            .ratings
            .iter()
            .filter(|r| r.resort_id == resort_id)
            .map(|r| r.overall)
            .collect();

        let resort = self.resorts.iter_mut().find(|r| r.resort_id == resort_id)?;
        resort.review_count = overalls.len() as i32;
        resort.average_overall_rating = if overalls.is_empty() {
            None
        } else {
            Some(overalls.iter().sum::<f64>() / overalls.len() as f64)
        };

        Some(resort.clone())
    }
}

/// Store backed by process memory, used by tests in place of PostgreSQL.
///
/// Applies the same uniqueness rules and catalog ordering as the database
/// schema and queries.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resort as-is, bypassing validation.
    pub fn insert_resort(&self, resort: Resort) {
        self.write().resorts.push(resort);
    }

    pub fn insert_user(&self, user: User) {
        self.write().users.push(user);
    }

    /// Insert a rating and refresh the cached aggregates of its resort.
    pub fn insert_rating(&self, rating: Rating) {
        let mut state = self.write();
        let resort_id = rating.resort_id;
        state.ratings.push(rating);
        state.refresh_aggregates(resort_id);
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn matches_filter(resort: &Resort, filter: &ResortFilter) -> bool {
    if let Some(q) = filter.query()
        && !resort.name.to_lowercase().contains(&q.to_lowercase())
    {
        return false;
    }

    if let Some(continent) = filter.continent() {
        let same = resort
            .continent
            .as_deref()
            .is_some_and(|c| c.to_lowercase() == continent.to_lowercase());
        if !same {
            return false;
        }
    }

    if let Some(country) = filter.country()
        && resort.country.to_lowercase() != country.to_lowercase()
    {
        return false;
    }

    if let Some(min) = filter.min_rating() {
        return resort.average_overall_rating.is_some_and(|avg| avg >= min);
    }

    true
}

/// Compare optional ratings with unrated resorts last regardless of direction.
fn compare_ratings(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.total_cmp(&a),
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn catalog_order(sort: ResortSort, a: &Resort, b: &Resort) -> Ordering {
    let by_name = || a.name.cmp(&b.name).then_with(|| a.resort_id.cmp(&b.resort_id));

    match sort {
        ResortSort::RatingDesc => {
            compare_ratings(a.average_overall_rating, b.average_overall_rating, true)
                .then_with(by_name)
        }
        ResortSort::RatingAsc => {
            compare_ratings(a.average_overall_rating, b.average_overall_rating, false)
                .then_with(by_name)
        }
        ResortSort::NameAsc => by_name(),
        ResortSort::NameDesc => b
            .name
            .cmp(&a.name)
            .then_with(|| a.resort_id.cmp(&b.resort_id)),
        ResortSort::ReviewsDesc => b.review_count.cmp(&a.review_count).then_with(by_name),
    }
}

#[async_trait]
impl ResortStore for MemoryStore {
    async fn snapshot(&self) -> Result<Vec<ResortWithRatings>> {
        let state = self.read();
        let mut resorts = state.resorts.clone();
        resorts.sort_by(|a, b| catalog_order(ResortSort::NameAsc, a, b));

        Ok(resorts
            .into_iter()
            .map(|resort| {
                let ratings = state
                    .ratings
                    .iter()
                    .filter(|r| r.resort_id == resort.resort_id)
                    .cloned()
                    .collect();
                ResortWithRatings::new(resort, ratings)
            })
            .collect())
    }

    async fn find_resort(&self, resort_id: Uuid) -> Result<Resort> {
        self.read()
            .resorts
            .iter()
            .find(|r| r.resort_id == resort_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn resort_ratings(&self, resort_id: Uuid) -> Result<Vec<RatingWithAuthor>> {
        let state = self.read();
        let mut ratings: Vec<RatingWithAuthor> = state
            .ratings
            .iter()
            .filter(|r| r.resort_id == resort_id)
            .filter_map(|rating| {
                let author = state.users.iter().find(|u| u.user_id == rating.user_id)?;
                Some(RatingWithAuthor {
                    rating: rating.clone(),
                    author_name: author.name.clone(),
                })
            })
            .collect();

        ratings.sort_by(|a, b| {
            b.rating
                .created_at
                .cmp(&a.rating.created_at)
                .then_with(|| a.rating.rating_id.cmp(&b.rating.rating_id))
        });

        Ok(ratings)
    }

    async fn search_resorts(&self, filter: &ResortFilter) -> Result<(Vec<Resort>, i64)> {
        let state = self.read();
        let mut matching: Vec<Resort> = state
            .resorts
            .iter()
            .filter(|r| matches_filter(r, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| catalog_order(filter.sort, a, b));

        let total = matching.len() as i64;
        let pagination = filter.pagination();
        let page = matching
            .into_iter()
            .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
            .take(pagination.limit() as usize)
            .collect();

        Ok((page, total))
    }

    async fn locations(&self) -> Result<Vec<Location>> {
        let distinct: BTreeSet<(String, Option<String>)> = self
            .read()
            .resorts
            .iter()
            .map(|r| (r.country.clone(), r.continent.clone()))
            .collect();

        Ok(distinct
            .into_iter()
            .map(|(country, continent)| Location { continent, country })
            .collect())
    }

    async fn country_counts(&self) -> Result<Vec<CountryCount>> {
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for resort in &self.read().resorts {
            *counts.entry(resort.country.clone()).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(country, resort_count)| CountryCount {
                country,
                resort_count,
            })
            .collect())
    }

    async fn create_resort(&self, request: &CreateResortRequest) -> Result<Resort> {
        let mut state = self.write();
        if state
            .resorts
            .iter()
            .any(|r| r.name == request.name && r.country == request.country)
        {
            return Err(StorageError::ConstraintViolation(
                "A resort with this name already exists in this country".to_string(),
            ));
        }

        let resort = Resort {
            resort_id: Uuid::new_v4(),
            name: request.name.clone(),
            url: request.url.clone(),
            country: request.country.clone(),
            continent: request.continent.clone(),
            region: request.region.clone(),
            elevation_top_m: request.elevation_top_m,
            elevation_difference_m: request.elevation_difference_m,
            total_slope_length_km: request.total_slope_length_km,
            number_of_lifts: request.number_of_lifts,
            number_of_slopes: request.number_of_slopes,
            annual_snowfall_cm: request.annual_snowfall_cm,
            average_overall_rating: None,
            review_count: 0,
            created_at: chrono::Utc::now().naive_utc(),
        };
        state.resorts.push(resort.clone());

        Ok(resort)
    }

    async fn create_user(&self, request: &CreateUserRequest) -> Result<User> {
        let mut state = self.write();
        let email = request.email.trim().to_lowercase();
        if state.users.iter().any(|u| u.email == email) {
            return Err(StorageError::ConstraintViolation(
                "Email is already registered".to_string(),
            ));
        }

        let user = User {
            user_id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            email,
            created_at: chrono::Utc::now().naive_utc(),
        };
        state.users.push(user.clone());

        Ok(user)
    }

    async fn submit_rating(
        &self,
        resort_id: Uuid,
        user_id: Uuid,
        scores: CategoryScores,
    ) -> Result<(Rating, Resort)> {
        let mut state = self.write();
        if !state.resorts.iter().any(|r| r.resort_id == resort_id) {
            return Err(StorageError::NotFound);
        }
        if !state.users.iter().any(|u| u.user_id == user_id) {
            return Err(StorageError::ConstraintViolation("Unknown user".to_string()));
        }

        let rating = Rating::new(resort_id, user_id, scores);
        state.ratings.push(rating.clone());
        let resort = state
            .refresh_aggregates(resort_id)
            .ok_or(StorageError::NotFound)?;

        Ok((rating, resort))
    }

    async fn recompute_aggregates(&self) -> Result<u64> {
        let mut state = self.write();
        let ids: Vec<Uuid> = state.resorts.iter().map(|r| r.resort_id).collect();
        for id in &ids {
            state.refresh_aggregates(*id);
        }

        Ok(ids.len() as u64)
    }
}
