use std::collections::HashSet;

use crate::models::{Metric, ResortWithRatings};

use super::aggregate;

/// Statistics over a whole snapshot, recomputed for every ranking request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlobalStatistics {
    /// Mean of the overall means of resorts with at least one rating.
    pub global_average: f64,
    pub resorts_ranked: usize,
    pub rated_resorts: usize,
    pub total_ratings: usize,
    pub countries: usize,
}

impl GlobalStatistics {
    pub fn from_snapshot(resorts: &[ResortWithRatings]) -> Self {
        let mut sum_of_means = 0.0;
        let mut rated_resorts = 0;
        let mut total_ratings = 0;

        for entry in resorts {
            let overall = aggregate(&entry.ratings, Metric::Overall);
            if overall.count > 0 {
                sum_of_means += overall.mean;
                rated_resorts += 1;
                total_ratings += overall.count;
            }
        }

        let global_average = if rated_resorts > 0 {
            sum_of_means / rated_resorts as f64
        } else {
            0.0
        };

        let countries = resorts
            .iter()
            .map(|entry| entry.resort.country.to_lowercase())
            .collect::<HashSet<_>>()
            .len();

        Self {
            global_average,
            resorts_ranked: resorts.len(),
            rated_resorts,
            total_ratings,
            countries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{resort, resort_with_overall};

    #[test]
    fn test_global_average_ignores_unrated_resorts() {
        let snapshot = vec![
            resort_with_overall("A", &[9.0, 9.0]),
            resort_with_overall("B", &[5.0]),
            resort_with_overall("C", &[]),
        ];

        let stats = GlobalStatistics::from_snapshot(&snapshot);
        assert_eq!(stats.global_average, 7.0);
        assert_eq!(stats.resorts_ranked, 3);
        assert_eq!(stats.rated_resorts, 2);
        assert_eq!(stats.total_ratings, 3);
    }

    #[test]
    fn test_global_average_is_mean_of_resort_means() {
        // Not the mean of all ratings, which would be (4 * 8 + 2) / 5 = 6.8.
        let snapshot = vec![
            resort_with_overall("A", &[8.0; 4]),
            resort_with_overall("B", &[2.0]),
        ];
        assert_eq!(GlobalStatistics::from_snapshot(&snapshot).global_average, 5.0);
    }

    #[test]
    fn test_empty_snapshot() {
        assert_eq!(GlobalStatistics::from_snapshot(&[]), GlobalStatistics::default());
    }

    #[test]
    fn test_countries_are_counted_case_insensitively() {
        let mut a = resort_with_overall("A", &[]);
        a.resort = resort("A", "Austria");
        let mut b = resort_with_overall("B", &[]);
        b.resort = resort("B", "austria");
        let c = resort_with_overall("C", &[]);

        assert_eq!(GlobalStatistics::from_snapshot(&[a, b, c]).countries, 2);
    }
}
