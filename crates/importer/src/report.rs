//! Plain-text rendering of leaderboards for the terminal.

use storage::dto::ranking::LeaderboardResponse;

/// Render a leaderboard as a fixed-width table, one line per entry.
pub fn format_leaderboard(leaderboard: &LeaderboardResponse) -> String {
    let mut out = format!(
        "{} leaderboard (min votes {}, global average {:.2})\n",
        leaderboard.label, leaderboard.min_votes, leaderboard.global_average
    );

    if leaderboard.entries.is_empty() {
        out.push_str("  no resorts\n");
        return out;
    }

    for entry in &leaderboard.entries {
        let medal = entry.medal.as_deref().unwrap_or("  ");
        out.push_str(&format!(
            "{:>3}. {} {:<32} {:<16} score {:>5.2}  mean {:>5.2}  ({} ratings)\n",
            entry.rank,
            medal,
            entry.resort.name,
            entry.resort.country,
            entry.score,
            entry.mean,
            entry.review_count
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::dto::ranking::{LeaderboardEntry, ResortInfo};
    use storage::models::Metric;
    use storage::services::Bucket;
    use uuid::Uuid;

    fn entry(rank: u32, name: &str, score: f64, bucket: Bucket) -> LeaderboardEntry {
        LeaderboardEntry {
            rank,
            resort: ResortInfo {
                resort_id: Uuid::new_v4(),
                name: name.to_string(),
                country: "France".to_string(),
                continent: None,
                region: None,
            },
            mean: score,
            review_count: 3,
            score,
            bucket,
            medal: bucket.medal().map(String::from),
            bar_percent: score * 10.0,
        }
    }

    #[test]
    fn test_format_leaderboard() {
        let leaderboard = LeaderboardResponse {
            metric: Metric::Snow,
            label: Metric::Snow.label().to_string(),
            min_votes: 5,
            global_average: 7.25,
            entries: vec![
                entry(1, "Tignes", 8.5, Bucket::Gold),
                entry(4, "Les Arcs", 6.0, Bucket::Rest),
            ],
        };

        let text = format_leaderboard(&leaderboard);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Snow leaderboard (min votes 5, global average 7.25)"));
        assert!(lines[1].contains("🥇 Tignes"));
        assert!(lines[1].contains("score  8.50"));
        assert!(lines[2].starts_with("  4."));
        assert!(lines[2].contains("(3 ratings)"));
    }

    #[test]
    fn test_empty_leaderboard() {
        let leaderboard = LeaderboardResponse {
            metric: Metric::Overall,
            label: Metric::Overall.label().to_string(),
            min_votes: 5,
            global_average: 0.0,
            entries: Vec::new(),
        };

        assert!(format_leaderboard(&leaderboard).ends_with("  no resorts\n"));
    }
}
