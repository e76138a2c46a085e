use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A scoring dimension the ranking engine can rank resorts by.
///
/// `Overall` reads the score stored on each rating at submission time; the
/// other variants read one of the seven category scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Overall,
    Terrain,
    Snow,
    Lifts,
    Apres,
    Family,
    Value,
    Scenery,
}

impl Metric {
    /// The seven rating categories in display order.
    pub const CATEGORIES: [Metric; 7] = [
        Metric::Terrain,
        Metric::Snow,
        Metric::Lifts,
        Metric::Apres,
        Metric::Family,
        Metric::Value,
        Metric::Scenery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overall => "overall",
            Self::Terrain => "terrain",
            Self::Snow => "snow",
            Self::Lifts => "lifts",
            Self::Apres => "apres",
            Self::Family => "family",
            Self::Value => "value",
            Self::Scenery => "scenery",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Overall => "Overall",
            Self::Terrain => "Terrain",
            Self::Snow => "Snow",
            Self::Lifts => "Lifts",
            Self::Apres => "Après-Ski",
            Self::Family => "Family",
            Self::Value => "Value",
            Self::Scenery => "Scenery",
        }
    }

    pub fn is_category(&self) -> bool {
        !matches!(self, Self::Overall)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overall" => Ok(Self::Overall),
            "terrain" => Ok(Self::Terrain),
            "snow" => Ok(Self::Snow),
            "lifts" => Ok(Self::Lifts),
            "apres" | "apres-ski" | "après-ski" => Ok(Self::Apres),
            "family" => Ok(Self::Family),
            "value" => Ok(Self::Value),
            "scenery" => Ok(Self::Scenery),
            other => Err(format!(
                "Unknown metric '{}'. Expected one of: overall, terrain, snow, lifts, apres, family, value, scenery",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_parsing() {
        assert_eq!("snow".parse::<Metric>().unwrap(), Metric::Snow);
        assert_eq!("  OVERALL ".parse::<Metric>().unwrap(), Metric::Overall);
        assert_eq!("Après-Ski".parse::<Metric>().unwrap(), Metric::Apres);
        assert!("powder".parse::<Metric>().is_err());
    }

    #[test]
    fn test_as_str_round_trips_through_from_str() {
        for metric in Metric::CATEGORIES.iter().chain([Metric::Overall].iter()) {
            assert_eq!(metric.as_str().parse::<Metric>().unwrap(), *metric);
        }
    }

    #[test]
    fn test_categories_exclude_overall() {
        assert_eq!(Metric::CATEGORIES.len(), 7);
        assert!(Metric::CATEGORIES.iter().all(Metric::is_category));
        assert!(!Metric::Overall.is_category());
    }

    #[test]
    fn test_serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&Metric::Apres).unwrap();
        assert_eq!(json, "\"apres\"");
    }
}
