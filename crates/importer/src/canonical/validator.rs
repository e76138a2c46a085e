use super::FORMAT_VERSION;
use super::models::{CanonicalFormat, ResortData};
use crate::{ImporterError, Result};
use std::collections::HashSet;
use tracing::warn;

const MAX_ELEVATION_M: i32 = 9000;

pub struct CanonicalValidator;

impl CanonicalValidator {
    pub fn validate(canonical: &CanonicalFormat) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();

        if canonical.format_version != FORMAT_VERSION {
            report.errors.push(format!(
                "Unsupported format version: {}. Expected {}",
                canonical.format_version, FORMAT_VERSION
            ));
        }

        if canonical.source.extractor.trim().is_empty() {
            report
                .warnings
                .push("Source extractor is not specified".to_string());
        }

        if canonical.resorts.is_empty() {
            report
                .errors
                .push("At least one resort is required".to_string());
        }

        let mut seen = HashSet::new();
        for (idx, resort) in canonical.resorts.iter().enumerate() {
            Self::validate_resort(idx, resort, &mut report);

            // rows are upserted on the trimmed (name, country)
            if !seen.insert((resort.name.trim(), resort.country.trim())) {
                report.errors.push(format!(
                    "Duplicate resort: '{}'",
                    resort.label()
                ));
            }
        }

        if !report.errors.is_empty() {
            Err(ImporterError::ValidationError(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }

    fn validate_resort(idx: usize, resort: &ResortData, report: &mut ValidationReport) {
        let label = format!("{}. {}", idx + 1, resort.label());

        if resort.name.trim().is_empty() {
            report
                .errors
                .push(format!("Resort #{} has an empty name", idx + 1));
        }
        if resort.country.trim().is_empty() {
            report
                .errors
                .push(format!("Resort '{}' has an empty country", label));
        }

        if let Some(url) = &resort.url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            report
                .errors
                .push(format!("Resort '{}' has an invalid url: '{}'", label, url));
        }

        for (field, value) in [
            ("elevation_top_m", resort.elevation_top_m),
            ("elevation_difference_m", resort.elevation_difference_m),
        ] {
            if let Some(value) = value
                && !(0..=MAX_ELEVATION_M).contains(&value)
            {
                report.errors.push(format!(
                    "Resort '{}': {} must be between 0 and {}, got {}",
                    label, field, MAX_ELEVATION_M, value
                ));
            }
        }

        for (field, value) in [
            ("number_of_lifts", resort.number_of_lifts),
            ("number_of_slopes", resort.number_of_slopes),
            ("annual_snowfall_cm", resort.annual_snowfall_cm),
        ] {
            if let Some(value) = value
                && value < 0
            {
                report
                    .errors
                    .push(format!("Resort '{}': negative {}", label, field));
            }
        }

        if let Some(length) = resort.total_slope_length_km
            && (!length.is_finite() || length < 0.0)
        {
            report
                .errors
                .push(format!("Resort '{}': invalid total_slope_length_km", label));
        }

        if let (Some(top), Some(difference)) = (resort.elevation_top_m, resort.elevation_difference_m)
            && difference > top
        {
            report.warnings.push(format!(
                "Resort '{}': elevation difference {} exceeds top elevation {}",
                label, difference, top
            ));
        }

        if resort.continent.is_none() {
            report
                .warnings
                .push(format!("Resort '{}' has no continent", label));
        }
        if resort.url.is_none() {
            report
                .warnings
                .push(format!("Resort '{}' has no url", label));
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}
