use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use super::model::Dataset;
use crate::error::EmptyDatasetError;

// ---------------------------------------------------------------------------
// Selection domain: the only legal inputs offered to the user
// ---------------------------------------------------------------------------

/// Values the input widgets may offer, derived from the training data.
///
/// Regions and conditions are sorted and deduplicated; the year range is
/// inclusive and both bounds occur in the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionDomain {
    pub regions: Vec<String>,
    pub conditions: Vec<String>,
    pub year_min: i32,
    pub year_max: i32,
}

/// One concrete choice of inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub region: String,
    pub condition: String,
    pub year: i32,
}

impl SelectionDomain {
    /// Derive the domain from the loaded table.
    pub fn extract(dataset: &Dataset) -> Result<Self, EmptyDatasetError> {
        let mut regions: BTreeSet<&str> = BTreeSet::new();
        let mut conditions: BTreeSet<&str> = BTreeSet::new();
        let mut years: Option<(i32, i32)> = None;

        for obs in dataset {
            regions.insert(&obs.region);
            conditions.insert(&obs.condition);
            years = Some(match years {
                Some((lo, hi)) => (lo.min(obs.year), hi.max(obs.year)),
                None => (obs.year, obs.year),
            });
        }

        let (year_min, year_max) = years.ok_or(EmptyDatasetError)?;

        Ok(SelectionDomain {
            regions: regions.into_iter().map(str::to_string).collect(),
            conditions: conditions.into_iter().map(str::to_string).collect(),
            year_min,
            year_max,
        })
    }

    pub fn year_range(&self) -> RangeInclusive<i32> {
        self.year_min..=self.year_max
    }

    pub fn contains_region(&self, region: &str) -> bool {
        self.regions.binary_search_by(|r| r.as_str().cmp(region)).is_ok()
    }

    pub fn contains_condition(&self, condition: &str) -> bool {
        self.conditions
            .binary_search_by(|c| c.as_str().cmp(condition))
            .is_ok()
    }

    /// First region, first condition, latest year.
    pub fn default_selection(&self) -> Selection {
        Selection {
            region: self.regions.first().cloned().unwrap_or_default(),
            condition: self.conditions.first().cloned().unwrap_or_default(),
            year: self.year_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Observation;

    fn sample() -> Dataset {
        Dataset::from_observations(vec![
            Observation::new("Kota Bogor", "Rusak", 2019, 12.0),
            Observation::new("Bandung", "Baik", 2021, 150.0),
            Observation::new("Kota Bogor", "Baik", 2017, 30.0),
            Observation::new("Bandung", "Baik", 2020, 100.0),
        ])
    }

    #[test]
    fn test_extract_sorted_and_deduplicated() {
        let domain = SelectionDomain::extract(&sample()).unwrap();
        assert_eq!(domain.regions, vec!["Bandung", "Kota Bogor"]);
        assert_eq!(domain.conditions, vec!["Baik", "Rusak"]);
        assert_eq!(domain.year_range(), 2017..=2021);
    }

    #[test]
    fn test_bounds_occur_in_table() {
        let ds = sample();
        let domain = SelectionDomain::extract(&ds).unwrap();
        assert!(domain.year_min <= domain.year_max);
        assert!(ds.iter().any(|o| o.year == domain.year_min));
        assert!(ds.iter().any(|o| o.year == domain.year_max));
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        assert_eq!(
            SelectionDomain::extract(&Dataset::default()),
            Err(EmptyDatasetError)
        );
    }

    #[test]
    fn test_membership() {
        let domain = SelectionDomain::extract(&sample()).unwrap();
        assert!(domain.contains_region("Kota Bogor"));
        assert!(!domain.contains_region("Atlantis"));
        assert!(domain.contains_condition("Rusak"));
        assert!(!domain.contains_condition("rusak"));
    }

    #[test]
    fn test_default_selection_uses_latest_year() {
        let domain = SelectionDomain::extract(&sample()).unwrap();
        let sel = domain.default_selection();
        assert_eq!(sel.region, "Bandung");
        assert_eq!(sel.condition, "Baik");
        assert_eq!(sel.year, 2021);
    }
}
