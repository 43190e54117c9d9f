use std::collections::{BTreeMap, HashMap};

use super::model::Dataset;

/// Number of regions shown in the ranking view.
pub const RANKING_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// View rows
// ---------------------------------------------------------------------------

/// How many observations share one cultivated-area value.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaCount {
    pub area: f64,
    pub count: usize,
}

/// Mean cultivated area for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearMean {
    pub year: i32,
    pub mean: f64,
    /// Rows averaged into `mean`.
    pub count: usize,
}

/// Mean cultivated area for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMean {
    pub region: String,
    pub mean: f64,
    pub count: usize,
}

/// Chart-ready summaries of the whole dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateViews {
    pub distribution: Vec<AreaCount>,
    pub trend: Vec<YearMean>,
    pub ranking: Vec<RegionMean>,
}

impl AggregateViews {
    /// Compute all three views. An empty dataset yields three empty views.
    pub fn compute(dataset: &Dataset) -> Self {
        Self {
            distribution: distribution_view(dataset),
            trend: trend_view(dataset),
            ranking: ranking_view(dataset, RANKING_LIMIT),
        }
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Observation count per distinct area value, ascending by area.
///
/// `-0.0` and `0.0` count as the same value.
pub fn distribution_view(dataset: &Dataset) -> Vec<AreaCount> {
    let mut areas: Vec<f64> = dataset.iter().map(|o| o.area + 0.0).collect();
    areas.sort_by(f64::total_cmp);

    let mut counts: Vec<AreaCount> = Vec::new();
    for area in areas {
        match counts.last_mut() {
            Some(last) if last.area.total_cmp(&area).is_eq() => last.count += 1,
            _ => counts.push(AreaCount { area, count: 1 }),
        }
    }
    counts
}

/// Mean area per year, ascending by year.
pub fn trend_view(dataset: &Dataset) -> Vec<YearMean> {
    let mut sums: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for obs in dataset {
        let entry = sums.entry(obs.year).or_insert((0.0, 0));
        entry.0 += obs.area;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(year, (sum, count))| YearMean {
            year,
            mean: sum / count as f64,
            count,
        })
        .collect()
}

/// Mean area per region, highest first, at most `limit` entries.
///
/// The sort is stable over first-occurrence order, so tied regions keep the
/// order in which they first appear in the dataset.
pub fn ranking_view(dataset: &Dataset, limit: usize) -> Vec<RegionMean> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, f64, usize)> = Vec::new();

    for obs in dataset {
        let slot = *index.entry(obs.region.as_str()).or_insert_with(|| {
            groups.push((obs.region.as_str(), 0.0, 0));
            groups.len() - 1
        });
        groups[slot].1 += obs.area;
        groups[slot].2 += 1;
    }

    let mut ranking: Vec<RegionMean> = groups
        .into_iter()
        .map(|(region, sum, count)| RegionMean {
            region: region.to_string(),
            mean: sum / count as f64,
            count,
        })
        .collect();

    ranking.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    ranking.truncate(limit);
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Observation;

    fn obs(region: &str, year: i32, area: f64) -> Observation {
        Observation::new(region, "Baik", year, area)
    }

    #[test]
    fn test_distribution_counts_sorted_by_area() {
        let ds = Dataset::from_observations(vec![
            obs("A", 2020, 30.0),
            obs("B", 2020, 10.0),
            obs("C", 2021, 30.0),
            obs("D", 2021, 20.0),
        ]);
        assert_eq!(
            distribution_view(&ds),
            vec![
                AreaCount { area: 10.0, count: 1 },
                AreaCount { area: 20.0, count: 1 },
                AreaCount { area: 30.0, count: 2 },
            ]
        );
    }

    #[test]
    fn test_distribution_merges_signed_zeros() {
        let ds = Dataset::from_observations(vec![
            obs("A", 2020, 0.0),
            obs("B", 2020, -0.0),
            obs("C", 2021, 12.5),
        ]);
        let distribution = distribution_view(&ds);

        assert_eq!(distribution.len(), 2);
        assert_eq!(distribution[0].count, 2);
        assert!(distribution[0].area.is_sign_positive());
        assert!(distribution.windows(2).all(|w| w[1].area > w[0].area));
    }

    #[test]
    fn test_trend_keeps_every_row() {
        let ds = Dataset::from_observations(vec![
            obs("A", 2021, 10.0),
            obs("B", 2020, 20.0),
            obs("C", 2021, 30.0),
            obs("A", 2019, 5.0),
            obs("B", 2021, 50.0),
        ]);
        let trend = trend_view(&ds);

        let years: Vec<i32> = trend.iter().map(|t| t.year).collect();
        assert_eq!(years, vec![2019, 2020, 2021]);
        assert_eq!(trend[2].mean, 30.0);

        for point in &trend {
            let rows = ds.iter().filter(|o| o.year == point.year).count();
            assert_eq!(point.count, rows);
        }
        assert_eq!(trend.iter().map(|t| t.count).sum::<usize>(), ds.len());
    }

    #[test]
    fn test_ranking_ties_keep_first_occurrence() {
        // Region means in first-occurrence order: 10, 30, 30, 20, 5.
        let ds = Dataset::from_observations(vec![
            obs("R1", 2020, 10.0),
            obs("R2", 2020, 20.0),
            obs("R3", 2020, 30.0),
            obs("R4", 2020, 20.0),
            obs("R5", 2020, 5.0),
            obs("R2", 2021, 40.0),
        ]);
        let ranking = ranking_view(&ds, RANKING_LIMIT);

        let order: Vec<(&str, f64)> = ranking.iter().map(|r| (r.region.as_str(), r.mean)).collect();
        assert_eq!(
            order,
            vec![("R2", 30.0), ("R3", 30.0), ("R4", 20.0), ("R1", 10.0), ("R5", 5.0)]
        );
    }

    #[test]
    fn test_ranking_truncates_to_limit() {
        let rows: Vec<Observation> = (0..15)
            .map(|i| obs(&format!("Region {i}"), 2020, i as f64))
            .collect();
        let ds = Dataset::from_observations(rows);
        let ranking = ranking_view(&ds, RANKING_LIMIT);

        assert_eq!(ranking.len(), 10);
        assert_eq!(ranking[0].region, "Region 14");
        assert!(ranking.windows(2).all(|w| w[0].mean >= w[1].mean));
        assert!(ranking
            .iter()
            .all(|r| ds.iter().any(|o| o.region == r.region)));
    }

    #[test]
    fn test_empty_dataset_gives_empty_views() {
        assert_eq!(AggregateViews::compute(&Dataset::default()), AggregateViews::default());
    }
}
