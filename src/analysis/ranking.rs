//! Ranks regional rainfall aggregates against London.

use std::cmp::Ordering;
use std::fmt;

/// Named aggregates ranked by descending median rainfall.
///
/// London's median is supplied separately and takes part in the ranking
/// under the plain label `London`; every other entry is presented as the
/// average city of its region. Ties keep the order the entries were given
/// in, with London last among equals.
///
/// # Examples
///
/// ```
/// use rainfall::RaininessRanking;
///
/// let ranking = RaininessRanking::new(
///     5.0,
///     [("North".to_string(), 7.0), ("South".to_string(), 3.0)],
/// );
///
/// let order: Vec<&str> = ranking.entries().iter().map(|(name, _)| name.as_str()).collect();
/// assert_eq!(order, ["North", "London", "South"]);
/// println!("{}", ranking);
/// ```
#[derive(Debug, Clone)]
pub struct RaininessRanking {
    entries: Vec<(String, f64)>,
}

/// Label under which London's own median takes part in the ranking.
const LONDON_LABEL: &str = "London";

impl RaininessRanking {
    /// Ranks the given region medians together with London's.
    pub fn new(
        london_median: f64,
        region_medians: impl IntoIterator<Item = (String, f64)>,
    ) -> Self {
        let mut entries: Vec<(String, f64)> = region_medians.into_iter().collect();
        entries.push((LONDON_LABEL.to_string(), london_median));
        // Stable sort: equal medians keep their given order.
        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        Self { entries }
    }

    /// Entries in rank order, most rain first.
    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }
}

impl fmt::Display for RaininessRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rainfall Ranking by Median Rainfall (in descending order):")?;
        for (rank, (name, median)) in self.entries.iter().enumerate() {
            if name == LONDON_LABEL {
                writeln!(f, "{}. London: {:.2}mm", rank + 1, median)?;
            } else {
                writeln!(f, "{}. Average city in {}: {:.2}mm", rank + 1, name, median)?;
            }
        }
        Ok(())
    }
}
