//! Defines the granularities of rainfall data handled by the collection
//! pipeline and the resampling windows used by the aggregation helpers.

use std::fmt;

/// The time granularity of a rainfall series as served by the weather API.
///
/// Determines which API request section is populated, which variable is
/// requested, and the raw column names of the resulting table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// One precipitation sum per calendar day.
    Daily,
    /// One precipitation sum per hour.
    Hourly,
}

impl Granularity {
    /// Name of the request parameter and response section holding this series.
    pub(crate) fn api_section(&self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Hourly => "hourly",
        }
    }

    /// The precipitation variable requested from the archive API.
    pub(crate) fn api_variable(&self) -> &'static str {
        match self {
            Granularity::Daily => "rain_sum",
            Granularity::Hourly => "rain",
        }
    }

    /// Raw column names of a collected table at this granularity, in order.
    pub(crate) fn schema_column_names(&self) -> [&'static str; 2] {
        match self {
            Granularity::Daily => ["time", "rain_sum"],
            Granularity::Hourly => ["time", "rain"],
        }
    }
}

/// Allows formatting a `Granularity` variant using its API section name.
///
/// # Examples
///
/// ```
/// use rainfall::Granularity;
///
/// assert_eq!(format!("{}", Granularity::Hourly), "hourly");
/// assert_eq!(Granularity::Daily.to_string(), "daily");
/// ```
impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_section())
    }
}

/// Resampling window applied before computing a mean across cities.
///
/// `Daily` keeps the observations as collected; `Monthly` first regroups them
/// into calendar-month totals per city.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationPeriod {
    Daily,
    Monthly,
}
