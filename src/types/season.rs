//! The fixed meteorological season table used for seasonal aggregation.

use polars::prelude::{lit, when, DataType, Expr};
use std::fmt;

/// One of the four meteorological seasons.
///
/// The month table is fixed: December–February is Winter, March–May is
/// Spring, June–August is Summer, September–November is Autumn. December is
/// assigned to the Winter of its own calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// Maps a 1-based calendar month to its season.
    ///
    /// Returns `None` for values outside `1..=12`.
    pub fn from_month(month: u32) -> Option<Season> {
        match month {
            12 | 1 | 2 => Some(Season::Winter),
            3..=5 => Some(Season::Spring),
            6..=8 => Some(Season::Summer),
            9..=11 => Some(Season::Autumn),
            _ => None,
        }
    }

    /// Display label, also used as the `season` column value.
    pub fn label(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
        }
    }

    /// Position of the season within a year, Winter first.
    pub fn order(&self) -> u8 {
        match self {
            Season::Winter => 0,
            Season::Spring => 1,
            Season::Summer => 2,
            Season::Autumn => 3,
        }
    }

    /// Expression mapping a month-number column to season labels.
    ///
    /// `month` must evaluate to integers in `1..=12`.
    pub(crate) fn label_expr(month: Expr) -> Expr {
        when(month.clone().eq(lit(12)).or(month.clone().lt(lit(3))))
            .then(lit(Season::Winter.label()))
            .when(month.clone().lt(lit(6)))
            .then(lit(Season::Spring.label()))
            .when(month.lt(lit(9)))
            .then(lit(Season::Summer.label()))
            .otherwise(lit(Season::Autumn.label()))
    }

    /// Expression mapping a month-number column to the season sort position.
    pub(crate) fn order_expr(month: Expr) -> Expr {
        when(month.clone().eq(lit(12)).or(month.clone().lt(lit(3))))
            .then(lit(Season::Winter.order() as i32))
            .when(month.clone().lt(lit(6)))
            .then(lit(Season::Spring.order() as i32))
            .when(month.lt(lit(9)))
            .then(lit(Season::Summer.order() as i32))
            .otherwise(lit(Season::Autumn.order() as i32))
            .cast(DataType::Int32)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which column identifies the series when totalling by season: the per-city
/// key or a previously attached region label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonalGrouping {
    City,
    Region,
}

impl SeasonalGrouping {
    pub(crate) fn column_name(&self) -> &'static str {
        match self {
            SeasonalGrouping::City => "city",
            SeasonalGrouping::Region => "region",
        }
    }
}
