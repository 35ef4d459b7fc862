use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::models::TransactionRecord;

const AMOUNT_FIELD: usize = 3;
const DATE_FIELD: usize = 0;

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

/// Parse a statement amount such as `-1.234,56`, `25,40` or `12.5`.
/// Blank or unreadable amounts count as zero.
pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.trim().replace(['€', ' ', '"'], "");
    let s = if s.contains(',') {
        s.replace('.', "").replace(',', ".")
    } else {
        s
    };
    s.parse().unwrap_or(0.0)
}

/// Booking dates come as `dd-mm-yyyy` or `dd/mm/yyyy`; ISO dates are accepted too.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    ["%d-%m-%Y", "%d/%m/%Y", "%Y-%m-%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Which records a summary covers. Bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryFilter {
    pub year: Option<i32>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl SummaryFilter {
    fn accepts(&self, date: NaiveDate) -> bool {
        self.year.map_or(true, |y| date.year() == y)
            && self.from.map_or(true, |from| date >= from)
            && self.to.map_or(true, |to| date <= to)
    }
}

// ---------------------------------------------------------------------------
// summarize
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// Empty for uncategorized records.
    pub category: String,
    /// Sum of spent amounts, as a positive number.
    pub total: f64,
    pub pct: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub transactions: usize,
    /// Records left out because their booking date could not be read.
    pub undated: usize,
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
    /// Share of income not spent, in percent. Zero without income.
    pub savings_rate: f64,
    /// Expense categories, largest first.
    pub expenses_by_category: Vec<CategoryTotal>,
    /// Years present in the input, newest first.
    pub years: Vec<i32>,
}

pub fn summarize(records: &[TransactionRecord], filter: &SummaryFilter) -> Summary {
    let mut summary = Summary::default();
    let mut by_category: HashMap<&str, (f64, usize)> = HashMap::new();

    for record in records {
        let Some(date) = parse_date(&record.fields[DATE_FIELD]) else {
            summary.undated += 1;
            continue;
        };
        if !summary.years.contains(&date.year()) {
            summary.years.push(date.year());
        }
        if !filter.accepts(date) {
            continue;
        }
        summary.transactions += 1;
        let amount = parse_amount(&record.fields[AMOUNT_FIELD]);
        if amount > 0.0 {
            summary.income += amount;
        } else if amount < 0.0 {
            summary.expenses += amount.abs();
            let entry = by_category.entry(record.category.as_str()).or_default();
            entry.0 += amount.abs();
            entry.1 += 1;
        }
    }

    summary.years.sort_unstable_by(|a, b| b.cmp(a));
    summary.net = summary.income - summary.expenses;
    if summary.income > 0.0 {
        summary.savings_rate = summary.net / summary.income * 100.0;
    }

    let total = summary.expenses;
    summary.expenses_by_category = by_category
        .into_iter()
        .map(|(category, (sum, count))| CategoryTotal {
            category: category.to_string(),
            total: sum,
            pct: if total > 0.0 { sum / total * 100.0 } else { 0.0 },
            count,
        })
        .collect();
    summary.expenses_by_category.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    summary
}
