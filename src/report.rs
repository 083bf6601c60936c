//! Projections of a user's ledger entries into report views: category
//! totals, the balance trend for plotting, and CSV export bytes.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, ledger::LedgerEntry};

/// Date format used for CSV rows, e.g. "2024-01-01".
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Totals per spending category across a set of entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryBreakdown {
    /// Total spent on bills.
    pub bills: f64,
    /// Total spent on travel.
    pub travel: f64,
    /// Total miscellaneous spending.
    pub misc: f64,
}

impl CategoryBreakdown {
    /// The total spend across all categories.
    pub fn total(&self) -> f64 {
        self.bills + self.travel + self.misc
    }
}

/// Sum the spending categories across `entries`.
pub fn breakdown(entries: &[LedgerEntry]) -> CategoryBreakdown {
    entries.iter().fold(
        CategoryBreakdown::default(),
        |mut totals, entry| {
            totals.bills += entry.bills;
            totals.travel += entry.travel;
            totals.misc += entry.misc;
            totals
        },
    )
}

/// The most recently submitted entry, for the latest-split view.
///
/// `entries` is expected in insertion order, so this is the last element.
pub fn latest_split(entries: &[LedgerEntry]) -> Option<&LedgerEntry> {
    entries.last()
}

/// The `(date, balance)` pairs for plotting the balance over time, ordered
/// by date ascending.
///
/// The sort is stable: entries submitted on the same day keep their
/// insertion order.
pub fn trend(entries: &[LedgerEntry]) -> Vec<(Date, f64)> {
    let mut points: Vec<(Date, f64)> = entries
        .iter()
        .map(|entry| (entry.date, entry.balance))
        .collect();
    points.sort_by_key(|(date, _)| *date);

    points
}

/// Render `entries` as UTF-8 CSV bytes.
///
/// The header is `date,budget,bills,travel,misc,balance`; the username
/// column is dropped since an export only ever contains one user's rows.
/// Numbers are rendered as plain decimal text.
///
/// # Errors
///
/// Returns an [Error::CsvError] if writing a record failed.
pub fn to_csv(entries: &[LedgerEntry]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer.write_record(["date", "budget", "bills", "travel", "misc", "balance"])?;

    for entry in entries {
        let date = entry
            .date
            .format(DATE_FORMAT)
            .map_err(|error| Error::CsvError(error.to_string()))?;

        writer.write_record([
            date,
            entry.budget.to_string(),
            entry.bills.to_string(),
            entry.travel.to_string(),
            entry.misc.to_string(),
            entry.balance.to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))
}

#[cfg(test)]
mod report_tests {
    use time::macros::date;

    use crate::{auth::Identity, ledger::LedgerEntry};

    use super::{breakdown, latest_split, to_csv, trend};

    fn entry(date: time::Date, budget: f64, bills: f64, travel: f64, misc: f64) -> LedgerEntry {
        LedgerEntry::new(Identity::new("alice"), date, budget, bills, travel, misc)
    }

    #[test]
    fn breakdown_sums_each_category() {
        let entries = vec![
            entry(date!(2024 - 01 - 01), 1000.0, 200.0, 100.0, 50.0),
            entry(date!(2024 - 01 - 02), 1000.0, 50.0, 25.0, 10.0),
        ];

        let totals = breakdown(&entries);

        assert_eq!(totals.bills, 250.0);
        assert_eq!(totals.travel, 125.0);
        assert_eq!(totals.misc, 60.0);
        assert_eq!(totals.total(), 435.0);
    }

    #[test]
    fn breakdown_of_no_entries_is_zero() {
        let totals = breakdown(&[]);

        assert_eq!(totals.total(), 0.0);
    }

    #[test]
    fn latest_split_is_the_last_inserted_entry() {
        let entries = vec![
            entry(date!(2024 - 01 - 02), 1000.0, 200.0, 100.0, 50.0),
            entry(date!(2024 - 01 - 01), 500.0, 10.0, 20.0, 30.0),
        ];

        let latest = latest_split(&entries).unwrap();

        assert_eq!(latest, &entries[1]);
        assert_eq!(latest_split(&[]), None);
    }

    #[test]
    fn trend_orders_by_date_ascending() {
        let entries = vec![
            entry(date!(2024 - 03 - 01), 1000.0, 0.0, 0.0, 0.0),
            entry(date!(2024 - 01 - 01), 1000.0, 400.0, 0.0, 0.0),
            entry(date!(2024 - 02 - 01), 1000.0, 0.0, 300.0, 0.0),
        ];

        let points = trend(&entries);

        assert_eq!(
            points,
            vec![
                (date!(2024 - 01 - 01), 600.0),
                (date!(2024 - 02 - 01), 700.0),
                (date!(2024 - 03 - 01), 1000.0),
            ]
        );
    }

    #[test]
    fn trend_keeps_same_day_entries_in_insertion_order() {
        let entries = vec![
            entry(date!(2024 - 01 - 01), 1000.0, 100.0, 0.0, 0.0),
            entry(date!(2024 - 01 - 01), 1000.0, 200.0, 0.0, 0.0),
        ];

        let points = trend(&entries);

        assert_eq!(points[0].1, 900.0);
        assert_eq!(points[1].1, 800.0);
    }

    #[test]
    fn csv_has_header_plus_one_line_per_entry() {
        let entries = vec![
            entry(date!(2024 - 01 - 01), 1000.0, 200.0, 100.0, 50.0),
            entry(date!(2024 - 01 - 02), 1000.0, 0.0, 0.0, 0.0),
        ];

        let bytes = to_csv(&entries).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3, "want header + 2 rows, got {:?}", lines);
        assert_eq!(lines[0], "date,budget,bills,travel,misc,balance");
        assert_eq!(lines[1], "2024-01-01,1000,200,100,50,650");
        assert_eq!(lines[2], "2024-01-02,1000,0,0,0,1000");
    }

    #[test]
    fn csv_of_no_entries_is_just_the_header() {
        let bytes = to_csv(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(text.lines().collect::<Vec<_>>(), vec![
            "date,budget,bills,travel,misc,balance"
        ]);
    }

    #[test]
    fn csv_keeps_fractional_amounts_as_plain_decimals() {
        let entries = vec![entry(date!(2024 - 01 - 01), 1000.5, 200.25, 0.0, 0.0)];

        let bytes = to_csv(&entries).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text.lines().nth(1).unwrap(),
            "2024-01-01,1000.5,200.25,0,0,800.25"
        );
    }
}
