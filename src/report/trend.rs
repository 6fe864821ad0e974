//! Trailing monthly trend table
//!
//! Windows are calendar months (first moment through last moment),
//! including the current month. The member column is cumulative - members
//! on the books as of each month's end - while visitor and convert columns
//! count events falling inside each window.

use chrono::{Datelike, NaiveDate};

use crate::entities::{Convert, Member, Visitor};

/// One calendar-month window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    /// Window containing the given day
    pub fn containing(day: NaiveDate) -> Self {
        Self::for_month(day.year(), day.month())
    }

    fn for_month(year: i32, month: u32) -> Self {
        let start = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default();
        let (next_y, next_m) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end = NaiveDate::from_ymd_opt(next_y, next_m, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(start);
        Self {
            year,
            month,
            start,
            end,
        }
    }

    /// Window `back` whole months before this one
    pub fn months_back(&self, back: u32) -> Self {
        let total = self.year * 12 + self.month as i32 - 1 - back as i32;
        Self::for_month(total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
    }

    /// Short display label, e.g. "Mar 2026"
    pub fn label(&self) -> String {
        self.start.format("%b %Y").to_string()
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }
}

/// One row of the trend table
#[derive(Debug, Clone)]
pub struct MonthlyRow {
    pub window: MonthWindow,
    /// Members on the books as of the end of this month (cumulative)
    pub members: usize,
    /// Conversions dated inside this month
    pub converts: usize,
    /// First visits dated inside this month
    pub visitors: usize,
}

/// The trailing trend table, oldest month first
#[derive(Debug, Clone)]
pub struct TrendReport {
    pub rows: Vec<MonthlyRow>,
}

/// Month-over-month growth percentage. Unavailable (None) when the
/// previous value is zero or negative - never a division error, never an
/// infinity.
pub fn growth_pct(curr: usize, prev: usize) -> Option<f64> {
    if prev == 0 {
        return None;
    }
    Some((curr as f64 - prev as f64) / prev as f64 * 100.0)
}

impl TrendReport {
    /// Build the trailing table ending at the month containing `today`
    pub fn build(
        members: &[Member],
        visitors: &[Visitor],
        converts: &[Convert],
        today: NaiveDate,
        months: usize,
    ) -> Self {
        let current = MonthWindow::containing(today);
        let mut rows = Vec::with_capacity(months);

        for back in (0..months as u32).rev() {
            let window = current.months_back(back);
            let members_to_date = members
                .iter()
                .filter(|m| m.created_at.date_naive() <= window.end)
                .count();
            let converts_in_month = converts
                .iter()
                .filter(|c| window.contains(c.date_of_conversion))
                .count();
            let visitors_in_month = visitors
                .iter()
                .filter(|v| window.contains(v.first_visit_date))
                .count();
            rows.push(MonthlyRow {
                window,
                members: members_to_date,
                converts: converts_in_month,
                visitors: visitors_in_month,
            });
        }

        Self { rows }
    }

    fn last_two(&self) -> Option<(&MonthlyRow, &MonthlyRow)> {
        let len = self.rows.len();
        if len < 2 {
            return None;
        }
        Some((&self.rows[len - 2], &self.rows[len - 1]))
    }

    /// Current-vs-previous member growth percentage
    pub fn member_growth(&self) -> Option<f64> {
        self.last_two()
            .and_then(|(prev, curr)| growth_pct(curr.members, prev.members))
    }

    /// Current-vs-previous convert growth percentage
    pub fn convert_growth(&self) -> Option<f64> {
        self.last_two()
            .and_then(|(prev, curr)| growth_pct(curr.converts, prev.converts))
    }

    /// Current-vs-previous visitor growth percentage
    pub fn visitor_growth(&self) -> Option<f64> {
        self.last_two()
            .and_then(|(prev, curr)| growth_pct(curr.visitors, prev.visitors))
    }

    /// Absolute member delta for a row. The first row has no basis for a
    /// delta and reports None.
    pub fn net_growth(&self, index: usize) -> Option<i64> {
        if index == 0 || index >= self.rows.len() {
            return None;
        }
        Some(self.rows[index].members as i64 - self.rows[index - 1].members as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::ServiceGroup;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn member_created(y: i32, m: u32, d: u32) -> Member {
        let mut member = Member::new("M".to_string(), ServiceGroup::Adults);
        let ts = Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap();
        member.created_at = ts;
        member.updated_at = ts;
        member
    }

    fn visitor_on(y: i32, m: u32, d: u32) -> Visitor {
        let mut v = Visitor::new("V".to_string(), ServiceGroup::Adults);
        v.first_visit_date = date(y, m, d);
        v
    }

    fn convert_on(y: i32, m: u32, d: u32) -> Convert {
        let mut c = Convert::new("C".to_string(), ServiceGroup::Adults);
        c.date_of_conversion = date(y, m, d);
        c
    }

    #[test]
    fn test_month_window_bounds() {
        let w = MonthWindow::containing(date(2026, 2, 14));
        assert_eq!(w.start, date(2026, 2, 1));
        assert_eq!(w.end, date(2026, 2, 28));
        assert!(w.contains(date(2026, 2, 1)));
        assert!(w.contains(date(2026, 2, 28)));
        assert!(!w.contains(date(2026, 3, 1)));
    }

    #[test]
    fn test_months_back_crosses_year_boundary() {
        let w = MonthWindow::containing(date(2026, 2, 14));
        let back = w.months_back(3);
        assert_eq!((back.year, back.month), (2025, 11));
        assert_eq!(back.label(), "Nov 2025");
    }

    #[test]
    fn test_member_column_is_cumulative() {
        let members = vec![
            member_created(2026, 3, 10),
            member_created(2026, 5, 2),
            member_created(2026, 7, 20),
        ];
        let report = TrendReport::build(&members, &[], &[], date(2026, 7, 25), 6);

        let counts: Vec<usize> = report.rows.iter().map(|r| r.members).collect();
        // Feb..Jul 2026: the March member shows from March onward, etc.
        assert_eq!(counts, vec![0, 1, 1, 2, 2, 3]);
    }

    #[test]
    fn test_visitor_and_convert_columns_are_window_counts() {
        let visitors = vec![
            visitor_on(2026, 6, 1),
            visitor_on(2026, 6, 30),
            visitor_on(2026, 7, 4),
        ];
        let converts = vec![convert_on(2026, 5, 15), convert_on(2026, 7, 1)];
        let report = TrendReport::build(&[], &visitors, &converts, date(2026, 7, 25), 3);

        let v: Vec<usize> = report.rows.iter().map(|r| r.visitors).collect();
        let c: Vec<usize> = report.rows.iter().map(|r| r.converts).collect();
        assert_eq!(v, vec![0, 2, 1]); // May, Jun, Jul
        assert_eq!(c, vec![1, 0, 1]);
    }

    #[test]
    fn test_growth_pct_unavailable_when_prev_is_zero() {
        assert_eq!(growth_pct(5, 0), None);
        assert_eq!(growth_pct(0, 0), None);
        let some = growth_pct(6, 4).unwrap();
        assert!((some - 50.0).abs() < f64::EPSILON);
        let negative = growth_pct(3, 4).unwrap();
        assert!((negative - -25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_net_growth_first_row_has_no_delta() {
        let members = vec![member_created(2026, 6, 10), member_created(2026, 7, 1)];
        let report = TrendReport::build(&members, &[], &[], date(2026, 7, 25), 3);
        assert_eq!(report.net_growth(0), None);
        assert_eq!(report.net_growth(1), Some(1));
        assert_eq!(report.net_growth(2), Some(1));
        assert_eq!(report.net_growth(99), None);
    }

    #[test]
    fn test_member_growth_from_zero_previous_is_unavailable() {
        // All members created in the current month: previous month count 0
        let members = vec![member_created(2026, 7, 5)];
        let report = TrendReport::build(&members, &[], &[], date(2026, 7, 25), 6);
        assert_eq!(report.member_growth(), None);
    }
}
