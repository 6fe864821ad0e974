//! Dashboard stats block

use chrono::NaiveDate;

use crate::core::entity::ServiceGroup;
use crate::entities::{Convert, Member, Visitor};

use super::trend::MonthWindow;

/// The headline numbers shown by `flock status`
#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub total_members: usize,
    pub children_count: usize,
    pub teens_count: usize,
    pub youth_count: usize,
    pub adults_count: usize,
    /// First visits dated in the current month
    pub new_visitors_this_month: usize,
    /// Conversions dated in the current month
    pub new_converts_this_month: usize,
    /// Member growth vs. the end of last month, rounded; None when last
    /// month had no members to compare against
    pub members_growth_pct: Option<i64>,
    /// Visitors still pending follow-up
    pub pending_follow_ups: usize,
}

impl DashboardStats {
    pub fn build(
        members: &[Member],
        visitors: &[Visitor],
        converts: &[Convert],
        today: NaiveDate,
    ) -> Self {
        let month = MonthWindow::containing(today);
        let prev_month_end = month.months_back(1).end;

        let count_group = |group: ServiceGroup| {
            members
                .iter()
                .filter(|m| m.service_category == group)
                .count()
        };

        let total_members = members.len();
        let members_prev = members
            .iter()
            .filter(|m| m.created_at.date_naive() <= prev_month_end)
            .count();
        let members_growth_pct = if members_prev > 0 {
            let pct =
                (total_members as f64 - members_prev as f64) / members_prev as f64 * 100.0;
            Some(pct.round() as i64)
        } else {
            None
        };

        Self {
            total_members,
            children_count: count_group(ServiceGroup::Children),
            teens_count: count_group(ServiceGroup::Teens),
            youth_count: count_group(ServiceGroup::Youth),
            adults_count: count_group(ServiceGroup::Adults),
            new_visitors_this_month: visitors
                .iter()
                .filter(|v| v.first_visit_date >= month.start)
                .count(),
            new_converts_this_month: converts
                .iter()
                .filter(|c| c.date_of_conversion >= month.start)
                .count(),
            members_growth_pct,
            pending_follow_ups: visitors
                .iter()
                .filter(|v| v.follow_up == crate::entities::VisitorFollowUp::Pending)
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_stats_counts_groups_and_month_windows() {
        let mut m1 = Member::new("A".to_string(), ServiceGroup::Children);
        let ts = Utc.with_ymd_and_hms(2026, 6, 10, 9, 0, 0).unwrap();
        m1.created_at = ts;
        let mut m2 = Member::new("B".to_string(), ServiceGroup::Adults);
        m2.created_at = Utc.with_ymd_and_hms(2026, 7, 2, 9, 0, 0).unwrap();

        let mut v = Visitor::new("V".to_string(), ServiceGroup::Adults);
        v.first_visit_date = date(2026, 7, 3);
        let mut v_old = Visitor::new("W".to_string(), ServiceGroup::Adults);
        v_old.first_visit_date = date(2026, 5, 3);

        let mut c = Convert::new("C".to_string(), ServiceGroup::Adults);
        c.date_of_conversion = date(2026, 7, 4);

        let stats = DashboardStats::build(
            &[m1, m2],
            &[v, v_old],
            &[c],
            date(2026, 7, 20),
        );

        assert_eq!(stats.total_members, 2);
        assert_eq!(stats.children_count, 1);
        assert_eq!(stats.adults_count, 1);
        assert_eq!(stats.new_visitors_this_month, 1);
        assert_eq!(stats.new_converts_this_month, 1);
        // One member existed by end of June, two now: +100%
        assert_eq!(stats.members_growth_pct, Some(100));
        assert_eq!(stats.pending_follow_ups, 2);
    }

    #[test]
    fn test_growth_unavailable_without_prior_members() {
        let mut m = Member::new("A".to_string(), ServiceGroup::Adults);
        m.created_at = Utc.with_ymd_and_hms(2026, 7, 2, 9, 0, 0).unwrap();
        let stats = DashboardStats::build(&[m], &[], &[], date(2026, 7, 20));
        assert_eq!(stats.members_growth_pct, None);
    }
}
