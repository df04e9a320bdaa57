use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use super::round1;

/// Roster entry as the rollup needs it. An empty department label is a
/// valid group: employees with no department set.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub id: String,
    pub department: String,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRow {
    #[schema(example = "Engineering")]
    pub name: String,
    #[schema(example = 42)]
    pub employees: i64,
    #[schema(example = 94.5)]
    pub avg_attendance: f64,
    #[schema(example = 88.2)]
    pub avg_performance: f64,
}

/// Per-department attendance and performance rollup over one period.
///
/// `attendance` is the employee id of every event in the period; `reviews`
/// pairs employee ids with ratings. Events whose employee id is missing
/// from the roster fall into the unlabeled group.
pub fn department_rollup(
    roster: &[RosterEntry],
    attendance: &[String],
    reviews: &[(String, f64)],
    period_days: i64,
) -> Vec<DepartmentRow> {
    // group counts in roster encounter order so equal-sized departments
    // keep a stable relative position after the sort
    let mut group_order: Vec<String> = Vec::new();
    let mut group_counts: HashMap<String, i64> = HashMap::new();
    let mut employee_dept: HashMap<&str, &str> = HashMap::new();
    for entry in roster {
        if !group_counts.contains_key(&entry.department) {
            group_order.push(entry.department.clone());
        }
        *group_counts.entry(entry.department.clone()).or_insert(0) += 1;
        employee_dept.insert(entry.id.as_str(), entry.department.as_str());
    }

    let mut attendance_counts: HashMap<&str, i64> = HashMap::new();
    for employee_id in attendance {
        let dept = employee_dept
            .get(employee_id.as_str())
            .copied()
            .unwrap_or("");
        *attendance_counts.entry(dept).or_insert(0) += 1;
    }

    let mut rating_sums: HashMap<&str, (f64, i64)> = HashMap::new();
    for (employee_id, rating) in reviews {
        let dept = employee_dept
            .get(employee_id.as_str())
            .copied()
            .unwrap_or("");
        let entry = rating_sums.entry(dept).or_insert((0.0, 0));
        entry.0 += rating;
        entry.1 += 1;
    }

    let mut rows = Vec::with_capacity(group_order.len());
    for dept in group_order {
        let employee_count = group_counts[&dept];
        if employee_count == 0 {
            // unreachable given the grouping above, retained as a guard
            continue;
        }

        let events = attendance_counts.get(dept.as_str()).copied().unwrap_or(0);
        let attendance_pct = (events as f64 / (employee_count as f64 * period_days as f64) * 100.0)
            .clamp(0.0, 100.0);

        let (sum, count) = rating_sums.get(dept.as_str()).copied().unwrap_or((0.0, 0));
        let avg_rating = if count > 0 { sum / count as f64 } else { 0.0 };
        let performance_pct = (avg_rating / 5.0 * 100.0).clamp(0.0, 100.0);

        rows.push(DepartmentRow {
            name: dept,
            employees: employee_count,
            avg_attendance: round1(attendance_pct),
            avg_performance: round1(performance_pct),
        });
    }

    rows.sort_by(|a, b| b.employees.cmp(&a.employees));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, department: &str) -> RosterEntry {
        RosterEntry {
            id: id.to_string(),
            department: department.to_string(),
        }
    }

    #[test]
    fn idle_department_reports_zeros_not_errors() {
        let roster = vec![entry("e1", "Finance")];
        let rows = department_rollup(&roster, &[], &[], 30);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].avg_attendance, 0.0);
        assert_eq!(rows[0].avg_performance, 0.0);
    }

    #[test]
    fn rows_sort_by_headcount_descending() {
        let roster = vec![
            entry("e1", "HR"),
            entry("e2", "Engineering"),
            entry("e3", "Engineering"),
            entry("e4", "Engineering"),
            entry("e5", "Sales"),
            entry("e6", "Sales"),
        ];
        let rows = department_rollup(&roster, &[], &[], 7);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Engineering", "Sales", "HR"]);
    }

    #[test]
    fn attendance_is_normalized_by_headcount_and_days() {
        let roster = vec![entry("e1", "Ops"), entry("e2", "Ops")];
        // 7 events over 2 employees x 7 days = 50%
        let attendance: Vec<String> = (0..7)
            .map(|i| if i % 2 == 0 { "e1" } else { "e2" }.to_string())
            .collect();
        let rows = department_rollup(&roster, &attendance, &[], 7);
        assert_eq!(rows[0].avg_attendance, 50.0);
    }

    #[test]
    fn performance_is_rating_share_of_five() {
        let roster = vec![entry("e1", "QA")];
        let reviews = vec![("e1".to_string(), 4.0), ("e1".to_string(), 5.0)];
        let rows = department_rollup(&roster, &[], &reviews, 30);
        assert_eq!(rows[0].avg_performance, 90.0);
    }

    #[test]
    fn unlabeled_department_is_a_valid_group() {
        let roster = vec![entry("e1", ""), entry("e2", "HR")];
        let reviews = vec![("e1".to_string(), 5.0)];
        let rows = department_rollup(&roster, &[], &reviews, 30);
        let unlabeled = rows.iter().find(|r| r.name.is_empty()).unwrap();
        assert_eq!(unlabeled.employees, 1);
        assert_eq!(unlabeled.avg_performance, 100.0);
    }

    #[test]
    fn events_for_unknown_employees_do_not_panic() {
        let roster = vec![entry("e1", "HR")];
        let attendance = vec!["ghost".to_string()];
        let rows = department_rollup(&roster, &attendance, &[], 30);
        // the ghost event lands in the unlabeled group, which has no
        // employees, so only HR is emitted
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "HR");
        assert_eq!(rows[0].avg_attendance, 0.0);
    }

    #[test]
    fn attendance_is_clamped_at_one_hundred() {
        let roster = vec![entry("e1", "HR")];
        let attendance = vec!["e1".to_string(); 10];
        let rows = department_rollup(&roster, &attendance, &[], 1);
        assert_eq!(rows[0].avg_attendance, 100.0);
    }
}
