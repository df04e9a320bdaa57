use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use super::round1;

/// Roster fields needed to label a ranking row.
#[derive(Debug, Clone)]
pub struct EmployeeInfo {
    pub name: String,
    pub department: String,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct TopPerformer {
    pub id: String,
    #[schema(example = "Sarah Johnson")]
    pub name: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = 4.8)]
    pub score: f64,
}

/// Rank employees by mean review rating within the period.
///
/// Employees whose roster name is missing or blank are dropped silently.
/// The sort is stable, so equal scores keep first-review encounter order.
pub fn top_performers(
    reviews: &[(String, f64)],
    roster: &HashMap<String, EmployeeInfo>,
    limit: usize,
) -> Vec<TopPerformer> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, (f64, i64)> = HashMap::new();
    for (employee_id, rating) in reviews {
        let entry = totals.entry(employee_id.as_str()).or_insert_with(|| {
            order.push(employee_id.as_str());
            (0.0, 0)
        });
        entry.0 += rating;
        entry.1 += 1;
    }

    let mut rows = Vec::new();
    for employee_id in order {
        let Some(info) = roster.get(employee_id) else {
            continue;
        };
        if info.name.trim().is_empty() {
            continue;
        }
        let (sum, count) = totals[employee_id];
        let average = if count > 0 { sum / count as f64 } else { 0.0 };
        rows.push(TopPerformer {
            id: employee_id.to_string(),
            name: info.name.clone(),
            department: info.department.clone(),
            score: round1(average),
        });
    }

    rows.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows.truncate(limit);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(entries: &[(&str, &str, &str)]) -> HashMap<String, EmployeeInfo> {
        entries
            .iter()
            .map(|(id, name, department)| {
                (
                    id.to_string(),
                    EmployeeInfo {
                        name: name.to_string(),
                        department: department.to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn best_average_wins_and_limit_truncates() {
        let reviews = vec![
            ("e1".to_string(), 5.0),
            ("e1".to_string(), 5.0),
            ("e2".to_string(), 3.0),
        ];
        let roster = roster(&[("e1", "Amy", "Engineering"), ("e2", "Bob", "Sales")]);
        let rows = top_performers(&reviews, &roster, 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "e1");
        assert_eq!(rows[0].score, 5.0);
    }

    #[test]
    fn nameless_employees_are_dropped_silently() {
        let reviews = vec![("e1".to_string(), 5.0), ("e2".to_string(), 4.0)];
        let roster = roster(&[("e1", "  ", "Engineering"), ("e2", "Bob", "Sales")]);
        let rows = top_performers(&reviews, &roster, 5);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Bob");
    }

    #[test]
    fn unknown_employees_are_dropped_silently() {
        let reviews = vec![("ghost".to_string(), 5.0)];
        let rows = top_performers(&reviews, &HashMap::new(), 5);
        assert!(rows.is_empty());
    }

    #[test]
    fn score_is_the_rounded_mean() {
        let reviews = vec![
            ("e1".to_string(), 4.0),
            ("e1".to_string(), 5.0),
            ("e1".to_string(), 4.0),
        ];
        let roster = roster(&[("e1", "Amy", "QA")]);
        let rows = top_performers(&reviews, &roster, 5);
        assert_eq!(rows[0].score, 4.3);
    }

    #[test]
    fn ties_keep_encounter_order() {
        let reviews = vec![
            ("e2".to_string(), 4.0),
            ("e1".to_string(), 4.0),
            ("e3".to_string(), 4.0),
        ];
        let roster = roster(&[("e1", "Amy", "A"), ("e2", "Bob", "B"), ("e3", "Cal", "C")]);
        let rows = top_performers(&reviews, &roster, 5);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["e2", "e1", "e3"]);
    }

    #[test]
    fn rerunning_on_the_same_input_is_identical() {
        let reviews = vec![("e1".to_string(), 4.0), ("e2".to_string(), 4.5)];
        let roster = roster(&[("e1", "Amy", "A"), ("e2", "Bob", "B")]);
        let first = top_performers(&reviews, &roster, 5);
        let second = top_performers(&reviews, &roster, 5);
        assert_eq!(first, second);
    }
}
