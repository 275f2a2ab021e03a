//! Explain plan output
//!
//! Produces deterministic, human-readable explain output for a compiled
//! query plan.

use std::fmt;

use serde::Serialize;

use super::ast::Predicate;
use super::plan::QueryPlan;

/// Explain plan output
#[derive(Debug, Clone, Serialize)]
pub struct ExplainPlan {
    /// Predicate tree, one node per line, indented by depth
    pub predicate: Vec<String>,
    /// Sort description
    pub sort: String,
    pub skip: u64,
    pub limit: u32,
    /// Projected field names
    pub projection: Vec<&'static str>,
    /// True when the predicate can never match
    pub matches_nothing: bool,
}

impl ExplainPlan {
    /// Creates an explain plan from a query plan
    pub fn from_plan(plan: &QueryPlan) -> Self {
        let mut predicate = Vec::new();
        render(&plan.predicate, 0, &mut predicate);

        Self {
            predicate,
            sort: format!(
                "{} {}",
                plan.fetch.sort.field.name(),
                plan.fetch.sort.direction.as_str()
            ),
            skip: plan.fetch.skip,
            limit: plan.fetch.limit,
            projection: plan.fetch.projection.fields(),
            matches_nothing: contains_never(&plan.predicate),
        }
    }
}

fn render(predicate: &Predicate, depth: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    match predicate {
        Predicate::And(children) if !children.is_empty() => {
            out.push(format!("{}AND", indent));
            for child in children {
                render(child, depth + 1, out);
            }
        }
        Predicate::Not(inner) if !predicate.is_never() => {
            out.push(format!("{}NOT", indent));
            render(inner, depth + 1, out);
        }
        _ if predicate.is_never() => out.push(format!("{}FALSE", indent)),
        leaf => out.push(format!("{}{}", indent, leaf)),
    }
}

fn contains_never(predicate: &Predicate) -> bool {
    if predicate.is_never() {
        return true;
    }
    match predicate {
        Predicate::And(children) => children.iter().any(contains_never),
        _ => false,
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;
        writeln!(f, "Predicate:")?;
        for line in &self.predicate {
            writeln!(f, "  {}", line)?;
        }
        writeln!(f, "Sort: {}", self.sort)?;
        writeln!(f, "Skip: {}", self.skip)?;
        writeln!(f, "Limit: {}", self.limit)?;
        writeln!(f, "Projection: {}", self.projection.join(", "))?;
        if self.matches_nothing {
            writeln!(f, "Warning: predicate matches no documents")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClauseCondition, FilterClause, QuerySpec, QuestionValue, SortOrder};

    #[test]
    fn test_explain_filtered_plan() {
        let spec = QuerySpec::default()
            .with_sort(SortOrder::Desc)
            .with_filter(FilterClause::greater_than("q1", 10));
        let explain = ExplainPlan::from_plan(&QueryPlan::from_spec(&spec));

        assert_eq!(explain.sort, "submissionTime desc");
        assert_eq!(explain.limit, 150);
        assert!(!explain.matches_nothing);

        let output = format!("{}", explain);
        assert!(output.contains("MAX(questions[id == \"q1\"].value) > 10"));
        assert!(output.contains("NOT"));
        assert!(output.contains("value IS NULL"));
    }

    #[test]
    fn test_explain_flags_never() {
        let mut spec = QuerySpec::default();
        spec.filters = Some(vec![FilterClause {
            id: "q1".into(),
            condition: ClauseCondition::Unrecognized("contains".into()),
            value: QuestionValue::from("x"),
        }]);
        let explain = ExplainPlan::from_plan(&QueryPlan::from_spec(&spec));

        assert!(explain.predicate.iter().any(|l| l.trim() == "FALSE"));
    }

    #[test]
    fn test_explain_deterministic() {
        let spec = QuerySpec::default().with_filter(FilterClause::equals("q1", "blue"));
        let plan = QueryPlan::from_spec(&spec);
        let explain1 = format!("{}", ExplainPlan::from_plan(&plan));
        let explain2 = format!("{}", ExplainPlan::from_plan(&plan));

        assert_eq!(explain1, explain2);
    }
}
