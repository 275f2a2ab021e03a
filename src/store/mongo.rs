//! Translation of predicate trees into MongoDB aggregation stages
//!
//! The output is plain extended JSON so it can be handed to any driver.
//! Every predicate becomes a `$expr` aggregation expression; range
//! comparisons carry a type guard so mixed-type comparisons are false
//! instead of following BSON cross-type ordering.

use serde_json::{json, Map, Value};

use crate::model::QuestionValue;
use crate::planner::{
    CompareOp, DocumentField, ElementTest, FetchOptions, Literal, Operand, Predicate, Subject,
};

const ELEMENT: &str = "question";

/// `$match` stage for a predicate
pub fn match_stage(predicate: &Predicate) -> Value {
    json!({ "$match": count_filter(predicate) })
}

/// Filter document usable with `countDocuments`
pub fn count_filter(predicate: &Predicate) -> Value {
    json!({ "$expr": expression(predicate) })
}

/// Full aggregation pipeline: match, sort, skip, limit, project
pub fn pipeline(predicate: &Predicate, options: &FetchOptions) -> Vec<Value> {
    let direction = if options.sort.direction.is_ascending() { 1 } else { -1 };

    let mut sort = Map::new();
    sort.insert(options.sort.field.name().to_string(), json!(direction));

    let mut project = Map::new();
    project.insert("_id".to_string(), json!(0));
    for field in options.projection.fields() {
        project.insert(field.to_string(), json!(1));
    }

    vec![
        match_stage(predicate),
        json!({ "$sort": sort }),
        json!({ "$skip": options.skip }),
        json!({ "$limit": options.limit }),
        json!({ "$project": project }),
    ]
}

/// Aggregation expression for a predicate
pub fn expression(predicate: &Predicate) -> Value {
    match predicate {
        Predicate::And(children) => {
            json!({ "$and": children.iter().map(expression).collect::<Vec<_>>() })
        }
        Predicate::Not(inner) => json!({ "$not": [expression(inner)] }),
        Predicate::Exists { subject, tests } => exists(*subject, tests),
        Predicate::Compare {
            operand,
            op,
            literal,
        } => compare(operand, *op, literal),
    }
}

fn exists(subject: Subject, tests: &[ElementTest]) -> Value {
    let Subject::Questions = subject;
    let conditions: Vec<Value> = tests.iter().map(element_test).collect();

    json!({
        "$anyElementTrue": [{
            "$map": {
                "input": { "$ifNull": ["$questions", []] },
                "as": ELEMENT,
                "in": { "$and": conditions }
            }
        }]
    })
}

fn element_test(test: &ElementTest) -> Value {
    let id = format!("$${}.id", ELEMENT);
    let value = format!("$${}.value", ELEMENT);
    match test {
        ElementTest::IdEquals(expected) => json!({ "$eq": [id, expected] }),
        ElementTest::ValueEquals(expected) => json!({ "$eq": [value, literal_value(expected)] }),
        ElementTest::ValueAbsent => json!({ "$eq": [{ "$ifNull": [value, null] }, null] }),
    }
}

fn compare(operand: &Operand, op: CompareOp, literal: &Literal) -> Value {
    let operator = match op {
        CompareOp::Eq => "$eq",
        CompareOp::Gt => "$gt",
        CompareOp::Lt => "$lt",
    };

    match (operand, literal) {
        (Operand::Field(field), Literal::Timestamp(ts)) => json!({
            operator: [field_path(*field), { "$toDate": ts.to_rfc3339() }]
        }),
        (Operand::Field(field), Literal::Status(status)) => json!({
            operator: [field_path(*field), status.as_str()]
        }),
        (Operand::Max(id), Literal::Value(expected)) => {
            guarded(aggregate("$max", id), operator, expected)
        }
        (Operand::Min(id), Literal::Value(expected)) => {
            guarded(aggregate("$min", id), operator, expected)
        }
        // Shapes the compiler never emits
        _ => json!({ "$literal": false }),
    }
}

/// `$max`/`$min` over the values of questions carrying `id`
fn aggregate(accumulator: &str, id: &str) -> Value {
    json!({
        accumulator: {
            "$map": {
                "input": {
                    "$filter": {
                        "input": { "$ifNull": ["$questions", []] },
                        "as": ELEMENT,
                        "cond": { "$eq": [format!("$${}.id", ELEMENT), id] }
                    }
                },
                "as": ELEMENT,
                "in": format!("$${}.value", ELEMENT)
            }
        }
    })
}

fn guarded(aggregate: Value, operator: &str, expected: &QuestionValue) -> Value {
    let guard = match expected {
        QuestionValue::Number(_) => json!({ "$isNumber": aggregate.clone() }),
        QuestionValue::Text(_) => json!({ "$eq": [{ "$type": aggregate.clone() }, "string"] }),
    };

    json!({ "$and": [guard, { operator: [aggregate, literal_value(expected)] }] })
}

fn literal_value(value: &QuestionValue) -> Value {
    match value {
        QuestionValue::Number(n) => Value::Number(n.clone()),
        QuestionValue::Text(s) => Value::String(s.clone()),
    }
}

fn field_path(field: DocumentField) -> String {
    format!("${}", field.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FilterClause, QuerySpec, SortOrder};
    use crate::planner::{null_guard, QueryPlan};

    #[test]
    fn test_pipeline_stages() {
        let spec = QuerySpec::default()
            .with_limit(20)
            .with_offset(40)
            .with_sort(SortOrder::Desc);
        let plan = QueryPlan::from_spec(&spec);
        let stages = pipeline(&plan.predicate, &plan.fetch);

        assert_eq!(stages.len(), 5);
        assert!(stages[0].get("$match").is_some());
        assert_eq!(stages[1], json!({ "$sort": { "submissionTime": -1 } }));
        assert_eq!(stages[2], json!({ "$skip": 40 }));
        assert_eq!(stages[3], json!({ "$limit": 20 }));
        assert_eq!(
            stages[4],
            json!({ "$project": { "_id": 0, "submissionId": 1, "submissionTime": 1, "questions": 1 } })
        );
    }

    #[test]
    fn test_project_edit_link_on_request() {
        let plan = QueryPlan::from_spec(&QuerySpec::default().with_edit_link());
        let stages = pipeline(&plan.predicate, &plan.fetch);

        assert_eq!(stages[4]["$project"]["editLink"], json!(1));
    }

    #[test]
    fn test_status_expression() {
        let plan = QueryPlan::from_spec(&QuerySpec::default());
        let expr = count_filter(&plan.predicate);

        assert_eq!(
            expr,
            json!({ "$expr": { "$and": [{ "$eq": ["$status", "finished"] }] } })
        );
    }

    #[test]
    fn test_range_comparison_is_type_guarded() {
        let clause = crate::planner::compile_clause(&FilterClause::greater_than("q1", 10));
        let expr = expression(&clause);

        let and = expr["$and"].as_array().unwrap();
        assert!(and[0].get("$isNumber").is_some());
        assert_eq!(and[1]["$gt"][1], json!(10));
        assert!(and[1]["$gt"][0].get("$max").is_some());
    }

    #[test]
    fn test_null_guard_translation() {
        let expr = expression(&null_guard());
        let inner = &expr["$not"][0]["$anyElementTrue"][0]["$map"]["in"]["$and"][0];

        assert_eq!(
            *inner,
            json!({ "$eq": [{ "$ifNull": ["$$question.value", null] }, null] })
        );
    }
}
