//! Filter expressions understood by the database query endpoint.
//!
//! A [`Filter`] is a tree of `and` / `or` nodes over property conditions.
//! Compound nodes are built through [`Filter::all`] and [`Filter::any`], which
//! collapse empty nodes to `None`: an absent filter means "no constraint", so
//! an empty compound can never turn into "match nothing".

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Filter {
    And { and: Vec<Filter> },
    Or { or: Vec<Filter> },
    Property(PropertyFilter),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PropertyFilter {
    pub property: String,
    #[serde(flatten)]
    pub condition: Condition,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Relation(ListCondition),
    People(ListCondition),
    Status(SelectCondition),
    Select(SelectCondition),
    RichText(TextCondition),
    Title(TextCondition),
    Date(DateCondition),
    UniqueId(UniqueIdCondition),
    Number(NumberCondition),
}

/// Condition on relation and people lists.
///
/// The emptiness checks carry a flag because the API expects `true` as value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListCondition {
    Contains(String),
    IsEmpty(bool),
    IsNotEmpty(bool),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectCondition {
    Equals(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextCondition {
    Equals(String),
    Contains(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateCondition {
    Equals(NaiveDate),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UniqueIdCondition {
    Equals(u64),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberCondition {
    Equals(f64),
}

impl Filter {
    pub fn property(property: &str, condition: Condition) -> Filter {
        Filter::Property(PropertyFilter {
            property: property.to_owned(),
            condition,
        })
    }

    pub fn relation_contains(property: &str, id: &str) -> Filter {
        Filter::property(property, Condition::Relation(ListCondition::Contains(id.to_owned())))
    }

    pub fn relation_is_empty(property: &str) -> Filter {
        Filter::property(property, Condition::Relation(ListCondition::IsEmpty(true)))
    }

    pub fn relation_is_not_empty(property: &str) -> Filter {
        Filter::property(property, Condition::Relation(ListCondition::IsNotEmpty(true)))
    }

    pub fn people_contains(property: &str, id: &str) -> Filter {
        Filter::property(property, Condition::People(ListCondition::Contains(id.to_owned())))
    }

    pub fn status_equals(property: &str, label: &str) -> Filter {
        Filter::property(property, Condition::Status(SelectCondition::Equals(label.to_owned())))
    }

    pub fn date_equals(property: &str, date: NaiveDate) -> Filter {
        Filter::property(property, Condition::Date(DateCondition::Equals(date)))
    }

    pub fn unique_id_equals(property: &str, number: u64) -> Filter {
        Filter::property(property, Condition::UniqueId(UniqueIdCondition::Equals(number)))
    }

    /// Conjunction of the given parts, skipping unconstrained ones.
    ///
    pub fn all<I>(parts: I) -> Option<Filter>
    where
        I: IntoIterator<Item = Option<Filter>>,
    {
        let mut parts: Vec<Filter> = parts.into_iter().flatten().collect();
        match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(Filter::And { and: parts }),
        }
    }

    /// Disjunction of the given parts. No parts means no constraint.
    ///
    pub fn any<I>(parts: I) -> Option<Filter>
    where
        I: IntoIterator<Item = Filter>,
    {
        let mut parts: Vec<Filter> = parts.into_iter().collect();
        match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(Filter::Or { or: parts }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leaf_serialization() {
        assert_eq!(
            serde_json::to_value(Filter::relation_contains("Sprint", "s1")).unwrap(),
            json!({ "property": "Sprint", "relation": { "contains": "s1" } })
        );
        assert_eq!(
            serde_json::to_value(Filter::relation_is_empty("Sprint")).unwrap(),
            json!({ "property": "Sprint", "relation": { "is_empty": true } })
        );
        assert_eq!(
            serde_json::to_value(Filter::status_equals("Status", "Done")).unwrap(),
            json!({ "property": "Status", "status": { "equals": "Done" } })
        );
        assert_eq!(
            serde_json::to_value(Filter::date_equals(
                "data",
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
            ))
            .unwrap(),
            json!({ "property": "data", "date": { "equals": "2024-02-29" } })
        );
        assert_eq!(
            serde_json::to_value(Filter::unique_id_equals("Sprint ID", 70)).unwrap(),
            json!({ "property": "Sprint ID", "unique_id": { "equals": 70 } })
        );
    }

    #[test]
    fn test_compound_serialization() {
        let filter = Filter::all([
            Filter::any([
                Filter::people_contains("Assignee", "u1"),
                Filter::people_contains("Reviewer", "u1"),
            ]),
            Some(Filter::relation_is_not_empty("Sprint")),
        ])
        .unwrap();
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({ "and": [
                { "or": [
                    { "property": "Assignee", "people": { "contains": "u1" } },
                    { "property": "Reviewer", "people": { "contains": "u1" } }
                ]},
                { "property": "Sprint", "relation": { "is_not_empty": true } }
            ]})
        );
    }

    #[test]
    fn test_empty_compounds_collapse_to_no_constraint() {
        assert_eq!(Filter::all(Vec::new()), None);
        assert_eq!(Filter::all([None, Filter::any(Vec::new())]), None);
        assert_eq!(
            Filter::all([None, Some(Filter::relation_is_empty("Sprint"))]),
            Some(Filter::relation_is_empty("Sprint"))
        );
    }
}
