//! Request validation for the product endpoints.
//!
//! Every field has one parser and an ordered list of named rules. Fields are
//! checked in a fixed order and each reports at most its first failure, so the
//! same bad request always produces the same violations in the same order.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{ValidationError, ValidationErrors};

use crate::options::{Filters, ListOptions, Pagination, Sort, SortField, SortOrder};

pub const MAX_SEARCH_LEN: usize = 100;
pub const MAX_LIMIT: i64 = 100;

/// Raw query string of `GET /products`; every value is kept as text until validated.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListProductsQuery {
    /// `price` or `created_at` (default `created_at`)
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default `desc`)
    pub order: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    /// Case-insensitive substring of name or description
    pub search: Option<String>,
    /// Minimum average rating, 1-5
    pub min_score: Option<String>,
    /// Page size, 1-100 (default 20)
    pub limit: Option<String>,
    /// `next_cursor` of the previous page, comma separated
    pub cursor: Option<String>,
}

/// One failed rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Violation {
    pub field: &'static str,
    pub rule: &'static str,
    pub message: String,
}

impl Violation {
    fn new(field: &'static str, rule: &'static str, detail: &str) -> Self {
        Self {
            field,
            rule,
            message: format!("invalid '{field}' value: {detail}"),
        }
    }
}

/// Violations in evaluation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
    pub fn single(field: &'static str, rule: &'static str, message: impl Into<String>) -> Self {
        Self(vec![Violation {
            field,
            rule,
            message: message.into(),
        }])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|v| v.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl From<Violations> for ValidationErrors {
    fn from(violations: Violations) -> Self {
        let mut errors = ValidationErrors::new();
        for violation in violations.0 {
            errors.add(
                violation.field,
                ValidationError::new(violation.rule).with_message(Cow::Owned(violation.message)),
            );
        }
        errors
    }
}

struct Rule<T> {
    name: &'static str,
    /// Failure detail, `None` when the value passes
    check: fn(&T) -> Option<&'static str>,
}

struct Field<T: 'static> {
    name: &'static str,
    parse_rule: &'static str,
    parse_detail: &'static str,
    parse: fn(&str) -> Option<T>,
    rules: &'static [Rule<T>],
}

impl<T: 'static> Field<T> {
    fn evaluate(&self, raw: Option<&str>, violations: &mut Vec<Violation>) -> Option<T> {
        let raw = raw.filter(|value| !value.trim().is_empty())?;

        let Some(value) = (self.parse)(raw) else {
            violations.push(Violation::new(self.name, self.parse_rule, self.parse_detail));
            return None;
        };

        if let Some((rule, detail)) = self
            .rules
            .iter()
            .find_map(|rule| (rule.check)(&value).map(|detail| (rule.name, detail)))
        {
            violations.push(Violation::new(self.name, rule, detail));
            return None;
        }

        Some(value)
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

const NON_NEGATIVE: Rule<f64> = Rule {
    name: "gte",
    check: |n| (*n < 0.0).then_some("must be greater than or equal to 0"),
};

const SORT_BY: Field<SortField> = Field {
    name: "sortBy",
    parse_rule: "one_of",
    parse_detail: "must be one of: price, created_at",
    parse: |raw| raw.trim().parse().ok(),
    rules: &[],
};

const ORDER: Field<SortOrder> = Field {
    name: "order",
    parse_rule: "one_of",
    parse_detail: "must be one of: asc, desc",
    parse: |raw| raw.trim().parse().ok(),
    rules: &[],
};

const PRICE_MIN: Field<f64> = Field {
    name: "priceMin",
    parse_rule: "number",
    parse_detail: "must be a number",
    parse: parse_number,
    rules: &[NON_NEGATIVE],
};

const PRICE_MAX: Field<f64> = Field {
    name: "priceMax",
    parse_rule: "number",
    parse_detail: "must be a number",
    parse: parse_number,
    rules: &[NON_NEGATIVE],
};

const SEARCH: Field<String> = Field {
    name: "search",
    parse_rule: "string",
    parse_detail: "must be a string",
    parse: |raw| Some(raw.to_string()),
    rules: &[Rule {
        name: "length",
        check: |s| {
            let len = s.chars().count();
            (!(1..=MAX_SEARCH_LEN).contains(&len)).then_some("must be between 1 and 100 characters")
        },
    }],
};

const MIN_SCORE: Field<i32> = Field {
    name: "minScore",
    parse_rule: "integer",
    parse_detail: "must be an integer",
    parse: |raw| raw.trim().parse().ok(),
    rules: &[Rule {
        name: "range",
        check: |n| (!(1..=5).contains(n)).then_some("must be between 1 and 5"),
    }],
};

const LIMIT: Field<i64> = Field {
    name: "limit",
    parse_rule: "integer",
    parse_detail: "must be an integer",
    parse: |raw| raw.trim().parse().ok(),
    rules: &[Rule {
        name: "range",
        check: |n| (!(1..=MAX_LIMIT).contains(n)).then_some("must be between 1 and 100"),
    }],
};

/// Validate a raw listing query into [`ListOptions`]
pub fn validate_list_query(query: &ListProductsQuery) -> Result<ListOptions, Violations> {
    let mut violations = Vec::new();

    let sort_by = SORT_BY.evaluate(query.sort_by.as_deref(), &mut violations);
    let order = ORDER.evaluate(query.order.as_deref(), &mut violations);
    let price_min = PRICE_MIN.evaluate(query.price_min.as_deref(), &mut violations);
    let price_max = PRICE_MAX.evaluate(query.price_max.as_deref(), &mut violations);
    let search = SEARCH.evaluate(query.search.as_deref(), &mut violations);
    let min_rating = MIN_SCORE.evaluate(query.min_score.as_deref(), &mut violations);
    let limit = LIMIT.evaluate(query.limit.as_deref(), &mut violations);

    if let (Some(min), Some(max)) = (price_min, price_max) {
        if max < min {
            violations.push(Violation::new(
                PRICE_MAX.name,
                "gte_field",
                "must be greater than or equal to priceMin",
            ));
        }
    }

    if !violations.is_empty() {
        return Err(Violations(violations));
    }

    let cursor = query
        .cursor
        .as_deref()
        .map(|raw| raw.split(',').map(str::to_string).collect());

    Ok(ListOptions {
        filters: Filters {
            price_min,
            price_max,
            search,
            min_rating,
        },
        sort: Sort::new(sort_by.unwrap_or_default(), order.unwrap_or_default()),
        pagination: Pagination { limit, cursor },
    })
}

/// Parse the `{id}` path segment of `GET /products/{id}`
pub fn parse_product_id(raw: &str) -> Result<i64, Violations> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Violations::single("id", "integer", "Invalid product ID format"))
}
