//! Composable SQL predicates for the listing queries.
//!
//! Clauses carry `?` markers and their bound values side by side. They are
//! numbered only when a statement is finished (see [`crate::query::QueryBuf`]),
//! so the same clause can sit at different parameter positions in the row
//! query and in the count query.

use sea_orm::Value;

use crate::cursor::Cursor;
use crate::options::{Filters, Sort};

/// One SQL boolean fragment with its bound values, in marker order
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub sql: String,
    pub values: Vec<Value>,
}

impl Clause {
    pub fn new(sql: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            values,
        }
    }
}

/// Conjunction of clauses. Empty means "match everything".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Combined predicate: `self` first, then `other`
    pub fn and(&self, other: &Predicate) -> Predicate {
        let mut clauses = self.clauses.clone();
        clauses.extend(other.clauses.iter().cloned());
        Predicate { clauses }
    }

    /// Clauses joined with `AND`, or `None` when there are none
    pub fn sql(&self) -> Option<String> {
        if self.clauses.is_empty() {
            return None;
        }
        Some(
            self.clauses
                .iter()
                .map(|clause| clause.sql.as_str())
                .collect::<Vec<_>>()
                .join(" AND "),
        )
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.clauses.iter().flat_map(|clause| clause.values.iter())
    }
}

/// Filter predicates split by where they must be evaluated
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPredicates {
    /// Row-level conditions (`WHERE`), shared by row and count queries
    pub row_filter: Predicate,
    /// Aggregate conditions (`HAVING`) over the joined ratings
    pub rating: Predicate,
}

pub fn build_filters(filters: &Filters) -> FilterPredicates {
    let mut row_filter = Predicate::default();

    if let Some(min) = filters.price_min {
        row_filter.push(Clause::new("p.price >= ?", vec![min.into()]));
    }
    if let Some(max) = filters.price_max {
        row_filter.push(Clause::new("p.price <= ?", vec![max.into()]));
    }
    if let Some(term) = &filters.search {
        // % and _ inside the term are not escaped
        let pattern = format!("%{term}%");
        row_filter.push(Clause::new(
            "(p.name ILIKE ? OR p.description ILIKE ?)",
            vec![pattern.clone().into(), pattern.into()],
        ));
    }

    let mut rating = Predicate::default();
    if let Some(min_rating) = filters.min_rating {
        rating.push(Clause::new(
            "COALESCE(AVG(r.score), 0) >= ?",
            vec![min_rating.into()],
        ));
    }

    FilterPredicates { row_filter, rating }
}

/// Keyset clause selecting rows strictly after `cursor` under `sort`
pub fn build_cursor(sort: Sort, cursor: Option<&Cursor>) -> Predicate {
    let mut predicate = Predicate::default();
    if let Some(cursor) = cursor {
        predicate.push(Clause::new(
            format!(
                "({}, p.id) {} (?, ?)",
                sort.field.column(),
                sort.order.after_operator()
            ),
            vec![cursor.sort_value.to_value(), cursor.id.into()],
        ));
    }
    predicate
}
