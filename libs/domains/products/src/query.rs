//! SQL assembly for the listing, count and single-item queries.

use sea_orm::{DbBackend, Statement, Value};

use crate::cursor::Cursor;
use crate::options::{ListOptions, Sort};
use crate::predicate::{FilterPredicates, Predicate, build_cursor, build_filters};

/// Incrementally built SQL text plus its bound values.
///
/// Fragments use `?` as the placeholder marker; [`QueryBuf::build`] renders
/// them as `$1..$n` by position. Fragments must not contain a literal `?`.
#[derive(Debug, Default)]
pub struct QueryBuf {
    sql: String,
    values: Vec<Value>,
}

impl QueryBuf {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            values: Vec::new(),
        }
    }

    /// Appends a raw fragment. Every `?` in `sql` is read as a placeholder and
    /// must be matched by a value pushed through [`QueryBuf::push_bind`] or
    /// [`QueryBuf::push_predicate`]; only debug builds check the count.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    pub fn push_bind(&mut self, value: impl Into<Value>) -> &mut Self {
        self.sql.push('?');
        self.values.push(value.into());
        self
    }

    /// Appends ` <keyword> <predicate>` unless the predicate is empty
    pub fn push_predicate(&mut self, keyword: &str, predicate: &Predicate) -> &mut Self {
        if let Some(sql) = predicate.sql() {
            self.sql.push(' ');
            self.sql.push_str(keyword);
            self.sql.push(' ');
            self.sql.push_str(&sql);
            self.values.extend(predicate.values().cloned());
        }
        self
    }

    pub fn sql(&self) -> String {
        let mut rendered = String::with_capacity(self.sql.len() + self.values.len() * 2);
        let mut position = 0;
        for ch in self.sql.chars() {
            if ch == '?' {
                position += 1;
                rendered.push('$');
                rendered.push_str(&position.to_string());
            } else {
                rendered.push(ch);
            }
        }
        debug_assert_eq!(position, self.values.len(), "placeholder count mismatch");
        rendered
    }

    pub fn build(self) -> Statement {
        let sql = self.sql();
        Statement::from_sql_and_values(DbBackend::Postgres, sql, self.values)
    }
}

const LIST_SELECT: &str = "SELECT p.id, p.name, p.price, p.created_at, \
c.id AS category_id, c.name AS category_name, \
img.url AS image_url, img.alt_text AS image_alt_text, \
ROUND(COALESCE(AVG(r.score), 0), 2)::float8 AS average_rating \
FROM products p \
LEFT JOIN categories c ON c.id = p.category_id \
LEFT JOIN LATERAL (\
SELECT pi.url, pi.alt_text FROM product_images pi \
WHERE pi.product_id = p.id ORDER BY pi.id LIMIT 1\
) img ON TRUE \
LEFT JOIN ratings r ON r.product_id = p.id";

const LIST_GROUP_BY: &str = " GROUP BY p.id, c.id, img.url, img.alt_text";

const GET_SELECT: &str = "SELECT p.id, p.name, p.description, p.price, p.created_at, \
c.id AS category_id, c.name AS category_name, \
COALESCE(\
JSON_AGG(JSON_BUILD_OBJECT('url', pi.url, 'alt_text', pi.alt_text) ORDER BY pi.id) \
FILTER (WHERE pi.id IS NOT NULL), '[]'::json\
) AS images, \
COALESCE(rs.avg_score, 0)::float8 AS average_rating \
FROM products p \
LEFT JOIN categories c ON c.id = p.category_id \
LEFT JOIN product_images pi ON pi.product_id = p.id \
LEFT JOIN (\
SELECT product_id, AVG(score) AS avg_score FROM ratings GROUP BY product_id\
) rs ON rs.product_id = p.id";

/// Both statements of one listing call, sharing the same filter predicates
#[derive(Debug)]
pub struct ListPlan {
    pub rows: Statement,
    pub count: Statement,
    pub limit: u64,
    pub sort: Sort,
}

pub fn plan_list(options: &ListOptions) -> ListPlan {
    let sort = options.sort;
    let limit = options.pagination.effective_limit();
    let filters = build_filters(&options.filters);
    let cursor = options
        .pagination
        .cursor
        .as_deref()
        .and_then(|parts| Cursor::decode(parts, sort.field));

    ListPlan {
        rows: rows_statement(&filters, sort, cursor.as_ref(), limit),
        count: count_statement(&filters),
        limit,
        sort,
    }
}

/// Page query: filters and cursor in `WHERE`, rating in `HAVING`, then the
/// compound `(sort column, id)` order and the page limit.
pub fn rows_statement(
    filters: &FilterPredicates,
    sort: Sort,
    cursor: Option<&Cursor>,
    limit: u64,
) -> Statement {
    let keyset = build_cursor(sort, cursor);
    let direction = sort.order.keyword();

    let mut query = QueryBuf::new(LIST_SELECT);
    query
        .push_predicate("WHERE", &filters.row_filter.and(&keyset))
        .push(LIST_GROUP_BY)
        .push_predicate("HAVING", &filters.rating)
        .push(&format!(
            " ORDER BY {} {direction}, p.id {direction} LIMIT ",
            sort.field.column()
        ))
        .push_bind(limit as i64);
    query.build()
}

/// Total matching rows. With a rating threshold the groups passing `HAVING`
/// are counted, so the ratings join cannot inflate the total.
pub fn count_statement(filters: &FilterPredicates) -> Statement {
    if filters.rating.is_empty() {
        let mut query = QueryBuf::new("SELECT COUNT(*) AS total FROM products p");
        query.push_predicate("WHERE", &filters.row_filter);
        return query.build();
    }

    let mut query = QueryBuf::new(
        "SELECT COUNT(*) AS total FROM (\
SELECT p.id FROM products p LEFT JOIN ratings r ON r.product_id = p.id",
    );
    query
        .push_predicate("WHERE", &filters.row_filter)
        .push(" GROUP BY p.id")
        .push_predicate("HAVING", &filters.rating)
        .push(") AS matched");
    query.build()
}

/// Full record for one product id
pub fn get_statement(id: i64) -> Statement {
    let mut query = QueryBuf::new(GET_SELECT);
    query
        .push(" WHERE p.id = ")
        .push_bind(id)
        .push(" GROUP BY p.id, c.id, rs.avg_score");
    query.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Filters, SortField, SortOrder};

    fn values(statement: &Statement) -> Vec<Value> {
        statement
            .values
            .as_ref()
            .map(|values| values.0.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_query_buf_numbers_placeholders_by_position() {
        let mut query = QueryBuf::new("SELECT 1 WHERE a = ");
        query.push_bind(1).push(" AND b IN (?, ?)");
        query.values.push(2.into());
        query.values.push(3.into());

        let statement = query.build();
        assert_eq!(statement.sql, "SELECT 1 WHERE a = $1 AND b IN ($2, $3)");
        assert_eq!(values(&statement).len(), 3);
    }

    #[test]
    fn test_default_listing() {
        let plan = plan_list(&ListOptions::default());

        assert_eq!(plan.limit, 20);
        assert!(!plan.rows.sql.contains("WHERE"));
        assert!(!plan.rows.sql.contains("HAVING"));
        assert!(
            plan.rows
                .sql
                .ends_with("GROUP BY p.id, c.id, img.url, img.alt_text ORDER BY p.created_at DESC, p.id DESC LIMIT $1")
        );
        assert_eq!(values(&plan.rows), vec![Value::from(20_i64)]);

        assert_eq!(plan.count.sql, "SELECT COUNT(*) AS total FROM products p");
        assert!(values(&plan.count).is_empty());
    }

    #[test]
    fn test_filters_cursor_and_rating_numbering() {
        let options = ListOptions::default()
            .with_filters(Filters {
                price_min: Some(10.0),
                price_max: None,
                search: Some("lap".to_string()),
                min_rating: Some(3),
            })
            .sorted_by(SortField::Price, SortOrder::Asc)
            .with_limit(5)
            .after(["19.5", "8"]);

        let plan = plan_list(&options);

        assert!(plan.rows.sql.contains(
            " WHERE p.price >= $1 AND (p.name ILIKE $2 OR p.description ILIKE $3) \
AND (p.price, p.id) > ($4, $5) GROUP BY p.id, c.id, img.url, img.alt_text \
HAVING COALESCE(AVG(r.score), 0) >= $6 ORDER BY p.price ASC, p.id ASC LIMIT $7"
        ));
        assert_eq!(
            values(&plan.rows),
            vec![
                Value::from(10.0_f64),
                Value::from("%lap%"),
                Value::from("%lap%"),
                Value::from(19.5_f64),
                Value::from(8_i64),
                Value::from(3),
                Value::from(5_i64),
            ]
        );

        assert_eq!(
            plan.count.sql,
            "SELECT COUNT(*) AS total FROM (SELECT p.id FROM products p \
LEFT JOIN ratings r ON r.product_id = p.id \
WHERE p.price >= $1 AND (p.name ILIKE $2 OR p.description ILIKE $3) \
GROUP BY p.id HAVING COALESCE(AVG(r.score), 0) >= $4) AS matched"
        );
        assert_eq!(
            values(&plan.count),
            vec![
                Value::from(10.0_f64),
                Value::from("%lap%"),
                Value::from("%lap%"),
                Value::from(3),
            ]
        );
    }

    #[test]
    fn test_count_ignores_cursor() {
        let options = ListOptions::default()
            .with_filters(Filters {
                price_max: Some(60.0),
                ..Default::default()
            })
            .after(["2024-01-01T00:00:00Z", "50"]);

        let plan = plan_list(&options);
        assert!(plan.rows.sql.contains("(p.created_at, p.id) < ($2, $3)"));
        assert_eq!(
            plan.count.sql,
            "SELECT COUNT(*) AS total FROM products p WHERE p.price <= $1"
        );
    }

    #[test]
    fn test_malformed_cursor_means_first_page() {
        let plan = plan_list(&ListOptions::default().after(["only-one"]));
        assert!(!plan.rows.sql.contains("p.id) <"));
        assert_eq!(values(&plan.rows), vec![Value::from(20_i64)]);

        let plan = plan_list(
            &ListOptions::default()
                .sorted_by(SortField::Price, SortOrder::Desc)
                .after(["not-a-price", "3"]),
        );
        assert!(!plan.rows.sql.contains("WHERE"));
    }

    #[test]
    fn test_get_statement() {
        let statement = get_statement(17);
        assert!(statement.sql.contains("FILTER (WHERE pi.id IS NOT NULL), '[]'::json"));
        assert!(
            statement
                .sql
                .ends_with("WHERE p.id = $1 GROUP BY p.id, c.id, rs.avg_score")
        );
        assert_eq!(values(&statement), vec![Value::from(17_i64)]);
    }
}
