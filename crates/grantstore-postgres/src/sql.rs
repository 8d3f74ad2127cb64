//! Rendering of [`GrantFilter`]s into parameterized SQL over JSONB documents.
//!
//! Field names come from [`grantstore::GrantField`] and are fixed; every
//! user-supplied value goes through a bind parameter.

use grantstore::{Clause, GrantFilter};
use sqlx_core::query::Query;
use sqlx_core::query_scalar::QueryScalar;
use sqlx_postgres::{PgArguments, Postgres};
use time::OffsetDateTime;

/// Column holding the JSONB document.
pub const RESOURCE_COLUMN: &str = "resource";

/// A value bound to a positional parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    Timestamp(OffsetDateTime),
}

/// A rendered `WHERE` condition and its bind values, in parameter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereClause {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

impl WhereClause {
    /// Renders `filter` with parameters numbered from `first_param`.
    #[must_use]
    pub fn render(filter: &GrantFilter, first_param: usize) -> Self {
        let mut conditions = Vec::with_capacity(filter.clauses().len());
        let mut binds = Vec::with_capacity(filter.clauses().len());

        for clause in filter.clauses() {
            let param = first_param + binds.len();
            match clause {
                Clause::Equals { field, value } => {
                    conditions.push(format!(
                        "{RESOURCE_COLUMN}->>'{}' = ${param}",
                        field.document_name()
                    ));
                    binds.push(BindValue::Text(value.clone()));
                }
                Clause::ExpiresBefore(instant) => {
                    // JSON null casts to SQL NULL, which never compares true
                    conditions.push(format!(
                        "({RESOURCE_COLUMN}->>'Expiration')::timestamptz < ${param}"
                    ));
                    binds.push(BindValue::Timestamp(*instant));
                }
            }
        }

        let sql = if conditions.is_empty() {
            "TRUE".to_string()
        } else {
            conditions.join(" AND ")
        };

        Self { sql, binds }
    }

    /// Index of the next free positional parameter.
    #[must_use]
    pub fn next_param(&self, first_param: usize) -> usize {
        first_param + self.binds.len()
    }
}

/// Binds the values of a where clause onto a query.
pub fn bind_query<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    binds: &'q [BindValue],
) -> Query<'q, Postgres, PgArguments> {
    for value in binds {
        query = match value {
            BindValue::Text(text) => query.bind(text.as_str()),
            BindValue::Timestamp(instant) => query.bind(*instant),
        };
    }
    query
}

/// Binds the values of a where clause onto a scalar query.
pub fn bind_scalar<'q, O>(
    mut query: QueryScalar<'q, Postgres, O, PgArguments>,
    binds: &'q [BindValue],
) -> QueryScalar<'q, Postgres, O, PgArguments> {
    for value in binds {
        query = match value {
            BindValue::Text(text) => query.bind(text.as_str()),
            BindValue::Timestamp(instant) => query.bind(*instant),
        };
    }
    query
}
