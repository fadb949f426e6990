use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::Answer;

const COLUMNS: &str = "a.id, a.response_id, a.item_id, a.numeric_value, a.text_value, a.created_at";

/// Answers to one item across the evaluation's responses, optionally
/// narrowed to some groups.
pub(crate) async fn list_for_item(
    pool: &PgPool,
    item_id: &str,
    evaluation_id: &str,
    group_refs: &[String],
) -> Result<Vec<Answer>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {COLUMNS} FROM answers a \
         JOIN responses r ON r.id = a.response_id \
         WHERE a.item_id = "
    ));
    builder.push_bind(item_id);
    builder.push(" AND r.evaluation_id = ");
    builder.push_bind(evaluation_id);

    if !group_refs.is_empty() {
        builder.push(" AND r.group_ref = ANY(");
        builder.push_bind(group_refs);
        builder.push(")");
    }

    builder.push(" ORDER BY a.created_at, a.id");
    builder.build_query_as::<Answer>().fetch_all(pool).await
}
