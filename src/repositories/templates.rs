use sqlx::PgPool;

use crate::db::models::{Item, Template};

const TEMPLATE_COLUMNS: &str = "id, owner_id, title, description, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, template_id, text, order_index";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Template>, sqlx::Error> {
    sqlx::query_as::<_, Template>(&format!("SELECT {TEMPLATE_COLUMNS} FROM templates WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn create(
    pool: &PgPool,
    template: &Template,
    items: &[Item],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO templates (id, owner_id, title, description, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6)",
    )
    .bind(&template.id)
    .bind(&template.owner_id)
    .bind(&template.title)
    .bind(&template.description)
    .bind(template.created_at)
    .bind(template.updated_at)
    .execute(&mut *tx)
    .await?;

    for item in items {
        sqlx::query(
            "INSERT INTO items (id, template_id, text, order_index)
             VALUES ($1,$2,$3,$4)",
        )
        .bind(&item.id)
        .bind(&item.template_id)
        .bind(&item.text)
        .bind(item.order_index)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub(crate) async fn list_items(pool: &PgPool, template_id: &str) -> Result<Vec<Item>, sqlx::Error> {
    sqlx::query_as::<_, Item>(&format!(
        "SELECT {ITEM_COLUMNS} FROM items WHERE template_id = $1 ORDER BY order_index"
    ))
    .bind(template_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_item(pool: &PgPool, id: &str) -> Result<Option<Item>, sqlx::Error> {
    sqlx::query_as::<_, Item>(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}
