use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Item, Template};
use crate::services::evaluations::types::NewTemplate;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct TemplateCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[validate(length(min = 1, message = "items must not be empty"))]
    pub(crate) items: Vec<String>,
}

impl From<TemplateCreate> for NewTemplate {
    fn from(payload: TemplateCreate) -> Self {
        Self {
            title: payload.title.trim().to_string(),
            description: payload.description,
            items: payload.items.into_iter().map(|text| text.trim().to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ItemResponse {
    pub(crate) id: String,
    pub(crate) text: String,
    pub(crate) order_index: i32,
}

#[derive(Debug, Serialize)]
pub(crate) struct TemplateResponse {
    pub(crate) id: String,
    pub(crate) owner_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) items: Vec<ItemResponse>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl TemplateResponse {
    pub(crate) fn from_db(template: Template, items: Vec<Item>) -> Self {
        Self {
            id: template.id,
            owner_id: template.owner_id,
            title: template.title,
            description: template.description,
            items: items
                .into_iter()
                .map(|item| ItemResponse {
                    id: item.id,
                    text: item.text,
                    order_index: item.order_index,
                })
                .collect(),
            created_at: format_primitive(template.created_at),
            updated_at: format_primitive(template.updated_at),
        }
    }
}
