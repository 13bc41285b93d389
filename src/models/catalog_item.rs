use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::catalog_items;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = catalog_items)]
#[diesel(belongs_to(crate::models::category::Category))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CatalogItem {
    pub id: Uuid,
    pub label: String,
    pub description: String,
    pub unit_price: BigDecimal,
    pub released_on: NaiveDate,
    pub category_id: Uuid,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = catalog_items)]
pub struct NewCatalogItem {
    pub id: Uuid,
    pub label: String,
    pub description: String,
    pub unit_price: BigDecimal,
    pub released_on: NaiveDate,
    pub category_id: Uuid,
    pub image_path: Option<String>,
}
