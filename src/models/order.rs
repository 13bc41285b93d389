use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::orders;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Order {
    pub id: Uuid,
    pub ordered_at: NaiveDate,
    pub invoice_name: String,
    pub invoice_path: Option<String>,
    pub payment_id: Uuid,
    pub address_id: Uuid,
    pub customer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Header insert. `invoice_path` stays null until the invoice has been
/// rendered and stored; both happen inside the same transaction.
#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrder {
    pub id: Uuid,
    pub ordered_at: NaiveDate,
    pub invoice_name: String,
    pub payment_id: Uuid,
    pub address_id: Uuid,
    pub customer_id: Uuid,
}
