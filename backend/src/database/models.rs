use chrono::NaiveDateTime;

/// Row of the `documents` table; `value` holds the JSON text
#[derive(Debug, Clone)]
pub struct DocumentRow {
    pub collection: String,
    pub key: String,
    pub value: String,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}
