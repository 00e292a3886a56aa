use std::sync::Arc;

use crate::core::error::AppResult;
use crate::storage::contacts::{self, ContactRecord};
use crate::storage::db::{self, DbPool};

/// Exports contact records to CSV format
pub fn contacts_to_csv(records: &[ContactRecord]) -> String {
    let mut content = "user_id,email,last_updated\n".to_string();

    for record in records {
        // Validated e-mails can't contain quotes, but old rows might predate validation
        let email = record.email.replace('"', "\"\"").replace('\n', " ");
        content.push_str(&format!(
            "{},\"{}\",\"{}\"\n",
            record.user_id, email, record.last_updated
        ));
    }

    content
}

/// Loads every stored contact and renders the CSV export.
///
/// Returns the CSV together with the number of exported rows.
pub fn export_contacts(db_pool: &Arc<DbPool>) -> AppResult<(String, usize)> {
    let conn = db::get_connection(db_pool)?;
    let records = contacts::get_all_contacts(&conn)?;
    log::info!("Exporting {} contact(s) to CSV", records.len());
    Ok((contacts_to_csv(&records), records.len()))
}
