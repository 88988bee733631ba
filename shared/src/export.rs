//! CSV export of a campaign's orders
//!
//! UTF-8 with a byte-order mark, every cell double-quoted (inner quotes
//! doubled), `\n` between records. Columns: campaign title, the seven fixed
//! values, custom fields in campaign order, note, status, created, updated.

use crate::error::{AppError, AppResult};
use crate::field_config::{FIXED_VALUE_KEYS, NOTE_KEY, base_label};
use crate::models::{Campaign, CustomField, Order};
use crate::util::format_display;
use chrono::{FixedOffset, NaiveDate};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::collections::HashMap;

pub const BOM: &str = "\u{feff}";

/// Column header for a key: configured label, then catalog label, then key
fn header(labels: &HashMap<String, String>, key: &str) -> String {
    labels
        .get(key)
        .cloned()
        .or_else(|| base_label(key).map(str::to_string))
        .unwrap_or_else(|| key.to_string())
}

/// Header row for the export
pub fn header_row(labels: &HashMap<String, String>, custom_fields: &[CustomField]) -> Vec<String> {
    let mut row = Vec::with_capacity(FIXED_VALUE_KEYS.len() + custom_fields.len() + 5);
    row.push("活動".to_string());
    row.extend(FIXED_VALUE_KEYS.iter().map(|key| header(labels, key)));
    row.extend(custom_fields.iter().map(|field| {
        labels
            .get(&field.key)
            .cloned()
            .unwrap_or_else(|| field.label.clone())
    }));
    row.push(header(labels, NOTE_KEY));
    row.push("狀態".to_string());
    row.push("建立時間".to_string());
    row.push("更新時間".to_string());
    row
}

/// One data row for an order
pub fn order_row(
    campaign_title: &str,
    order: &Order,
    custom_fields: &[CustomField],
    offset: FixedOffset,
) -> Vec<String> {
    let mut row = vec![
        campaign_title.to_string(),
        order.customer_name.clone(),
        order.phone.clone(),
        order.email.clone(),
        order.quantity.to_string(),
        order.transfer_account.clone(),
        format_display(order.transfer_time.as_ref(), offset),
        order.transaction_method.clone(),
    ];
    row.extend(custom_fields.iter().map(|field| order.extra_text(&field.key)));
    row.push(order.note.clone());
    row.push(order.status.clone());
    row.push(format_display(order.created_at.as_ref(), offset));
    row.push(format_display(order.updated_at.as_ref(), offset));
    row
}

/// Render the export, BOM included
pub fn orders_to_csv(
    campaign: Option<&Campaign>,
    orders: &[Order],
    labels: &HashMap<String, String>,
    offset: FixedOffset,
) -> AppResult<String> {
    let custom_fields = campaign.map(|c| c.custom_fields.as_slice()).unwrap_or(&[]);
    let title = campaign.map(|c| c.title.as_str()).unwrap_or("");

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let write_err = |e: csv::Error| AppError::internal(format!("CSV write failed: {e}"));
    writer
        .write_record(header_row(labels, custom_fields))
        .map_err(write_err)?;
    for order in orders {
        writer
            .write_record(order_row(title, order, custom_fields, offset))
            .map_err(write_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("CSV flush failed: {e}")))?;
    let body = String::from_utf8(bytes)
        .map_err(|e| AppError::internal(format!("CSV is not UTF-8: {e}")))?;
    Ok(format!("{BOM}{body}"))
}

/// `<slug or "orders">-<YYYY-MM-DD>.csv`
pub fn export_filename(slug: Option<&str>, date: NaiveDate) -> String {
    let slug = slug.map(str::trim).filter(|s| !s.is_empty()).unwrap_or("orders");
    format!("{}-{}.csv", slug, date.format("%Y-%m-%d"))
}
