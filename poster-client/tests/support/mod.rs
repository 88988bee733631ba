// Seeded in-memory backend shared by the flow tests

#![allow(dead_code)]

use chrono::FixedOffset;
use poster_client::MemoryBackend;
use serde_json::json;
use shared::util::{DEFAULT_DISPLAY_OFFSET_MINUTES, display_offset};
use shared::SubmittedValues;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-pw";
pub const STAFF_EMAIL: &str = "staff@example.com";
pub const STAFF_PASSWORD: &str = "staff-pw";

pub const CAMPAIGN_ID: &str = "c1";
pub const CAMPAIGN_SLUG: &str = "poster-20240501-ab12";

pub fn offset() -> FixedOffset {
    display_offset(DEFAULT_DISPLAY_OFFSET_MINUTES)
}

/// One active campaign with a `size` select field, one inactive campaign,
/// an admin and a non-admin user.
pub fn seeded() -> MemoryBackend {
    MemoryBackend::new()
        .with_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
        .with_user(STAFF_EMAIL, STAFF_PASSWORD)
        .with_row(
            "campaigns",
            json!({
                "id": CAMPAIGN_ID,
                "slug": CAMPAIGN_SLUG,
                "title": "海報團",
                "description": "五月海報",
                "notice": "週五面交",
                "is_active": true,
                "custom_fields": [
                    {"key": "size", "label": "尺寸", "type": "select", "options": ["A1", "A2"], "required": true}
                ],
                "field_config": [],
                "status_options": [],
                "created_at": "2024-05-01T00:00:00+00:00"
            }),
        )
        .with_row(
            "campaigns",
            json!({
                "id": "c0",
                "slug": "old-20240101-zzzz",
                "title": "舊活動",
                "is_active": false,
                "custom_fields": [],
                "created_at": "2024-01-01T00:00:00+00:00"
            }),
        )
}

pub fn submission() -> SubmittedValues {
    [
        ("customer_name", "王小明"),
        ("phone", "0912-345-678"),
        ("email", "ming@example.com"),
        ("quantity", "3"),
        ("transfer_account", "12345"),
        ("transfer_time", "2024-05-01T10:30"),
        ("transaction_method", "面交"),
        ("note", "謝謝"),
        ("size", "A2"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
