// poster-client/tests/order_form_flow.rs
// Public order form: load, submit, lookup

mod support;

use poster_client::{ClientError, OrderFormSession, SchemaCapabilities};
use serde_json::json;
use shared::models::StatusLookupQuery;
use shared::ErrorCode;
use std::sync::Arc;
use support::*;

async fn session(backend: &poster_client::MemoryBackend, caps: SchemaCapabilities) -> OrderFormSession {
    let mut session = OrderFormSession::new(Arc::new(backend.clone()), caps, offset());
    session.load().await.unwrap();
    session
}

#[tokio::test]
async fn test_load_lists_only_active_campaigns() {
    let backend = seeded();
    let session = session(&backend, SchemaCapabilities::full()).await;

    let campaigns = session.public_campaigns();
    assert_eq!(campaigns.len(), 1);
    assert_eq!(campaigns[0].slug, CAMPAIGN_SLUG);
    assert_eq!(campaigns[0].notice.as_deref(), Some("週五面交"));

    let keys: Vec<&str> = campaigns[0].fields.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "customer_name",
            "phone",
            "email",
            "quantity",
            "transfer_account",
            "transfer_time",
            "transaction_method",
            "note",
            "size"
        ]
    );
}

#[tokio::test]
async fn test_global_defaults_apply_to_campaign_fields() {
    let backend = seeded().with_row(
        "app_settings",
        json!({
            "key": "order_form_defaults",
            "value": {"field_config": [
                {"key": "note", "label": "留言", "visible": false},
                {"key": "phone", "label": "電話", "required": false}
            ]}
        }),
    );
    let session = session(&backend, SchemaCapabilities::full()).await;

    let fields = &session.public_campaigns()[0].fields;
    assert!(fields.iter().all(|f| f.key != "note"));
    let phone = fields.iter().find(|f| f.key == "phone").unwrap();
    assert_eq!(phone.label, "電話");
    assert!(phone.required);
}

#[tokio::test]
async fn test_submit_inserts_order_with_first_status() {
    let backend = seeded().with_row(
        "app_settings",
        json!({"key": "order_status_options", "value": {"options": ["待確認", "已匯款"]}}),
    );
    let session = session(&backend, SchemaCapabilities::full()).await;

    let payload = session.submit(CAMPAIGN_ID, &submission()).await.unwrap();
    assert_eq!(payload.status, "待確認");
    assert_eq!(payload.quantity, 3);

    let rows = backend.rows("orders");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["campaign_id"], CAMPAIGN_ID);
    assert_eq!(rows[0]["extra_data"]["size"], "A2");
    assert_eq!(rows[0]["transfer_time"], "2024-05-01T02:30:00Z");
    assert!(rows[0]["field_snapshot"].is_array());
}

#[tokio::test]
async fn test_submit_without_snapshot_column() {
    let backend = seeded().without_column("orders", "field_snapshot");
    let mut caps = SchemaCapabilities::full();
    caps.order_field_snapshot = false;
    let session = session(&backend, caps).await;

    session.submit(CAMPAIGN_ID, &submission()).await.unwrap();
    let rows = backend.rows("orders");
    assert!(rows[0].get("field_snapshot").is_none());
}

#[tokio::test]
async fn test_submit_rejections() {
    let backend = seeded();
    let session = session(&backend, SchemaCapabilities::full()).await;

    let mut values = submission();
    values.insert("quantity".into(), "0".into());
    let err = session.submit(CAMPAIGN_ID, &values).await.unwrap_err();
    let ClientError::App(app) = err else {
        panic!("expected a validation error");
    };
    assert_eq!(app.code, ErrorCode::OrderInvalidQuantity);
    assert_eq!(app.field(), Some("quantity"));

    let mut values = submission();
    values.remove("size");
    let err = session.submit(CAMPAIGN_ID, &values).await.unwrap_err();
    assert_eq!(err.to_string(), "請輸入「尺寸」");

    let err = session.submit("c0", &submission()).await.unwrap_err();
    assert_eq!(err.to_string(), "目前沒有可訂購活動");

    assert!(backend.rows("orders").is_empty());
}

#[tokio::test]
async fn test_lookup_by_phone_digits() {
    let backend = seeded();
    let session = session(&backend, SchemaCapabilities::full()).await;
    session.submit(CAMPAIGN_ID, &submission()).await.unwrap();

    let outcome = session
        .lookup(&StatusLookupQuery {
            campaign_slug: CAMPAIGN_SLUG.into(),
            name: String::new(),
            phone: "345-678".into(),
        })
        .await
        .unwrap();
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0].campaign_title, "海報團");
    assert_eq!(outcome.rows[0].status, "已匯款");
    assert_eq!(outcome.message, "查詢成功，共 1 筆。");

    let outcome = session
        .lookup(&StatusLookupQuery {
            campaign_slug: CAMPAIGN_SLUG.into(),
            name: "陳大文".into(),
            phone: String::new(),
        })
        .await
        .unwrap();
    assert!(outcome.rows.is_empty());
    assert_eq!(outcome.message, "查無資料，請確認活動與姓名或電話是否正確。");
}

#[tokio::test]
async fn test_lookup_validation() {
    let backend = seeded();
    let session = session(&backend, SchemaCapabilities::full()).await;

    let err = session
        .lookup(&StatusLookupQuery {
            campaign_slug: CAMPAIGN_SLUG.into(),
            name: String::new(),
            phone: "12".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "若要用電話查詢，請至少輸入 3 碼");
}
