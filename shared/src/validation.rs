//! Order input validation
//!
//! Three entry points, one per form:
//! - [`validate_submission`] / [`build_order_insert`]: the public order form
//! - [`validate_order_edit`]: an admin editing an existing order
//! - [`validate_lookup`]: the public status lookup
//!
//! Messages are the user-facing texts shown next to the form.

use crate::error::{AppError, ErrorCode};
use crate::models::{
    CustomField, FieldDescriptor, Order, OrderEdit, OrderInsert, OrderUpdate, StatusLookupParams,
    StatusLookupQuery, TRANSACTION_METHODS,
};
use crate::util::{digits_only, parse_local_datetime};
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Minimum digits for a phone lookup
pub const MIN_PHONE_DIGITS: usize = 3;

/// A rejected input, pointing at the offending field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FieldError {
    pub key: String,
    pub message: String,
    pub code: ErrorCode,
}

impl FieldError {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
            code: ErrorCode::RequiredField,
        }
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = code;
        self
    }
}

impl From<FieldError> for AppError {
    fn from(err: FieldError) -> Self {
        AppError::with_message(err.code, err.message).with_detail("field", err.key)
    }
}

pub type FieldResult<T> = Result<T, FieldError>;

/// Submitted form values, key → raw text
pub type SubmittedValues = HashMap<String, String>;

fn value<'a>(values: &'a SubmittedValues, key: &str) -> &'a str {
    values.get(key).map(|v| v.trim()).unwrap_or("")
}

/// Positive whole number quantity
pub fn parse_quantity(text: &str) -> Option<i64> {
    let number: f64 = text.trim().parse().ok()?;
    if !number.is_finite() || number <= 0.0 || number.fract() != 0.0 {
        return None;
    }
    if number > i32::MAX as f64 {
        return None;
    }
    Some(number as i64)
}

pub fn is_transaction_method(method: &str) -> bool {
    TRANSACTION_METHODS.contains(&method)
}

/// Required check over the visible fields, then the fixed checks that apply
/// whether or not a field is shown.
pub fn validate_submission(
    visible_fields: &[FieldDescriptor],
    values: &SubmittedValues,
    status_options: &[String],
    offset: FixedOffset,
) -> FieldResult<()> {
    for field in visible_fields.iter().filter(|f| f.visible && f.required) {
        if value(values, &field.key).is_empty() {
            return Err(FieldError::new(
                &field.key,
                format!("請輸入「{}」", field.label),
            ));
        }
    }

    check_fixed_values(values, offset)?;

    let status = value(values, "status");
    if !status.is_empty() && !status_options.iter().any(|s| s == status) {
        return Err(FieldError::new("status", "狀態錯誤").with_code(ErrorCode::OrderInvalidStatus));
    }
    Ok(())
}

fn check_fixed_values(
    values: &SubmittedValues,
    offset: FixedOffset,
) -> FieldResult<(i64, DateTime<Utc>)> {
    if value(values, "customer_name").is_empty() {
        return Err(FieldError::new("customer_name", "請輸入姓名"));
    }
    if value(values, "phone").is_empty() {
        return Err(FieldError::new("phone", "請輸入手機"));
    }
    if value(values, "email").is_empty() {
        return Err(FieldError::new("email", "請輸入 Email"));
    }
    let quantity = parse_quantity(value(values, "quantity")).ok_or_else(|| {
        FieldError::new("quantity", "請輸入正確數量").with_code(ErrorCode::OrderInvalidQuantity)
    })?;
    if value(values, "transfer_account").is_empty() {
        return Err(FieldError::new("transfer_account", "請輸入匯款帳號"));
    }
    let transfer_time =
        parse_local_datetime(value(values, "transfer_time"), offset).ok_or_else(|| {
            FieldError::new("transfer_time", "請輸入正確的匯款時間")
                .with_code(ErrorCode::OrderInvalidTransferTime)
        })?;
    if !is_transaction_method(value(values, "transaction_method")) {
        return Err(FieldError::new("transaction_method", "交易方式錯誤")
            .with_code(ErrorCode::OrderInvalidTransactionMethod));
    }
    Ok((quantity, transfer_time))
}

/// Validate a public submission and build the `orders` insert payload.
///
/// Only visible fields are read from `values`; hidden custom fields are
/// stored as empty strings. New orders take the first status of the
/// campaign's resolved list.
pub fn build_order_insert(
    campaign_id: &str,
    active_config: &[FieldDescriptor],
    values: &SubmittedValues,
    status_options: &[String],
    offset: FixedOffset,
    with_snapshot: bool,
) -> FieldResult<OrderInsert> {
    let visible: Vec<FieldDescriptor> =
        active_config.iter().filter(|f| f.visible).cloned().collect();
    let collected: SubmittedValues = visible
        .iter()
        .filter_map(|f| {
            values
                .get(&f.key)
                .map(|v| (f.key.clone(), v.trim().to_string()))
        })
        .chain(
            values
                .get("status")
                .map(|s| ("status".to_string(), s.trim().to_string())),
        )
        .collect();

    validate_submission(&visible, &collected, status_options, offset)?;
    let (quantity, transfer_time) = check_fixed_values(&collected, offset)?;

    let status = status_options
        .first()
        .cloned()
        .ok_or_else(|| FieldError::new("status", "狀態錯誤").with_code(ErrorCode::StatusOptionsEmpty))?;

    let extra_data: Map<String, Value> = active_config
        .iter()
        .filter(|f| f.is_custom())
        .map(|f| {
            (
                f.key.clone(),
                Value::String(value(&collected, &f.key).to_string()),
            )
        })
        .collect();

    Ok(OrderInsert {
        campaign_id: campaign_id.to_string(),
        customer_name: value(&collected, "customer_name").to_string(),
        phone: value(&collected, "phone").to_string(),
        email: value(&collected, "email").to_string(),
        quantity,
        transfer_account: value(&collected, "transfer_account").to_string(),
        transfer_time,
        transaction_method: value(&collected, "transaction_method").to_string(),
        note: value(&collected, "note").to_string(),
        status,
        extra_data,
        field_snapshot: with_snapshot.then(|| active_config.to_vec()),
    })
}

/// Validate an admin edit; custom values overlay the order's existing
/// `extra_data`, keys outside the campaign's custom fields are ignored.
pub fn validate_order_edit(
    existing: &Order,
    edit: &OrderEdit,
    custom_fields: &[CustomField],
    status_options: &[String],
    offset: FixedOffset,
) -> FieldResult<OrderUpdate> {
    let customer_name = edit.customer_name.trim();
    let phone = edit.phone.trim();
    let email = edit.email.trim();
    let transfer_account = edit.transfer_account.trim();

    if customer_name.is_empty() {
        return Err(FieldError::new("customer_name", "姓名不可空白"));
    }
    if phone.is_empty() {
        return Err(FieldError::new("phone", "手機不可空白"));
    }
    if email.is_empty() {
        return Err(FieldError::new("email", "Email 不可空白"));
    }
    let quantity = parse_quantity(&edit.quantity).ok_or_else(|| {
        FieldError::new("quantity", "數量需為正整數").with_code(ErrorCode::OrderInvalidQuantity)
    })?;
    if transfer_account.is_empty() {
        return Err(FieldError::new("transfer_account", "匯款帳號不可空白"));
    }
    let transfer_time = parse_local_datetime(&edit.transfer_time, offset).ok_or_else(|| {
        FieldError::new("transfer_time", "匯款時間格式錯誤")
            .with_code(ErrorCode::OrderInvalidTransferTime)
    })?;
    let transaction_method = edit.transaction_method.trim();
    if !is_transaction_method(transaction_method) {
        return Err(FieldError::new("transaction_method", "交易方式錯誤")
            .with_code(ErrorCode::OrderInvalidTransactionMethod));
    }
    let status = edit.status.trim();
    if !status_options.iter().any(|s| s == status) {
        return Err(FieldError::new("status", "狀態錯誤").with_code(ErrorCode::OrderInvalidStatus));
    }

    let mut extra_data = existing.extra_data.clone();
    for field in custom_fields {
        if let Some(text) = edit.custom_values.get(&field.key) {
            extra_data.insert(field.key.clone(), Value::String(text.trim().to_string()));
        }
    }

    Ok(OrderUpdate {
        customer_name: customer_name.to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
        quantity,
        transfer_account: transfer_account.to_string(),
        transfer_time,
        transaction_method: transaction_method.to_string(),
        note: edit.note.trim().to_string(),
        status: status.to_string(),
        extra_data,
    })
}

/// Validate the public lookup form and build the procedure arguments
pub fn validate_lookup(query: &StatusLookupQuery) -> FieldResult<StatusLookupParams> {
    let slug = query.campaign_slug.trim();
    if slug.is_empty() {
        return Err(FieldError::new("campaign_slug", "請先選擇活動")
            .with_code(ErrorCode::CampaignNotSelected));
    }

    let name = query.name.trim();
    let phone = digits_only(&query.phone);
    if name.is_empty() && phone.is_empty() {
        return Err(FieldError::new("name", "姓名或電話至少填一項")
            .with_code(ErrorCode::LookupCriteriaMissing));
    }
    if !phone.is_empty() && phone.len() < MIN_PHONE_DIGITS {
        return Err(FieldError::new("phone", "若要用電話查詢，請至少輸入 3 碼")
            .with_code(ErrorCode::LookupPhoneTooShort));
    }

    Ok(StatusLookupParams {
        p_campaign_slug: slug.to_string(),
        p_query_name: (!name.is_empty()).then(|| name.to_string()),
        p_query_phone: (!phone.is_empty()).then_some(phone),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_config::{base_catalog, merge};
    use crate::models::FieldKind;
    use crate::status::default_status_options;
    use crate::util::{DEFAULT_DISPLAY_OFFSET_MINUTES, display_offset};

    fn offset() -> FixedOffset {
        display_offset(DEFAULT_DISPLAY_OFFSET_MINUTES)
    }

    fn valid_values() -> SubmittedValues {
        [
            ("customer_name", "王小明"),
            ("phone", "0912345678"),
            ("email", "ming@example.com"),
            ("quantity", "3"),
            ("transfer_account", "12345"),
            ("transfer_time", "2024-05-01T10:30"),
            ("transaction_method", "面交"),
            ("note", " 謝謝 "),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn quantity_only() -> Vec<FieldDescriptor> {
        base_catalog()
            .into_iter()
            .filter(|f| f.key == "quantity")
            .collect()
    }

    #[test]
    fn test_quantity_zero_rejected() {
        let mut values = valid_values();
        values.insert("quantity".into(), "0".into());
        let err = validate_submission(&quantity_only(), &values, &[], offset()).unwrap_err();
        assert_eq!(err.key, "quantity");
        assert_eq!(err.message, "請輸入正確數量");
    }

    #[test]
    fn test_quantity_three_accepted() {
        let values = valid_values();
        assert!(validate_submission(&quantity_only(), &values, &[], offset()).is_ok());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(" 2 "), Some(2));
        assert_eq!(parse_quantity("2.0"), Some(2));
        assert_eq!(parse_quantity("2.5"), None);
        assert_eq!(parse_quantity("-1"), None);
        assert_eq!(parse_quantity("inf"), None);
        assert_eq!(parse_quantity("NaN"), None);
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("1e12"), None);
    }

    #[test]
    fn test_required_visible_field_names_label() {
        let custom = vec![CustomField::new("size", "尺寸", FieldKind::Text).required(true)];
        let config = merge(&[], &base_catalog(), &custom);
        let err = validate_submission(&config, &valid_values(), &[], offset()).unwrap_err();
        assert_eq!(err.key, "size");
        assert_eq!(err.message, "請輸入「尺寸」");
        assert_eq!(AppError::from(err).field(), Some("size"));
    }

    #[test]
    fn test_hidden_required_field_skipped() {
        let custom = vec![CustomField::new("size", "尺寸", FieldKind::Text).required(true)];
        let mut config = merge(&[], &base_catalog(), &custom);
        config.iter_mut().for_each(|f| {
            if f.key == "size" {
                f.visible = false;
            }
        });
        assert!(validate_submission(&config, &valid_values(), &[], offset()).is_ok());
    }

    #[test]
    fn test_fixed_checks_apply_without_fields() {
        let mut values = valid_values();
        values.insert("transaction_method".into(), "郵寄".into());
        let err = validate_submission(&[], &values, &[], offset()).unwrap_err();
        assert_eq!(err.message, "交易方式錯誤");
        assert_eq!(err.code, ErrorCode::OrderInvalidTransactionMethod);

        let mut values = valid_values();
        values.insert("transfer_time".into(), "soon".into());
        let err = validate_submission(&[], &values, &[], offset()).unwrap_err();
        assert_eq!(err.message, "請輸入正確的匯款時間");

        let mut values = valid_values();
        values.remove("email");
        let err = validate_submission(&[], &values, &[], offset()).unwrap_err();
        assert_eq!(err.message, "請輸入 Email");
    }

    #[test]
    fn test_status_checked_when_present() {
        let mut values = valid_values();
        values.insert("status".into(), "已出貨".into());
        let err =
            validate_submission(&[], &values, &default_status_options(), offset()).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderInvalidStatus);

        values.insert("status".into(), "已採購".into());
        assert!(validate_submission(&[], &values, &default_status_options(), offset()).is_ok());
    }

    #[test]
    fn test_build_order_insert() {
        let custom = vec![
            CustomField::new("size", "尺寸", FieldKind::Text),
            CustomField::new("memo", "備忘", FieldKind::Textarea),
        ];
        let mut config = merge(&[], &base_catalog(), &custom);
        config.iter_mut().for_each(|f| {
            if f.key == "memo" {
                f.visible = false;
            }
        });
        let mut values = valid_values();
        values.insert("size".into(), " A1 ".into());
        values.insert("memo".into(), "hidden".into());
        values.insert("ignored".into(), "x".into());

        let insert = build_order_insert(
            "c1",
            &config,
            &values,
            &default_status_options(),
            offset(),
            true,
        )
        .unwrap();

        assert_eq!(insert.campaign_id, "c1");
        assert_eq!(insert.quantity, 3);
        assert_eq!(insert.note, "謝謝");
        assert_eq!(insert.status, "已匯款");
        assert_eq!(insert.transfer_time.to_rfc3339(), "2024-05-01T02:30:00+00:00");
        assert_eq!(insert.extra_data.len(), 2);
        assert_eq!(insert.extra_data["size"], "A1");
        assert_eq!(insert.extra_data["memo"], "");
        assert_eq!(insert.field_snapshot.as_ref().unwrap().len(), config.len());

        let without = build_order_insert(
            "c1",
            &config,
            &values,
            &default_status_options(),
            offset(),
            false,
        )
        .unwrap();
        assert!(without.field_snapshot.is_none());
    }

    fn existing_order() -> Order {
        serde_json::from_value(serde_json::json!({
            "id": "o1",
            "campaign_id": "c1",
            "extra_data": {"size": "A1", "legacy": "keep"}
        }))
        .unwrap()
    }

    fn valid_edit() -> OrderEdit {
        OrderEdit {
            customer_name: " 王小明 ".into(),
            phone: "0912".into(),
            email: "a@b.c".into(),
            quantity: "2".into(),
            transfer_account: "999".into(),
            transfer_time: "2024-05-01T10:30".into(),
            transaction_method: "賣貨便".into(),
            note: String::new(),
            status: "已到貨".into(),
            custom_values: [("size".to_string(), " A2 ".to_string()), ("bogus".into(), "x".into())]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn test_order_edit_overlays_extra_data() {
        let custom = vec![CustomField::new("size", "尺寸", FieldKind::Text)];
        let update = validate_order_edit(
            &existing_order(),
            &valid_edit(),
            &custom,
            &default_status_options(),
            offset(),
        )
        .unwrap();

        assert_eq!(update.customer_name, "王小明");
        assert_eq!(update.extra_data["size"], "A2");
        assert_eq!(update.extra_data["legacy"], "keep");
        assert!(update.extra_data.get("bogus").is_none());
    }

    #[test]
    fn test_order_edit_messages() {
        let statuses = default_status_options();
        let cases: Vec<(Box<dyn Fn(&mut OrderEdit)>, &str)> = vec![
            (Box::new(|e: &mut OrderEdit| e.customer_name = " ".into()), "姓名不可空白"),
            (Box::new(|e: &mut OrderEdit| e.phone.clear()), "手機不可空白"),
            (Box::new(|e: &mut OrderEdit| e.email.clear()), "Email 不可空白"),
            (Box::new(|e: &mut OrderEdit| e.quantity = "1.5".into()), "數量需為正整數"),
            (Box::new(|e: &mut OrderEdit| e.transfer_account.clear()), "匯款帳號不可空白"),
            (Box::new(|e: &mut OrderEdit| e.transfer_time = "bad".into()), "匯款時間格式錯誤"),
            (Box::new(|e: &mut OrderEdit| e.transaction_method = "宅配".into()), "交易方式錯誤"),
            (Box::new(|e: &mut OrderEdit| e.status = "已出貨".into()), "狀態錯誤"),
        ];

        for (mutate, message) in cases {
            let mut edit = valid_edit();
            mutate(&mut edit);
            let err = validate_order_edit(&existing_order(), &edit, &[], &statuses, offset())
                .unwrap_err();
            assert_eq!(err.message, message);
        }
    }

    #[test]
    fn test_lookup_validation() {
        let query = |slug: &str, name: &str, phone: &str| StatusLookupQuery {
            campaign_slug: slug.into(),
            name: name.into(),
            phone: phone.into(),
        };

        assert_eq!(
            validate_lookup(&query("", "王", "")).unwrap_err().message,
            "請先選擇活動"
        );
        assert_eq!(
            validate_lookup(&query("s", " ", "--")).unwrap_err().message,
            "姓名或電話至少填一項"
        );
        assert_eq!(
            validate_lookup(&query("s", "", "09")).unwrap_err().message,
            "若要用電話查詢，請至少輸入 3 碼"
        );

        let params = validate_lookup(&query("s", "", "0912-345")).unwrap();
        assert_eq!(params.p_query_name, None);
        assert_eq!(params.p_query_phone.as_deref(), Some("0912345"));

        let params = validate_lookup(&query("s", " 王小明 ", "")).unwrap();
        assert_eq!(params.p_query_name.as_deref(), Some("王小明"));
        assert_eq!(params.p_query_phone, None);
    }
}
