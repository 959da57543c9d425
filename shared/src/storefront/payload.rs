//! Inbound storefront order payload and reconciliation outcome

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::util::{non_blank, round_money};

/// One order as pushed by the storefront
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontOrderPayload {
    /// Storefront-side identifier, used for idempotency and logging
    #[validate(custom(function = "not_blank"))]
    pub order_id: String,
    #[validate(nested)]
    pub customer_info: CustomerInfo,
    #[validate(length(min = 1, message = "order must contain at least one item"), nested)]
    pub items: Vec<StorefrontLineItem>,
    #[validate(custom(function = "non_negative"))]
    pub total_amount: Decimal,
    pub payment_method: String,
    pub order_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    #[validate(email(message = "customer email is not a valid address"))]
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontLineItem {
    #[validate(custom(function = "not_blank"))]
    pub product_id: String,
    pub product_name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[validate(range(min = 1, message = "quantity must be positive"))]
    pub quantity: i32,
    #[validate(custom(function = "non_negative"))]
    pub unit_price: Decimal,
    #[validate(custom(function = "non_negative"))]
    pub total_price: Decimal,
}

impl StorefrontOrderPayload {
    /// Round the order total and every line amount to cents
    pub fn round_amounts(&mut self) {
        self.total_amount = round_money(self.total_amount);
        for item in &mut self.items {
            item.unit_price = round_money(item.unit_price);
            item.total_price = round_money(item.total_price);
        }
    }
}

impl StorefrontLineItem {
    /// Catalog key for this line: explicit SKU when present, else product id
    pub fn effective_sku(&self) -> &str {
        non_blank(self.sku.as_deref()).unwrap_or(self.product_id.trim())
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("negative").with_message("must not be negative".into()));
    }
    Ok(())
}

/// Outbound result of one reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileOutcome {
    pub success: bool,
    /// Internal order id, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReconcileOutcome {
    pub fn succeeded(order_id: i64, order_number: impl Into<String>) -> Self {
        Self {
            success: true,
            order_id: Some(order_id.to_string()),
            order_number: Some(order_number.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            order_id: None,
            order_number: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "orderId": "SHOP-1001",
            "customerInfo": {
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "a@x.com",
                "phone": "+44 20 0000",
                "address": "12 Analytical Row",
                "city": "London",
                "state": "Greater London",
                "postalCode": "N1 9GU",
                "country": "UK"
            },
            "items": [{
                "productId": "P1",
                "productName": "Brass gear",
                "quantity": 2,
                "unitPrice": 500,
                "totalPrice": 1000
            }],
            "totalAmount": 1000,
            "paymentMethod": "card",
            "orderDate": "2026-03-14T09:30:00Z"
        })
    }

    #[test]
    fn parses_camel_case_payload() {
        let payload: StorefrontOrderPayload = serde_json::from_value(sample()).unwrap();
        assert_eq!(payload.order_id, "SHOP-1001");
        assert_eq!(payload.items[0].unit_price, Decimal::from(500));
        assert!(payload.notes.is_none());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn rejects_missing_required_field() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("customerInfo");
        assert!(serde_json::from_value::<StorefrontOrderPayload>(value).is_err());
    }

    #[test]
    fn validation_catches_empty_items_and_bad_email() {
        let mut payload: StorefrontOrderPayload = serde_json::from_value(sample()).unwrap();
        payload.items.clear();
        payload.customer_info.email = "not-an-email".into();
        let errors = payload.validate().unwrap_err();
        let fields = errors.errors();
        assert!(fields.contains_key("items"));
        assert!(fields.contains_key("customer_info"));
    }

    #[test]
    fn validation_catches_bad_line() {
        let mut payload: StorefrontOrderPayload = serde_json::from_value(sample()).unwrap();
        payload.items[0].quantity = 0;
        payload.items[0].unit_price = Decimal::from(-1);
        assert!(payload.validate().is_err());

        let mut payload: StorefrontOrderPayload = serde_json::from_value(sample()).unwrap();
        payload.order_id = "   ".into();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn effective_sku_prefers_explicit_sku() {
        let mut payload: StorefrontOrderPayload = serde_json::from_value(sample()).unwrap();
        assert_eq!(payload.items[0].effective_sku(), "P1");
        payload.items[0].sku = Some("GEAR-BR".into());
        assert_eq!(payload.items[0].effective_sku(), "GEAR-BR");
        payload.items[0].sku = Some("  ".into());
        assert_eq!(payload.items[0].effective_sku(), "P1");
    }

    #[test]
    fn round_amounts_keeps_cents_only() {
        let mut payload: StorefrontOrderPayload = serde_json::from_value(sample()).unwrap();
        payload.items[0].unit_price = Decimal::new(19999, 3);
        payload.items[0].total_price = Decimal::new(39998, 3);
        payload.total_amount = Decimal::new(39998, 3);

        payload.round_amounts();

        assert_eq!(payload.items[0].unit_price, Decimal::new(2000, 2));
        assert_eq!(payload.items[0].total_price, Decimal::new(4000, 2));
        assert_eq!(payload.total_amount, Decimal::new(4000, 2));
    }

    #[test]
    fn outcome_omits_absent_fields() {
        let json = serde_json::to_value(ReconcileOutcome::failed("boom")).unwrap();
        assert_eq!(json, json!({ "success": false, "error": "boom" }));

        let json = serde_json::to_value(ReconcileOutcome::succeeded(7, "SO20260314001")).unwrap();
        assert_eq!(
            json,
            json!({ "success": true, "orderId": "7", "orderNumber": "SO20260314001" })
        );
    }
}
