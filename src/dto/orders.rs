use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    models::{Order, OrderItem, PaymentMode},
    validation::{FieldViolation, violations},
};

// ASCII digits only; `\d` would also accept other scripts' digits.
static PHONE_NO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("phone number pattern"));

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfoInput {
    #[validate(
        required(message = "Add your Address"),
        length(min = 1, message = "Add your Address")
    )]
    pub address: Option<String>,
    #[validate(
        required(message = "Add your City"),
        length(min = 1, message = "Add your City")
    )]
    pub city: Option<String>,
    #[validate(
        required(message = "Add your State"),
        length(min = 1, message = "Add your State")
    )]
    pub state: Option<String>,
    #[validate(
        required(message = "Add your pincode"),
        range(min = 100000, max = 999999, message = "Pincode must be exactly 6 digits")
    )]
    pub pincode: Option<i32>,
    #[validate(
        required(message = "Enter a valid Phone No"),
        regex(path = *PHONE_NO, message = "Enter a valid Phone No")
    )]
    pub phone_no: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct OrderItemInput {
    #[validate(
        required(message = "Add the item name"),
        length(min = 1, message = "Add the item name")
    )]
    pub name: Option<String>,
    #[validate(required(message = "Add the item price"))]
    pub price: Option<i64>,
    #[validate(required(message = "Add the item quantity"))]
    pub quantity: Option<i32>,
    pub image: Option<String>,
    #[validate(required(message = "Item must reference a product"))]
    pub product: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct PaymentInfoInput {
    #[validate(
        required(message = "Payment Id is Required"),
        length(min = 1, message = "Payment Id is Required")
    )]
    pub id: Option<String>,
    #[validate(
        required(message = "Payment status is Required"),
        length(min = 1, message = "Payment status is Required")
    )]
    pub status: Option<String>,
    #[serde(default = "default_payment_mode")]
    #[validate(custom(function = "validate_payment_mode"))]
    pub mode: String,
}

impl Default for PaymentInfoInput {
    fn default() -> Self {
        Self {
            id: None,
            status: None,
            mode: default_payment_mode(),
        }
    }
}

fn default_payment_mode() -> String {
    PaymentMode::Cash.to_string()
}

fn validate_payment_mode(mode: &str) -> Result<(), ValidationError> {
    match mode.parse::<PaymentMode>() {
        Ok(_) => Ok(()),
        Err(_) => Err(ValidationError::new("payment_mode")
            .with_message("Payment mode must be Cash or Online".into())),
    }
}

/// Order document as submitted by the checkout flow. Every field is optional
/// on the wire so that a missing value surfaces as a validation error naming
/// the field rather than a decoding failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(required(message = "Add your shipping info"), nested)]
    pub shipping_info: Option<ShippingInfoInput>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Add at least one order item"), nested)]
    pub order_items: Vec<OrderItemInput>,
    #[validate(required(message = "Order must reference a user"))]
    pub user: Option<Uuid>,
    #[validate(required(message = "Add your payment info"), nested)]
    pub payment_info: Option<PaymentInfoInput>,
    #[validate(required(message = "Add the payment time"))]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items_price: i64,
    #[serde(default)]
    pub tax_price: i64,
    #[serde(default)]
    pub shipping_price: i64,
    #[serde(default)]
    pub total_price: i64,
}

/// An order document that passed validation, with every required value
/// present.
#[derive(Debug, Clone)]
pub struct ValidOrder {
    pub user: Uuid,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: i32,
    pub phone_no: String,
    pub payment_id: String,
    pub payment_status: String,
    pub payment_mode: PaymentMode,
    pub items: Vec<ValidOrderItem>,
    pub items_price: i64,
    pub tax_price: i64,
    pub shipping_price: i64,
    pub total_price: i64,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ValidOrderItem {
    pub product: Uuid,
    pub name: String,
    pub price: i64,
    pub quantity: i32,
    pub image: Option<String>,
}

impl CreateOrderRequest {
    /// Runs every field rule and, when all pass, returns the checked document.
    /// Violations are reported together, sorted by field path.
    pub fn into_valid(self) -> Result<ValidOrder, Vec<FieldViolation>> {
        self.validate().map_err(|errors| violations(&errors))?;

        let (Some(shipping), Some(payment), Some(user), Some(paid_at)) =
            (self.shipping_info, self.payment_info, self.user, self.paid_at)
        else {
            return Err(vec![FieldViolation::new("order", "Order document is incomplete")]);
        };

        let items = self
            .order_items
            .into_iter()
            .map(|item| ValidOrderItem {
                product: item.product.unwrap_or_default(),
                name: item.name.unwrap_or_default(),
                price: item.price.unwrap_or_default(),
                quantity: item.quantity.unwrap_or_default(),
                image: item.image.filter(|image| !image.is_empty()),
            })
            .collect();

        Ok(ValidOrder {
            user,
            address: shipping.address.unwrap_or_default(),
            city: shipping.city.unwrap_or_default(),
            state: shipping.state.unwrap_or_default(),
            pincode: shipping.pincode.unwrap_or_default(),
            phone_no: shipping.phone_no.unwrap_or_default(),
            payment_id: payment.id.unwrap_or_default(),
            payment_status: payment.status.unwrap_or_default(),
            payment_mode: payment.mode.parse().unwrap_or_default(),
            items,
            items_price: self.items_price,
            tax_price: self.tax_price,
            shipping_price: self.shipping_price,
            total_price: self.total_price,
            paid_at,
        })
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub order_status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
