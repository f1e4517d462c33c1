//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic goes through `Decimal` and is rounded to two
//! places half-up; `f64` only appears at storage/serialization edges.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::prelude::*;
use rust_decimal::RoundingStrategy;
use shared::order::{OrderItemInput, PaymentStatus};

use crate::db::models::Product;
use crate::utils::{AppError, AppResult};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed payment amount
const MAX_PAYMENT_AMOUNT: f64 = 1_000_000.0;

pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Validate a payment amount: finite, positive, within bounds
pub fn validate_payment_amount(amount: f64) -> AppResult<()> {
    if !amount.is_finite() {
        return Err(AppError::validation(format!(
            "Payment amount must be a finite number, got {}",
            amount
        )));
    }
    if to_decimal(amount) < MONEY_TOLERANCE {
        return Err(AppError::validation(format!(
            "Payment amount must be positive, got {}",
            amount
        )));
    }
    if amount > MAX_PAYMENT_AMOUNT {
        return Err(AppError::validation(format!(
            "Payment amount exceeds maximum allowed ({}), got {}",
            MAX_PAYMENT_AMOUNT, amount
        )));
    }
    Ok(())
}

/// Derive the payment status from the paid/total pair.
///
/// paid ≥ total → Paid; 0 < paid < total → Partial; otherwise Unpaid.
/// Over-payment therefore still reads as Paid.
pub fn payment_status_for(paid_amount: f64, total_amount: f64) -> PaymentStatus {
    let paid = to_decimal(paid_amount);
    let total = to_decimal(total_amount);

    if paid >= total {
        PaymentStatus::Paid
    } else if paid > Decimal::ZERO {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Unpaid
    }
}

/// One resolved order line: catalog name and unit price captured at this
/// instant, so later catalog edits never alter the order.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSnapshot {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub note: Option<String>,
}

/// Resolve inputs against the fetched products and compute the order total.
///
/// The caller has already verified that every distinct requested product id
/// was resolved; a missing product here means a logic error upstream and
/// fails the whole operation.
pub fn build_snapshots(
    products: &[Product],
    inputs: &[OrderItemInput],
) -> AppResult<(Vec<ItemSnapshot>, f64)> {
    let by_id: HashMap<&str, &Product> =
        products.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut snapshots = Vec::with_capacity(inputs.len());
    let mut total = Decimal::ZERO;

    for input in inputs {
        if input.quantity <= 0 {
            return Err(AppError::validation(format!(
                "Quantity must be positive, got {}",
                input.quantity
            )));
        }

        let product = by_id.get(input.product_id.as_str()).ok_or_else(|| {
            AppError::validation(format!("Product {} is not available", input.product_id))
        })?;

        let line_total = to_decimal(product.price) * Decimal::from(input.quantity);
        total += line_total;

        snapshots.push(ItemSnapshot {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity: input.quantity,
            unit_price: product.price,
            note: input.note.clone(),
        });
    }

    Ok((snapshots, to_f64(total)))
}

/// Distinct product ids referenced by the inputs, in stable order
pub fn distinct_product_ids(inputs: &[OrderItemInput]) -> Vec<String> {
    inputs
        .iter()
        .map(|i| i.product_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
