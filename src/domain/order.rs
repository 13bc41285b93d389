use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Fixed VAT multiplier applied to the pre-tax total.
pub fn tax_multiplier() -> BigDecimal {
    BigDecimal::new(BigInt::from(120), 2)
}

/// Invoice file names derive from the generated order id, so two orders can
/// never collide in the file store.
pub fn invoice_name_for(order_id: Uuid) -> String {
    format!("invoice-{order_id}.pdf")
}

/// Round a monetary amount to two decimal places.
pub fn to_money(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}

#[derive(Debug, Clone)]
pub struct OrderLineInput {
    pub item_id: Uuid,
    pub quantity: i32,
}

/// Everything the caller submits to create one order.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer_id: Uuid,
    pub payment_id: Uuid,
    pub address_id: Uuid,
    pub ordered_at: NaiveDate,
    pub lines: Vec<OrderLineInput>,
}

/// One invoice row with the catalog data already resolved.
#[derive(Debug, Clone)]
pub struct InvoiceLine {
    pub label: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl InvoiceLine {
    pub fn subtotal(&self) -> BigDecimal {
        to_money(&(&self.unit_price * BigDecimal::from(self.quantity)))
    }
}

#[derive(Debug, Clone)]
pub struct Invoice {
    pub order_id: Uuid,
    pub invoice_name: String,
    pub customer_name: String,
    pub ordered_at: NaiveDate,
    pub lines: Vec<InvoiceLine>,
}

impl Invoice {
    pub fn total_pre_tax(&self) -> BigDecimal {
        let sum = self
            .lines
            .iter()
            .map(InvoiceLine::subtotal)
            .sum::<BigDecimal>();
        to_money(&sum)
    }

    pub fn total_incl_tax(&self) -> BigDecimal {
        to_money(&(self.total_pre_tax() * tax_multiplier()))
    }
}

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub item_id: Uuid,
    pub label: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub payment_id: Uuid,
    pub address_id: Uuid,
    pub ordered_at: NaiveDate,
    pub invoice_name: String,
    pub invoice_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLineView>,
}

/// Returned once the whole create/render/finalize sequence has committed.
#[derive(Debug, Clone)]
pub struct CreatedOrder {
    pub id: Uuid,
    pub invoice_path: String,
    pub total_pre_tax: BigDecimal,
    pub total_incl_tax: BigDecimal,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn line(price: &str, quantity: i32) -> InvoiceLine {
        InvoiceLine {
            label: "item".to_string(),
            quantity,
            unit_price: BigDecimal::from_str(price).expect("valid decimal"),
        }
    }

    fn invoice(lines: Vec<InvoiceLine>) -> Invoice {
        Invoice {
            order_id: Uuid::new_v4(),
            invoice_name: "invoice-test.pdf".to_string(),
            customer_name: "Ada Lovelace".to_string(),
            ordered_at: NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date"),
            lines,
        }
    }

    #[test]
    fn totals_for_reference_cart() {
        let inv = invoice(vec![line("10.00", 2), line("5.50", 1)]);
        assert_eq!(inv.total_pre_tax().to_string(), "25.50");
        assert_eq!(inv.total_incl_tax().to_string(), "30.60");
    }

    #[test]
    fn line_subtotal_keeps_two_decimals() {
        assert_eq!(line("19.99", 3).subtotal().to_string(), "59.97");
    }

    #[test]
    fn empty_invoice_totals_are_zero() {
        let inv = invoice(vec![]);
        assert_eq!(inv.total_pre_tax().to_string(), "0.00");
        assert_eq!(inv.total_incl_tax().to_string(), "0.00");
    }

    #[test]
    fn invoice_names_embed_the_order_id() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(invoice_name_for(a), format!("invoice-{a}.pdf"));
        assert_ne!(invoice_name_for(a), invoice_name_for(b));
    }
}
