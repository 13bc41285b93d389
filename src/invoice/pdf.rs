use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::domain::errors::DomainError;
use crate::domain::order::{to_money, Invoice};
use crate::domain::ports::InvoiceRenderer;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const TOP: f32 = 270.0;
const BOTTOM_MARGIN: f32 = 25.0;
const ROW_STEP: f32 = 7.0;

// Table column x positions (mm from the left edge).
const COL_LABEL: f32 = 20.0;
const COL_QTY: f32 = 110.0;
const COL_UNIT: f32 = 135.0;
const COL_SUBTOTAL: f32 = 170.0;

/// Renders an A4 invoice: title block, order metadata, one table row per
/// line, then the pre-tax and tax-inclusive totals. Long carts flow onto
/// additional pages with the table header repeated.
pub struct PdfInvoiceRenderer;

impl PdfInvoiceRenderer {
    fn table_header(layer: &PdfLayerReference, bold: &IndirectFontRef, y: f32) {
        layer.use_text("Item", 10.0, Mm(COL_LABEL), Mm(y), bold);
        layer.use_text("Qty", 10.0, Mm(COL_QTY), Mm(y), bold);
        layer.use_text("Unit price", 10.0, Mm(COL_UNIT), Mm(y), bold);
        layer.use_text("Subtotal", 10.0, Mm(COL_SUBTOTAL), Mm(y), bold);
    }
}

impl InvoiceRenderer for PdfInvoiceRenderer {
    fn render(&self, invoice: &Invoice) -> Result<Vec<u8>, DomainError> {
        let (doc, first_page, first_layer) = PdfDocument::new(
            format!("Invoice {}", invoice.invoice_name),
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            "invoice",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut layer = doc.get_page(first_page).get_layer(first_layer);
        let mut y = TOP;

        layer.use_text("NexusNode", 22.0, Mm(COL_LABEL), Mm(y), &bold);
        y -= 12.0;
        layer.use_text("INVOICE", 18.0, Mm(COL_LABEL), Mm(y), &bold);
        y -= 10.0;
        layer.use_text(
            format!("Date: {}", invoice.ordered_at),
            11.0,
            Mm(COL_LABEL),
            Mm(y),
            &regular,
        );
        layer.use_text(
            format!("Invoice {}", invoice.invoice_name),
            11.0,
            Mm(COL_QTY),
            Mm(y),
            &regular,
        );
        y -= 8.0;
        layer.use_text(
            format!("Billed to: {}", invoice.customer_name),
            11.0,
            Mm(COL_LABEL),
            Mm(y),
            &regular,
        );
        y -= 12.0;

        Self::table_header(&layer, &bold, y);
        y -= ROW_STEP;

        for line in &invoice.lines {
            if y < BOTTOM_MARGIN {
                let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "invoice");
                layer = doc.get_page(page).get_layer(page_layer);
                y = TOP;
                Self::table_header(&layer, &bold, y);
                y -= ROW_STEP;
            }
            layer.use_text(line.label.as_str(), 10.0, Mm(COL_LABEL), Mm(y), &regular);
            layer.use_text(line.quantity.to_string(), 10.0, Mm(COL_QTY), Mm(y), &regular);
            layer.use_text(
                format!("{} EUR", to_money(&line.unit_price)),
                10.0,
                Mm(COL_UNIT),
                Mm(y),
                &regular,
            );
            layer.use_text(
                format!("{} EUR", line.subtotal()),
                10.0,
                Mm(COL_SUBTOTAL),
                Mm(y),
                &regular,
            );
            y -= ROW_STEP;
        }

        if y < BOTTOM_MARGIN {
            let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "invoice");
            layer = doc.get_page(page).get_layer(page_layer);
            y = TOP;
        }
        y -= 4.0;
        layer.use_text(
            format!("Total (excl. tax): {} EUR", invoice.total_pre_tax()),
            12.0,
            Mm(COL_UNIT),
            Mm(y),
            &bold,
        );
        y -= ROW_STEP;
        layer.use_text(
            format!("Total (incl. tax): {} EUR", invoice.total_incl_tax()),
            12.0,
            Mm(COL_UNIT),
            Mm(y),
            &bold,
        );

        doc.save_to_bytes()
            .map_err(|e| DomainError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;
    use crate::domain::order::InvoiceLine;

    fn invoice_with_lines(n: usize) -> Invoice {
        let order_id = Uuid::new_v4();
        Invoice {
            order_id,
            invoice_name: crate::domain::order::invoice_name_for(order_id),
            customer_name: "Grace Hopper".to_string(),
            ordered_at: NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date"),
            lines: (0..n)
                .map(|i| InvoiceLine {
                    label: format!("Widget {i}"),
                    quantity: 1 + (i as i32 % 3),
                    unit_price: BigDecimal::from_str("12.34").expect("valid decimal"),
                })
                .collect(),
        }
    }

    #[test]
    fn renders_a_pdf_document() {
        let bytes = PdfInvoiceRenderer
            .render(&invoice_with_lines(3))
            .expect("render failed");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_carts_paginate_instead_of_failing() {
        let short = PdfInvoiceRenderer
            .render(&invoice_with_lines(2))
            .expect("render failed");
        let long = PdfInvoiceRenderer
            .render(&invoice_with_lines(120))
            .expect("render failed");
        assert!(long.len() > short.len());
    }
}
