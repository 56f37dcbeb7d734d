//! Document rendering: payment receipts and downloadable reports.
//!
//! Artifacts are produced as raw bytes so the rendering backend can change
//! without touching the handlers that serve or attach them.

use crate::store::bookings::RevenueSummary;
use crate::types::{Booking, Expense};

/// Renders a receipt artifact from a booking record.
pub trait ReceiptRenderer: Send + Sync {
    /// Produce the receipt bytes for a paid booking.
    fn render(&self, booking: &Booking) -> Vec<u8>;
}

/// Plain-text receipt renderer.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextReceiptRenderer;

impl ReceiptRenderer for TextReceiptRenderer {
    fn render(&self, booking: &Booking) -> Vec<u8> {
        let amount = booking
            .payment
            .amount
            .unwrap_or(booking.price.total_price);
        let receipt = format!(
            "Payment Receipt\n\
             ===============\n\
             Booking Reference: {}\n\
             Check-in Date:     {}\n\
             Check-out Date:    {}\n\
             Guests:            {} adult(s), {} child(ren), {} infant(s)\n\
             Room Cost:         {:.2}\n\
             Tax:               {:.2}\n\
             Maintenance:       {:.2}\n\
             Payment Amount:    {:.2}\n\
             Payment Status:    Paid\n\n\
             Thank you for your payment!\n",
            booking.reference,
            booking.check_in,
            booking.check_out,
            booking.guests.adults,
            booking.guests.children,
            booking.guests.infants_under_2,
            booking.price.room_cost,
            booking.price.tax,
            booking.price.maintenance_charge,
            amount,
        );
        receipt.into_bytes()
    }
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render the expense report as CSV bytes.
#[must_use]
pub fn expense_report_csv(expenses: &[Expense]) -> Vec<u8> {
    let mut out = String::from("date,category,amount,details\n");
    for expense in expenses {
        out.push_str(&format!(
            "{},{},{:.2},{}\n",
            expense.date,
            csv_escape(&expense.category),
            expense.amount,
            csv_escape(expense.details.as_deref().unwrap_or("")),
        ));
    }
    out.into_bytes()
}

/// Render the revenue report as CSV bytes.
#[must_use]
pub fn revenue_report_csv(summary: &RevenueSummary) -> Vec<u8> {
    let out = format!(
        "total_rent,total_maintenance_charge,total_tax,total_revenue\n{:.2},{:.2},{:.2},{:.2}\n",
        summary.total_rent, summary.total_maintenance_charge, summary.total_tax, summary.total_revenue,
    );
    out.into_bytes()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{
        BookingId, BookingStatus, ExpenseId, GuestCount, PaymentRecord, PaymentStatus,
        PriceBreakdown, ResidentId, RoomId,
    };
    use chrono::Utc;

    fn paid_booking() -> Booking {
        Booking {
            id: BookingId::new(),
            reference: "BOOK-1-0001".to_string(),
            resident_id: ResidentId::new(),
            room_id: RoomId::new(),
            check_in: "2030-01-10".parse().unwrap(),
            check_out: "2030-01-13".parse().unwrap(),
            guests: GuestCount {
                adults: 2,
                children: 0,
                infants_under_2: 0,
            },
            price: PriceBreakdown {
                base_price: 1000.0,
                total_nights: 3,
                room_cost: 6000.0,
                tax: 1080.0,
                maintenance_charge: 0.0,
                total_price: 7080.0,
            },
            status: BookingStatus::Confirmed,
            payment: PaymentRecord {
                status: PaymentStatus::Paid,
                capture_id: Some("cap-1".to_string()),
                amount: Some(7080.0),
                paid_at: Some(Utc::now()),
            },
            created_at: Utc::now(),
        }
    }

    #[test]
    fn receipt_names_the_reference_and_amount() {
        let bytes = TextReceiptRenderer.render(&paid_booking());
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("BOOK-1-0001"));
        assert!(text.contains("7080.00"));
        assert!(text.contains("2030-01-10"));
    }

    #[test]
    fn expense_csv_has_a_header_and_one_line_per_expense() {
        let expenses = vec![Expense {
            id: ExpenseId::new(),
            date: "2030-03-01".parse().unwrap(),
            category: "utilities".to_string(),
            amount: 120.5,
            details: Some("water, electricity".to_string()),
        }];
        let text = String::from_utf8(expense_report_csv(&expenses)).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("date,category,amount,details"));
        assert_eq!(
            lines.next(),
            Some("2030-03-01,utilities,120.50,\"water, electricity\"")
        );
    }

    #[test]
    fn revenue_csv_carries_the_totals() {
        let summary = RevenueSummary {
            total_rent: 4000.0,
            total_maintenance_charge: 100.0,
            total_tax: 720.0,
            total_revenue: 4820.0,
        };
        let text = String::from_utf8(revenue_report_csv(&summary)).unwrap();
        assert!(text.ends_with("4000.00,100.00,720.00,4820.00\n"));
    }
}
