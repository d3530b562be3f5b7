//! Plain-text renderings of invoices: the print view and search details.

use chrono::{DateTime, NaiveDate};

use super::model::{Cell, Invoice, StoredInvoice, format_amount};

/// Renders the print view of an invoice being entered.
pub fn render_print_view(invoice: &Invoice) -> String {
    let mut out = String::new();
    out.push_str("INVOICE\n");
    out.push_str(&format!("Invoice ID: {}\n\n", invoice.invoice_id));
    out.push_str("Bill To:\n");
    out.push_str(&format!("  {}\n", invoice.customer_name));
    for line in invoice.customer_address.lines() {
        out.push_str(&format!("  {}\n", line));
    }
    out.push_str(&format!("  {}\n\n", invoice.customer_number));
    out.push_str("Order Items:\n");
    if !invoice.order_items.is_empty() {
        out.push_str(&invoice.order_items);
        if !invoice.order_items.ends_with('\n') {
            out.push('\n');
        }
    }
    out.push('\n');
    out.push_str(&format!("TOTAL: {}\n", format_amount(invoice.total())));
    out
}

/// Renders the details block shown for a found invoice.
pub fn render_search_details(invoice: &StoredInvoice) -> String {
    let mut details = format!("Invoice ID: {}\n", invoice.invoice_id);
    details += &format!("Date: {}\n\n", format_date(&invoice.timestamp));
    details += &format!("Customer Name: {}\n", invoice.customer_name);
    details += &format!("Customer Address: {}\n", invoice.customer_address);
    details += &format!("Customer Phone: {}\n\n", invoice.customer_phone);
    details += "--- Order Items ---\n";
    details += &format!("{}\n\n", invoice.order_items);
    details += &format!("TOTAL: {}", format_amount(invoice.total_amount.as_f64()));
    details
}

/// Renders the details block shown when the endpoint rejected a search.
pub fn render_not_found(message: &str) -> String {
    format!("Error: {}", message)
}

/// Formats a timestamp cell as `YYYY-MM-DD`, falling back to the raw value.
///
/// Numbers are taken as milliseconds since the Unix epoch.
fn format_date(cell: &Cell) -> String {
    let date = match cell {
        Cell::Text(s) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.date_naive())
            .ok()
            .or_else(|| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()),
        Cell::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        Cell::Bool(_) | Cell::Empty => None,
    };

    match date {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => cell.to_string(),
    }
}
