use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of every client-generated invoice id.
pub const INVOICE_ID_PREFIX: &str = "INV-";

/// An invoice as entered on the client, ready to be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invoice {
    pub invoice_id: String,
    pub customer_name: String,
    pub customer_address: String,
    pub customer_number: String,
    /// Kept exactly as entered; parsed only for display.
    pub total_amount: String,
    pub order_items: String,
}

impl Invoice {
    /// An empty invoice carrying only a freshly generated id.
    pub fn with_new_id() -> Self {
        Self {
            invoice_id: generate_invoice_id(),
            ..Default::default()
        }
    }

    /// Names of required fields that are empty or whitespace.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("invoice id", &self.invoice_id),
            ("customer name", &self.customer_name),
            ("total amount", &self.total_amount),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Form fields in the order the endpoint expects them.
    pub fn to_form(&self) -> Vec<(String, String)> {
        [
            ("invoiceId", &self.invoice_id),
            ("customerName", &self.customer_name),
            ("customerAddress", &self.customer_address),
            ("customerNumber", &self.customer_number),
            ("totalAmount", &self.total_amount),
            ("orderItems", &self.order_items),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
    }

    pub fn total(&self) -> f64 {
        parse_amount(&self.total_amount)
    }
}

/// Generates an id from the current instant, e.g. `INV-1718000000000`.
///
/// Two ids generated within the same millisecond collide.
pub fn generate_invoice_id() -> String {
    invoice_id_at(Utc::now())
}

pub fn invoice_id_at(instant: DateTime<Utc>) -> String {
    format!("{}{}", INVOICE_ID_PREFIX, instant.timestamp_millis())
}

/// Parses the leading decimal number of a user-entered amount.
///
/// Trailing text is ignored (`12.50 USD` is 12.5). A value that does not
/// start with a number, such as `$7`, or that overflows counts as zero.
pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut digits = leading_digits(&bytes[end..]);
    end += digits;

    if bytes.get(end) == Some(&b'.') {
        let frac_digits = leading_digits(&bytes[end + 1..]);
        if digits + frac_digits > 0 {
            end += 1 + frac_digits;
            digits += frac_digits;
        }
    }
    if digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = leading_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn leading_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Formats an amount as dollars with two decimals, e.g. `$12.50`.
pub fn format_amount(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// A single spreadsheet cell as returned by the endpoint.
///
/// Sheets hand back numbers for numeric-looking columns, so every field
/// of a stored invoice may arrive as either a string or a number.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    #[default]
    Empty,
}

impl Cell {
    pub fn as_f64(&self) -> f64 {
        match self {
            Cell::Number(n) => n.as_f64().unwrap_or(0.0),
            Cell::Text(s) => parse_amount(s),
            Cell::Bool(_) | Cell::Empty => 0.0,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Empty => Ok(()),
        }
    }
}

/// An invoice row as stored in the spreadsheet.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct StoredInvoice {
    #[serde(rename = "Invoice ID", default)]
    pub invoice_id: Cell,
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Cell,
    #[serde(rename = "Customer Name", default)]
    pub customer_name: Cell,
    #[serde(rename = "Customer Address", default)]
    pub customer_address: Cell,
    #[serde(rename = "Customer Phone", default)]
    pub customer_phone: Cell,
    #[serde(rename = "Order Items Text", default)]
    pub order_items: Cell,
    #[serde(rename = "Total Amount", default)]
    pub total_amount: Cell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn filled() -> Invoice {
        Invoice {
            invoice_id: "INV-1".into(),
            customer_name: "Ada".into(),
            customer_address: "1 Loop Rd".into(),
            customer_number: "555-0100".into(),
            total_amount: "12.5".into(),
            order_items: "2x widget".into(),
        }
    }

    #[test]
    fn test_invoice_id_at_uses_millis() {
        let instant = Utc.timestamp_millis_opt(1_718_000_000_123).unwrap();
        assert_eq!(invoice_id_at(instant), "INV-1718000000123");
    }

    #[test]
    fn test_generate_invoice_id_format() {
        let id = generate_invoice_id();
        let digits = id.strip_prefix(INVOICE_ID_PREFIX).unwrap();
        assert!(!digits.is_empty());
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_with_new_id_leaves_other_fields_empty() {
        let invoice = Invoice::with_new_id();
        assert!(invoice.invoice_id.starts_with(INVOICE_ID_PREFIX));
        assert!(invoice.customer_name.is_empty());
        assert_eq!(invoice.missing_fields(), vec!["customer name", "total amount"]);
    }

    #[test]
    fn test_missing_fields_ignores_optional_fields() {
        let mut invoice = filled();
        invoice.customer_address.clear();
        invoice.order_items.clear();
        assert!(invoice.missing_fields().is_empty());

        invoice.customer_name = "   ".into();
        assert_eq!(invoice.missing_fields(), vec!["customer name"]);
    }

    #[test]
    fn test_to_form_order_and_names() {
        let form = filled().to_form();
        let keys: Vec<&str> = form.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "invoiceId",
                "customerName",
                "customerAddress",
                "customerNumber",
                "totalAmount",
                "orderItems"
            ]
        );
        assert_eq!(form[4].1, "12.5");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.5"), 12.5);
        assert_eq!(parse_amount(" 7 "), 7.0);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
    }

    #[test]
    fn test_parse_amount_reads_leading_number_only() {
        assert_eq!(parse_amount("12.50 USD"), 12.5);
        assert_eq!(parse_amount("$7"), 0.0);
        assert_eq!(parse_amount("-3.25"), -3.25);
        assert_eq!(parse_amount("+4"), 4.0);
        assert_eq!(parse_amount(".5"), 0.5);
        assert_eq!(parse_amount("5."), 5.0);
        assert_eq!(parse_amount("1e2 items"), 100.0);
        assert_eq!(parse_amount("3e"), 3.0);
        assert_eq!(parse_amount("-"), 0.0);
        assert_eq!(parse_amount("."), 0.0);
        assert_eq!(parse_amount("-.x"), 0.0);
        assert_eq!(parse_amount("1e400"), 0.0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(12.5), "$12.50");
        assert_eq!(format_amount(0.0), "$0.00");
        assert_eq!(filled().total(), 12.5);
    }

    #[test]
    fn test_stored_invoice_accepts_numbers_and_strings() {
        let json = r#"{
            "Invoice ID": "INV-1",
            "Timestamp": "2024-06-10T08:30:00.000Z",
            "Customer Name": "Ada",
            "Customer Address": "1 Loop Rd",
            "Customer Phone": 5550100,
            "Order Items Text": "2x widget",
            "Total Amount": 12.5
        }"#;
        let stored: StoredInvoice = serde_json::from_str(json).unwrap();
        assert_eq!(stored.invoice_id, Cell::Text("INV-1".into()));
        assert_eq!(stored.customer_phone.to_string(), "5550100");
        assert_eq!(stored.total_amount.as_f64(), 12.5);
    }

    #[test]
    fn test_stored_invoice_missing_and_null_fields() {
        let stored: StoredInvoice =
            serde_json::from_str(r#"{"Invoice ID": "INV-2", "Customer Phone": null}"#).unwrap();
        assert_eq!(stored.customer_phone, Cell::Empty);
        assert_eq!(stored.customer_name, Cell::Empty);
        assert_eq!(stored.customer_name.to_string(), "");
        assert_eq!(stored.total_amount.as_f64(), 0.0);
    }
}
