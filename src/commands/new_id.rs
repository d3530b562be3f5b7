use crate::invoice::generate_invoice_id;

/// Prints a fresh invoice id, the same way a new form starts out.
pub fn new_id() {
    println!("{}", generate_invoice_id());
}
