//! Invoice records and their text renderings.

mod model;
mod view;

pub use model::{
    Cell, INVOICE_ID_PREFIX, Invoice, StoredInvoice, format_amount, generate_invoice_id,
    invoice_id_at, parse_amount,
};
pub use view::{render_not_found, render_print_view, render_search_details};
