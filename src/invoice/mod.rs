pub mod pdf;
pub mod store;

pub use pdf::PdfInvoiceRenderer;
pub use store::FileInvoiceStore;
