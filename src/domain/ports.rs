use uuid::Uuid;

use super::errors::DomainError;
use super::order::{CreatedOrder, Invoice, OrderDraft, OrderView};

pub trait OrderRepository: Send + Sync + 'static {
    /// Persist the header and its lines, render the invoice and attach its
    /// path, all inside one transaction. Nothing is visible on failure.
    fn create(
        &self,
        draft: OrderDraft,
        renderer: &dyn InvoiceRenderer,
        store: &dyn InvoiceStore,
    ) -> Result<CreatedOrder, DomainError>;

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;

    /// Idempotent: setting the same path twice is a no-op.
    fn attach_invoice(&self, order_id: Uuid, path: &str) -> Result<(), DomainError>;

    /// Returns false when no such order exists. Lines go with the order.
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

pub trait InvoiceRenderer: Send + Sync + 'static {
    fn render(&self, invoice: &Invoice) -> Result<Vec<u8>, DomainError>;
}

pub trait InvoiceStore: Send + Sync + 'static {
    /// Write the document and return the path it is retrievable under.
    fn write(&self, name: &str, bytes: &[u8]) -> Result<String, DomainError>;

    /// Best-effort cleanup; missing files are not an error.
    fn remove(&self, name: &str) -> Result<(), DomainError>;
}
