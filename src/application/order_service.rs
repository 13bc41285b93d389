use std::collections::HashSet;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{CreatedOrder, OrderDraft, OrderView};
use crate::domain::ports::{InvoiceRenderer, InvoiceStore, OrderRepository};

/// Drives the order workflow: validate the cart, then hand the draft to the
/// repository, which writes, renders and finalizes atomically.
pub struct OrderService<R, P, S> {
    repo: R,
    renderer: P,
    store: S,
}

impl<R, P, S> OrderService<R, P, S>
where
    R: OrderRepository,
    P: InvoiceRenderer,
    S: InvoiceStore,
{
    pub fn new(repo: R, renderer: P, store: S) -> Self {
        Self {
            repo,
            renderer,
            store,
        }
    }

    pub fn create_order(&self, draft: OrderDraft) -> Result<CreatedOrder, DomainError> {
        validate(&draft)?;
        self.repo.create(draft, &self.renderer, &self.store)
    }

    pub fn get_order(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        self.repo.find_by_id(id)
    }

    /// Retryable on its own; the repository update is idempotent.
    pub fn finalize(&self, order_id: Uuid, path: &str) -> Result<(), DomainError> {
        self.repo.attach_invoice(order_id, path)
    }

    pub fn delete_order(&self, id: Uuid) -> Result<bool, DomainError> {
        self.repo.delete(id)
    }
}

/// Intake checks run before anything touches the database.
fn validate(draft: &OrderDraft) -> Result<(), DomainError> {
    if draft.lines.is_empty() {
        return Err(DomainError::InvalidInput(
            "an order needs at least one line".to_string(),
        ));
    }
    if draft.lines.iter().any(|l| l.quantity <= 0) {
        return Err(DomainError::InvalidInput(
            "line quantity must be positive".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    if !draft.lines.iter().all(|l| seen.insert(l.item_id)) {
        return Err(DomainError::InvalidInput(
            "an item may only appear once per order".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::domain::order::{Invoice, OrderLineInput};

    /// Counts calls so tests can assert validation short-circuits writes.
    #[derive(Default)]
    struct RecordingRepo {
        creates: Arc<AtomicUsize>,
    }

    impl OrderRepository for RecordingRepo {
        fn create(
            &self,
            draft: OrderDraft,
            _renderer: &dyn InvoiceRenderer,
            _store: &dyn InvoiceStore,
        ) -> Result<CreatedOrder, DomainError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            Ok(CreatedOrder {
                id: draft.customer_id,
                invoice_path: "/tmp/invoice.pdf".to_string(),
                total_pre_tax: 0.into(),
                total_incl_tax: 0.into(),
            })
        }

        fn find_by_id(&self, _id: Uuid) -> Result<Option<OrderView>, DomainError> {
            Ok(None)
        }

        fn attach_invoice(&self, _order_id: Uuid, _path: &str) -> Result<(), DomainError> {
            Ok(())
        }

        fn delete(&self, _id: Uuid) -> Result<bool, DomainError> {
            Ok(false)
        }
    }

    struct NoopRenderer;

    impl InvoiceRenderer for NoopRenderer {
        fn render(&self, _invoice: &Invoice) -> Result<Vec<u8>, DomainError> {
            Ok(b"%PDF".to_vec())
        }
    }

    struct NoopStore;

    impl InvoiceStore for NoopStore {
        fn write(&self, name: &str, _bytes: &[u8]) -> Result<String, DomainError> {
            Ok(format!("/tmp/{name}"))
        }

        fn remove(&self, _name: &str) -> Result<(), DomainError> {
            Ok(())
        }
    }

    fn service() -> (OrderService<RecordingRepo, NoopRenderer, NoopStore>, Arc<AtomicUsize>) {
        let creates = Arc::new(AtomicUsize::new(0));
        let repo = RecordingRepo {
            creates: Arc::clone(&creates),
        };
        (OrderService::new(repo, NoopRenderer, NoopStore), creates)
    }

    fn draft(lines: Vec<OrderLineInput>) -> OrderDraft {
        OrderDraft {
            customer_id: Uuid::new_v4(),
            payment_id: Uuid::new_v4(),
            address_id: Uuid::new_v4(),
            ordered_at: Utc::now().date_naive(),
            lines,
        }
    }

    #[test]
    fn empty_cart_is_rejected_before_any_write() {
        let (svc, creates) = service();

        let result = svc.create_order(draft(vec![]));

        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
        assert_eq!(creates.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        let (svc, creates) = service();

        let result = svc.create_order(draft(vec![OrderLineInput {
            item_id: Uuid::new_v4(),
            quantity: 0,
        }]));

        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
        assert_eq!(creates.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn duplicate_items_are_rejected() {
        let (svc, creates) = service();
        let item_id = Uuid::new_v4();

        let result = svc.create_order(draft(vec![
            OrderLineInput {
                item_id,
                quantity: 1,
            },
            OrderLineInput {
                item_id,
                quantity: 2,
            },
        ]));

        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
        assert_eq!(creates.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn valid_draft_reaches_the_repository() {
        let (svc, creates) = service();

        svc.create_order(draft(vec![OrderLineInput {
            item_id: Uuid::new_v4(),
            quantity: 2,
        }]))
        .expect("create failed");

        assert_eq!(creates.load(Ordering::SeqCst), 1);
    }
}
