use common::{AccountId, Amount, EventId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{CancelPurchase, CreateEvent, Genesis, LedgerService, PurchaseTickets};
use journal::InMemoryJournal;

const PRICE: u128 = 1_000;

fn owner() -> AccountId {
    AccountId::person("0xowner")
}

fn organizer() -> AccountId {
    AccountId::person("0xorganizer")
}

fn customer() -> AccountId {
    AccountId::person("0xcustomer")
}

fn genesis() -> Genesis {
    Genesis::new(owner(), "Bileto").allocate(customer(), Amount::new(u128::MAX / 2))
}

fn concert() -> CreateEvent {
    CreateEvent::new(
        "bench-event",
        organizer(),
        "Benchmark Night",
        500,
        Amount::new(PRICE),
        u32::MAX,
    )
}

async fn selling_service() -> (LedgerService<InMemoryJournal>, EventId) {
    let service = LedgerService::new(InMemoryJournal::new(), genesis()).unwrap();
    service.open_store(owner()).await.unwrap();
    let event_id = service
        .create_event(owner(), concert())
        .await
        .unwrap()
        .created_event_id()
        .unwrap();
    service
        .start_ticket_sales(organizer(), event_id)
        .await
        .unwrap();
    (service, event_id)
}

fn bench_create_event(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("ledger/create_event", |b| {
        b.iter(|| {
            rt.block_on(async {
                let service = LedgerService::new(InMemoryJournal::new(), genesis()).unwrap();
                service.open_store(owner()).await.unwrap();
                service.create_event(owner(), concert()).await.unwrap();
            });
        });
    });
}

fn bench_purchase_tickets(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let (service, event_id) = rt.block_on(selling_service());

    c.bench_function("ledger/purchase_tickets", |b| {
        b.iter(|| {
            rt.block_on(async {
                service
                    .purchase_tickets(
                        customer(),
                        Amount::new(PRICE),
                        PurchaseTickets::new(event_id, 1, "bench-order", 1_700_000_000, "bench"),
                    )
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_purchase_cancel_refund(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let (service, event_id) = rt.block_on(selling_service());

    c.bench_function("ledger/purchase_cancel_refund", |b| {
        b.iter(|| {
            rt.block_on(async {
                let purchase_id = service
                    .purchase_tickets(
                        customer(),
                        Amount::new(PRICE),
                        PurchaseTickets::new(event_id, 1, "bench-order", 1_700_000_000, "bench"),
                    )
                    .await
                    .unwrap()
                    .created_purchase_id()
                    .unwrap();
                service
                    .cancel_purchase(
                        customer(),
                        CancelPurchase::new(purchase_id, "bench-order", "bench"),
                    )
                    .await
                    .unwrap();
                service
                    .refund_purchase(organizer(), event_id, purchase_id)
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_restore(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let journal = InMemoryJournal::new();
    rt.block_on(async {
        let service = LedgerService::new(journal.clone(), genesis()).unwrap();
        service.open_store(owner()).await.unwrap();
        let event_id = service
            .create_event(owner(), concert())
            .await
            .unwrap()
            .created_event_id()
            .unwrap();
        service
            .start_ticket_sales(organizer(), event_id)
            .await
            .unwrap();
        for n in 0..500 {
            service
                .purchase_tickets(
                    customer(),
                    Amount::new(PRICE),
                    PurchaseTickets::new(event_id, 1, format!("order-{n}"), 1_700_000_000, "bench"),
                )
                .await
                .unwrap();
        }
    });

    c.bench_function("ledger/restore_500_purchases", |b| {
        b.iter(|| {
            rt.block_on(async {
                LedgerService::restore(journal.clone(), genesis())
                    .await
                    .unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_create_event,
    bench_purchase_tickets,
    bench_purchase_cancel_refund,
    bench_restore
);
criterion_main!(benches);
