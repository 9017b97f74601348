//! Property tests for ledger invariants.
//!
//! Random operation sequences are decided and applied against a single
//! event; whatever gets accepted must keep ticket counters consistent and
//! value conserved between custody and accounts.

use common::{AccountId, Amount, EventId, PurchaseId};
use domain::{
    Aggregate, CallContext, CancelPurchase, CreateEvent, Genesis, Ledger, LedgerCommand,
    PurchaseStatus, PurchaseTickets,
};
use proptest::prelude::*;

const PRICE: u128 = 250;
const TICKETS: u32 = 20;

#[derive(Debug, Clone)]
enum Op {
    Buy { customer: usize, quantity: u32 },
    Cancel { purchase: u64 },
    Refund { purchase: u64 },
    CheckIn { customer: usize, purchase: u64 },
    Deposit { customer: usize, amount: u128 },
    SuspendSales,
    ResumeSales,
}

fn customers() -> [AccountId; 3] {
    [
        AccountId::person("0xalice"),
        AccountId::person("0xbob"),
        AccountId::program("0xbot"),
    ]
}

fn owner() -> AccountId {
    AccountId::person("0xowner")
}

fn organizer() -> AccountId {
    AccountId::person("0xorganizer")
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0usize..3, 0u32..6).prop_map(|(customer, quantity)| Op::Buy { customer, quantity }),
        2 => (0u64..12).prop_map(|purchase| Op::Cancel { purchase }),
        2 => (0u64..12).prop_map(|purchase| Op::Refund { purchase }),
        2 => (0usize..3, 0u64..12).prop_map(|(customer, purchase)| Op::CheckIn { customer, purchase }),
        1 => (0usize..3, 0u128..500).prop_map(|(customer, amount)| Op::Deposit { customer, amount }),
        1 => Just(Op::SuspendSales),
        1 => Just(Op::ResumeSales),
    ]
}

fn incentive_strategy() -> impl Strategy<Value = u32> {
    prop_oneof![Just(0u32), Just(10_000u32), 0u32..=10_000]
}

/// Open store with one event on sale.
fn selling_ledger(incentive_bps: u32) -> Ledger {
    let mut genesis = Genesis::new(owner(), "Bileto");
    for customer in customers() {
        genesis = genesis.allocate(customer, Amount::new(5_000));
    }
    let mut ledger = Ledger::new(genesis).unwrap();

    let setup = [
        (owner(), LedgerCommand::OpenStore),
        (
            owner(),
            LedgerCommand::CreateEvent(CreateEvent::new(
                "evt-prop",
                organizer(),
                "Property Night",
                incentive_bps,
                Amount::new(PRICE),
                TICKETS,
            )),
        ),
        (
            organizer(),
            LedgerCommand::StartTicketSales {
                event_id: EventId::new(1),
            },
        ),
    ];
    for (caller, command) in setup {
        let notifications = ledger
            .decide(&CallContext::new(caller), &command)
            .unwrap();
        ledger.apply_events(notifications);
    }
    ledger
}

/// Decides and applies, returning whether the ledger accepted the command.
fn step(ledger: &mut Ledger, ctx: CallContext, command: LedgerCommand) -> bool {
    match ledger.decide(&ctx, &command) {
        Ok(notifications) => {
            ledger.apply_events(notifications);
            true
        }
        Err(_) => false,
    }
}

fn run(ledger: &mut Ledger, op: Op) -> bool {
    let event_id = EventId::new(1);
    let customers = customers();

    match op {
        Op::Buy { customer, quantity } => {
            let external_id = format!("order-{}", ledger.purchases().len() + 1);
            let value = Amount::new(PRICE * u128::from(quantity));
            step(
                ledger,
                CallContext::new(customers[customer].clone()).with_value(value),
                LedgerCommand::PurchaseTickets(PurchaseTickets::new(
                    event_id,
                    quantity,
                    external_id.as_str(),
                    1_700_000_000,
                    format!("customer-{customer}"),
                )),
            )
        }
        Op::Cancel { purchase } => {
            let purchase_id = PurchaseId::new(purchase);
            let customer_id = match ledger.purchase(purchase_id) {
                Ok(p) => customers
                    .iter()
                    .position(|c| *c == p.customer)
                    .map(|i| format!("customer-{i}"))
                    .unwrap_or_default(),
                Err(_) => String::new(),
            };
            step(
                ledger,
                CallContext::new(AccountId::person("0xanyone")),
                LedgerCommand::CancelPurchase(CancelPurchase::new(
                    purchase_id,
                    format!("order-{purchase}"),
                    customer_id,
                )),
            )
        }
        Op::Refund { purchase } => step(
            ledger,
            CallContext::new(organizer()),
            LedgerCommand::RefundPurchase {
                event_id,
                purchase_id: PurchaseId::new(purchase),
            },
        ),
        Op::CheckIn { customer, purchase } => step(
            ledger,
            CallContext::new(customers[customer].clone()),
            LedgerCommand::CheckIn {
                purchase_id: PurchaseId::new(purchase),
            },
        ),
        Op::Deposit { customer, amount } => step(
            ledger,
            CallContext::new(customers[customer].clone()).with_value(Amount::new(amount)),
            LedgerCommand::ReceiveFunds,
        ),
        Op::SuspendSales => step(
            ledger,
            CallContext::new(organizer()),
            LedgerCommand::SuspendTicketSales { event_id },
        ),
        Op::ResumeSales => step(
            ledger,
            CallContext::new(organizer()),
            LedgerCommand::StartTicketSales { event_id },
        ),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn accepted_operations_preserve_invariants(
        incentive_bps in incentive_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let mut ledger = selling_ledger(incentive_bps);

        for op in ops {
            let before = ledger.clone();
            let accepted = run(&mut ledger, op.clone());
            if !accepted {
                prop_assert_eq!(ledger.store(), before.store(), "rejected {:?} changed state", op);
                prop_assert_eq!(ledger.events(), before.events());
                prop_assert_eq!(ledger.purchases(), before.purchases());
                prop_assert_eq!(ledger.custody(), before.custody());
            }

            let event = ledger.event(EventId::new(1)).unwrap();
            prop_assert_eq!(event.tickets_sold + event.tickets_left, TICKETS);
            prop_assert!(ledger.check_invariants().is_ok(), "{:?}", ledger.check_invariants());
        }
    }

    #[test]
    fn settlement_and_close_drain_custody(
        incentive_bps in incentive_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..30),
    ) {
        let mut ledger = selling_ledger(incentive_bps);
        for op in ops {
            run(&mut ledger, op);
        }

        let event_id = EventId::new(1);
        for command in [
            LedgerCommand::EndTicketSales { event_id },
            LedgerCommand::CompleteEvent { event_id },
        ] {
            prop_assert!(step(&mut ledger, CallContext::new(organizer()), command));
        }
        let balance = ledger.event(event_id).unwrap().balance;
        let settle = LedgerCommand::SettleEvent { event_id };
        prop_assert!(step(&mut ledger, CallContext::new(owner()), settle));

        // The whole balance leaves the event, split between store and organizer.
        let settled = ledger.store().settled_balance;
        prop_assert_eq!(
            settled.saturating_add(ledger.account_balance(&organizer())),
            balance
        );
        prop_assert!(settled.units() * 10_000 <= balance.units() * u128::from(incentive_bps));

        let awaiting_refund: Vec<_> = ledger
            .purchases()
            .iter()
            .filter(|p| p.status == PurchaseStatus::Cancelled)
            .map(|p| p.id)
            .collect();
        for purchase_id in awaiting_refund {
            let refund = LedgerCommand::RefundPurchase { event_id, purchase_id };
            prop_assert!(step(&mut ledger, CallContext::new(organizer()), refund));
        }

        prop_assert!(step(&mut ledger, CallContext::new(owner()), LedgerCommand::CloseStore));
        prop_assert_eq!(ledger.custody(), Amount::ZERO);
        prop_assert!(ledger.check_invariants().is_ok(), "{:?}", ledger.check_invariants());
    }
}
