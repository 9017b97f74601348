//! Ledger aggregate implementation.

use common::{AccountId, Amount, EventId, PurchaseId};
use journal::Sequence;
use serde::{Deserialize, Serialize};

use crate::access::{AccountRoles, Resource, Role, authorize};
use crate::accounting::{AccountBook, BASIS_POINTS, incentive_split, purchase_total};
use crate::aggregate::Aggregate;
use crate::validation::{
    ensure, require_exact_value, require_funds, require_no_value, require_overflow_free,
    require_secret, require_text,
};

use super::{
    CallContext, CancelPurchase, CreateEvent, CustomerCheckedInData, Event, EventCancelledData,
    EventCreatedData, EventInfo, EventSalesInfo, EventSettledData, EventStatus,
    EventTransitionData, FundsReceivedData, LedgerCommand, LedgerError, Notification,
    OwnershipTransferredData, Purchase, PurchaseCancelledData, PurchaseCompletedData,
    PurchaseInfo, PurchaseRefundedData, PurchaseStatus, PurchaseTickets, Store, StoreClosedData,
    StoreInfo, StoreStatus, StoreTransitionData,
};

/// Starting balance of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub account: AccountId,
    pub balance: Amount,
}

/// Initial ledger state: the store owner, its name and funded accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    pub owner: AccountId,
    pub store_name: String,
    #[serde(default)]
    pub allocations: Vec<Allocation>,
}

impl Genesis {
    pub fn new(owner: AccountId, store_name: impl Into<String>) -> Self {
        Self {
            owner,
            store_name: store_name.into(),
            allocations: Vec::new(),
        }
    }

    pub fn allocate(mut self, account: AccountId, balance: Amount) -> Self {
        self.allocations.push(Allocation { account, balance });
        self
    }

    /// Total value allocated. Fails with `AmountOverflow` when the
    /// allocations do not fit in an `Amount`.
    pub fn supply(&self) -> Result<Amount, LedgerError> {
        self.allocations
            .iter()
            .try_fold(Amount::ZERO, |total, allocation| {
                require_overflow_free(total.checked_add(allocation.balance))
            })
    }
}

/// Ledger aggregate root.
///
/// Holds the store singleton, the event and purchase registries, and the
/// balances accounts keep outside custody. Records are indexed densely:
/// id `n` lives at slot `n - 1`.
#[derive(Debug, Clone)]
pub struct Ledger {
    sequence: Sequence,
    store: Store,
    events: Vec<Event>,
    purchases: Vec<Purchase>,
    accounts: AccountBook,
    /// Total value in existence, fixed at genesis.
    supply: Amount,
}

impl Aggregate for Ledger {
    type Event = Notification;
    type Error = LedgerError;

    fn sequence(&self) -> Sequence {
        self.sequence
    }

    fn set_sequence(&mut self, sequence: Sequence) {
        self.sequence = sequence;
    }

    fn apply(&mut self, notification: Notification) {
        let payouts = notification.payouts();
        self.apply_record(notification);
        for payout in &payouts {
            self.accounts.pay(payout);
        }
    }

    /// Applies every record mutation of the batch before crediting any
    /// payout, so no recipient observes a half-applied operation.
    fn apply_events(&mut self, notifications: impl IntoIterator<Item = Self::Event>) {
        let mut payouts = Vec::new();
        for notification in notifications {
            payouts.extend(notification.payouts());
            self.apply_record(notification);
        }
        for payout in &payouts {
            self.accounts.pay(payout);
        }
    }
}

// Query methods
impl Ledger {
    /// Builds the ledger at genesis. Rejects allocations whose total
    /// overflows, since every balance is bounded by the supply.
    pub fn new(genesis: Genesis) -> Result<Self, LedgerError> {
        let supply = genesis.supply()?;
        let mut accounts = AccountBook::new();
        for allocation in &genesis.allocations {
            accounts.credit(&allocation.account, allocation.balance);
        }

        Ok(Self {
            sequence: Sequence::initial(),
            store: Store::new(genesis.owner, genesis.store_name),
            events: Vec::new(),
            purchases: Vec::new(),
            accounts,
            supply,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    pub fn event(&self, event_id: EventId) -> Result<&Event, LedgerError> {
        event_id
            .slot()
            .and_then(|slot| self.events.get(slot))
            .ok_or(LedgerError::EventNotFound(event_id))
    }

    pub fn purchase(&self, purchase_id: PurchaseId) -> Result<&Purchase, LedgerError> {
        purchase_id
            .slot()
            .and_then(|slot| self.purchases.get(slot))
            .ok_or(LedgerError::PurchaseNotFound(purchase_id))
    }

    pub fn store_info(&self) -> StoreInfo {
        StoreInfo::from(&self.store)
    }

    pub fn event_info(&self, event_id: EventId) -> Result<EventInfo, LedgerError> {
        self.event(event_id).map(EventInfo::from)
    }

    pub fn event_sales_info(&self, event_id: EventId) -> Result<EventSalesInfo, LedgerError> {
        self.event(event_id).map(EventSalesInfo::from)
    }

    pub fn purchase_info(&self, purchase_id: PurchaseId) -> Result<PurchaseInfo, LedgerError> {
        self.purchase(purchase_id).map(PurchaseInfo::from)
    }

    pub fn account_roles(&self, account: &AccountId) -> AccountRoles {
        AccountRoles {
            is_owner: *account == self.store.owner,
            is_organizer: self.events.iter().any(|e| e.organizer == *account),
            is_customer: self.purchases.iter().any(|p| p.customer == *account),
        }
    }

    /// Ids of the events `account` organizes, ascending.
    pub fn organizer_events(&self, account: &AccountId) -> Vec<EventId> {
        self.events
            .iter()
            .filter(|e| e.organizer == *account)
            .map(|e| e.id)
            .collect()
    }

    /// Ids of the purchases `account` made, ascending.
    pub fn customer_purchases(&self, account: &AccountId) -> Vec<PurchaseId> {
        self.purchases
            .iter()
            .filter(|p| p.customer == *account)
            .map(|p| p.id)
            .collect()
    }

    /// Balance `account` holds outside the ledger.
    pub fn account_balance(&self, account: &AccountId) -> Amount {
        self.accounts.balance_of(account)
    }

    /// Value currently held in custody.
    pub fn custody(&self) -> Amount {
        let events: Amount = self.events.iter().map(|e| e.balance).sum();
        events
            .saturating_add(self.store.refundable_balance)
            .saturating_add(self.store.settled_balance)
            .saturating_add(self.store.excess_balance)
    }

    pub fn supply(&self) -> Amount {
        self.supply
    }

    /// Verifies the cross-record invariants, describing the first violation.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.store.counter_events != self.events.len() as u64
            || self.store.counter_purchases != self.purchases.len() as u64
        {
            return Err("store counters do not match the registries".to_string());
        }

        let mut store_refundable = Amount::ZERO;
        for (slot, event) in self.events.iter().enumerate() {
            if event.id.slot() != Some(slot) {
                return Err(format!("event {} stored at slot {slot}", event.id));
            }
            if u64::from(event.tickets_sold) + u64::from(event.tickets_left)
                != u64::from(event.tickets_on_sale)
            {
                return Err(format!("event {}: sold + left != on sale", event.id));
            }
            if event.store_incentive_bps > BASIS_POINTS {
                return Err(format!("event {}: incentive out of range", event.id));
            }

            let purchases = self.purchases.iter().filter(|p| p.event_id == event.id);
            let held: Amount = purchases
                .clone()
                .filter(|p| p.status.holds_event_balance())
                .map(|p| p.total)
                .sum();
            let refundable: Amount = purchases
                .filter(|p| p.status == PurchaseStatus::Cancelled)
                .map(|p| p.total)
                .sum();

            if event.status != EventStatus::Settled && event.balance != held {
                return Err(format!("event {}: balance {} != {held}", event.id, event.balance));
            }
            if event.refundable_balance != refundable {
                return Err(format!(
                    "event {}: refundable {} != {refundable}",
                    event.id, event.refundable_balance
                ));
            }
            store_refundable = store_refundable.saturating_add(event.refundable_balance);
        }

        if self.store.refundable_balance != store_refundable {
            return Err("store refundable balance != sum over events".to_string());
        }

        for (slot, purchase) in self.purchases.iter().enumerate() {
            if purchase.id.slot() != Some(slot) {
                return Err(format!("purchase {} stored at slot {slot}", purchase.id));
            }
            let price = self.event(purchase.event_id).map_err(|e| e.to_string())?.ticket_price;
            if purchase_total(price, purchase.quantity) != Some(purchase.total) {
                return Err(format!("purchase {}: total != quantity * price", purchase.id));
            }
        }

        if self.custody().checked_add(self.accounts.total()) != Some(self.supply) {
            return Err("custody plus account balances != supply".to_string());
        }

        Ok(())
    }
}

// Command methods (return notifications)
impl Ledger {
    /// Decides the notifications `command` produces, without mutating.
    pub fn decide(
        &self,
        ctx: &CallContext,
        command: &LedgerCommand,
    ) -> Result<Vec<Notification>, LedgerError> {
        if !command.is_payable() {
            require_no_value(command.name(), ctx.value)?;
        }

        let caller = &ctx.caller;
        match command {
            LedgerCommand::OpenStore => self.open_store(caller),
            LedgerCommand::SuspendStore => self.suspend_store(caller),
            LedgerCommand::CloseStore => self.close_store(caller),
            LedgerCommand::TransferOwnership { new_owner } => {
                self.transfer_ownership(caller, new_owner)
            }
            LedgerCommand::ReceiveFunds => self.receive_funds(caller, ctx.value),
            LedgerCommand::CreateEvent(cmd) => self.create_event(caller, cmd),
            LedgerCommand::StartTicketSales { event_id } => {
                self.start_ticket_sales(caller, *event_id)
            }
            LedgerCommand::SuspendTicketSales { event_id } => {
                self.suspend_ticket_sales(caller, *event_id)
            }
            LedgerCommand::EndTicketSales { event_id } => self.end_ticket_sales(caller, *event_id),
            LedgerCommand::CompleteEvent { event_id } => self.complete_event(caller, *event_id),
            LedgerCommand::SettleEvent { event_id } => self.settle_event(caller, *event_id),
            LedgerCommand::CancelEvent { event_id } => self.cancel_event(caller, *event_id),
            LedgerCommand::PurchaseTickets(cmd) => self.purchase_tickets(caller, ctx.value, cmd),
            LedgerCommand::CancelPurchase(cmd) => self.cancel_purchase(cmd),
            LedgerCommand::RefundPurchase {
                event_id,
                purchase_id,
            } => self.refund_purchase(caller, *event_id, *purchase_id),
            LedgerCommand::CheckIn { purchase_id } => self.check_in(caller, *purchase_id),
        }
    }

    pub fn open_store(&self, caller: &AccountId) -> Result<Vec<Notification>, LedgerError> {
        self.require_owner(caller)?;
        let status = self.store.status;
        ensure(status.can_open(), || LedgerError::InvalidStoreTransition {
            status,
            action: "open",
        })?;

        Ok(vec![Notification::StoreOpened(StoreTransitionData {
            previous: status,
            status: StoreStatus::Open,
        })])
    }

    pub fn suspend_store(&self, caller: &AccountId) -> Result<Vec<Notification>, LedgerError> {
        self.require_owner(caller)?;
        let status = self.store.status;
        ensure(status.can_suspend(), || LedgerError::InvalidStoreTransition {
            status,
            action: "suspend",
        })?;

        Ok(vec![Notification::StoreSuspended(StoreTransitionData {
            previous: status,
            status: StoreStatus::Suspended,
        })])
    }

    /// Closes the store and sweeps settled and excess balance to the owner.
    /// Refundable balance stays in custody.
    pub fn close_store(&self, caller: &AccountId) -> Result<Vec<Notification>, LedgerError> {
        self.require_owner(caller)?;
        let status = self.store.status;
        ensure(status.can_close(), || LedgerError::InvalidStoreTransition {
            status,
            action: "close",
        })?;

        Ok(vec![Notification::StoreClosed(StoreClosedData {
            previous: status,
            owner: self.store.owner.clone(),
            swept: self.store.sweepable(),
        })])
    }

    pub fn transfer_ownership(
        &self,
        caller: &AccountId,
        new_owner: &AccountId,
    ) -> Result<Vec<Notification>, LedgerError> {
        self.require_owner(caller)?;
        ensure(!new_owner.is_blank(), || LedgerError::NewOwnerRequired)?;

        Ok(vec![Notification::OwnershipTransferred(
            OwnershipTransferredData {
                previous_owner: self.store.owner.clone(),
                new_owner: new_owner.clone(),
            },
        )])
    }

    pub fn receive_funds(
        &self,
        caller: &AccountId,
        value: Amount,
    ) -> Result<Vec<Notification>, LedgerError> {
        ensure(!value.is_zero(), || LedgerError::ValueRequired)?;
        let status = self.store.status;
        ensure(!status.is_terminal(), || LedgerError::InvalidStoreTransition {
            status,
            action: "receive funds in",
        })?;
        require_overflow_free(self.store.excess_balance.checked_add(value))?;
        require_funds(self.accounts.balance_of(caller), value)?;

        Ok(vec![Notification::FundsReceived(FundsReceivedData {
            sender: caller.clone(),
            amount: value,
        })])
    }

    pub fn create_event(
        &self,
        caller: &AccountId,
        cmd: &CreateEvent,
    ) -> Result<Vec<Notification>, LedgerError> {
        self.require_owner(caller)?;
        self.require_store_open()?;
        ensure(!cmd.organizer.is_program(), || LedgerError::OrganizerIsProgram {
            organizer: cmd.organizer.clone(),
        })?;
        require_secret(&cmd.external_id, LedgerError::EventExternalIdRequired)?;
        require_text(&cmd.name, LedgerError::EventNameRequired)?;
        ensure(cmd.incentive_bps <= BASIS_POINTS, || {
            LedgerError::IncentiveOutOfRange {
                bps: cmd.incentive_bps,
            }
        })?;
        ensure(cmd.tickets_on_sale > 0, || LedgerError::NoTicketsOnSale)?;

        Ok(vec![Notification::EventCreated(EventCreatedData {
            event_id: self.store.next_event_id(),
            external_id_hash: cmd.external_id.digest(),
            organizer: cmd.organizer.clone(),
            name: cmd.name.clone(),
            store_incentive_bps: cmd.incentive_bps,
            ticket_price: cmd.ticket_price,
            tickets_on_sale: cmd.tickets_on_sale,
        })])
    }

    pub fn start_ticket_sales(
        &self,
        caller: &AccountId,
        event_id: EventId,
    ) -> Result<Vec<Notification>, LedgerError> {
        let data = self.organizer_transition(
            caller,
            event_id,
            "start sales for",
            EventStatus::can_start_sales,
            EventStatus::SalesStarted,
        )?;
        Ok(vec![Notification::EventSalesStarted(data)])
    }

    pub fn suspend_ticket_sales(
        &self,
        caller: &AccountId,
        event_id: EventId,
    ) -> Result<Vec<Notification>, LedgerError> {
        let data = self.organizer_transition(
            caller,
            event_id,
            "suspend sales for",
            EventStatus::can_suspend_sales,
            EventStatus::SalesSuspended,
        )?;
        Ok(vec![Notification::EventSalesSuspended(data)])
    }

    pub fn end_ticket_sales(
        &self,
        caller: &AccountId,
        event_id: EventId,
    ) -> Result<Vec<Notification>, LedgerError> {
        let data = self.organizer_transition(
            caller,
            event_id,
            "end sales for",
            EventStatus::can_end_sales,
            EventStatus::SalesFinished,
        )?;
        Ok(vec![Notification::EventSalesFinished(data)])
    }

    pub fn complete_event(
        &self,
        caller: &AccountId,
        event_id: EventId,
    ) -> Result<Vec<Notification>, LedgerError> {
        let data = self.organizer_transition(
            caller,
            event_id,
            "complete",
            EventStatus::can_complete,
            EventStatus::Completed,
        )?;
        Ok(vec![Notification::EventCompleted(data)])
    }

    /// Splits the event balance between the store incentive and the
    /// organizer. The incentive rounds down. Once the store is closed its
    /// settled balance can no longer be swept, so the incentive goes
    /// straight to the owner.
    pub fn settle_event(
        &self,
        caller: &AccountId,
        event_id: EventId,
    ) -> Result<Vec<Notification>, LedgerError> {
        let event = self.event(event_id)?;
        self.require_owner(caller)?;
        ensure(event.status.can_settle(), || {
            LedgerError::InvalidEventTransition {
                event_id,
                status: event.status,
                action: "settle",
            }
        })?;

        let split = incentive_split(event.balance, event.store_incentive_bps);
        let incentive_paid_to = if self.store.status == StoreStatus::Closed {
            Some(self.store.owner.clone())
        } else {
            require_overflow_free(self.store.settled_balance.checked_add(split.incentive))?;
            None
        };

        Ok(vec![Notification::EventSettled(EventSettledData {
            event_id,
            organizer: event.organizer.clone(),
            incentive: split.incentive,
            organizer_share: split.organizer_share,
            incentive_paid_to,
        })])
    }

    /// Cancels an event. A settled event is rejected for every caller
    /// before authorization is considered.
    pub fn cancel_event(
        &self,
        caller: &AccountId,
        event_id: EventId,
    ) -> Result<Vec<Notification>, LedgerError> {
        let event = self.event(event_id)?;
        ensure(event.status != EventStatus::Settled, || {
            LedgerError::SettledEventNotCancellable { event_id }
        })?;
        authorize(
            caller,
            Role::OrganizerOrOwner,
            &self.event_resource(event),
        )
        .or_reject(|| LedgerError::NotOrganizerOrOwner {
            caller: caller.clone(),
            event_id,
        })?;
        ensure(event.status.can_cancel(), || {
            LedgerError::InvalidEventTransition {
                event_id,
                status: event.status,
                action: "cancel",
            }
        })?;

        Ok(vec![Notification::EventCancelled(EventCancelledData {
            event_id,
            previous: event.status,
            cancelled_by: caller.clone(),
        })])
    }

    pub fn purchase_tickets(
        &self,
        caller: &AccountId,
        value: Amount,
        cmd: &PurchaseTickets,
    ) -> Result<Vec<Notification>, LedgerError> {
        self.require_store_open()?;
        let event = self.event(cmd.event_id)?;
        ensure(event.status.is_selling(), || LedgerError::SalesNotStarted {
            event_id: event.id,
            status: event.status,
        })?;
        ensure(cmd.quantity > 0, || LedgerError::ZeroQuantity)?;
        ensure(event.tickets_left >= cmd.quantity, || {
            LedgerError::NotEnoughTickets {
                requested: cmd.quantity,
                left: event.tickets_left,
            }
        })?;
        require_secret(&cmd.external_id, LedgerError::PurchaseExternalIdRequired)?;
        ensure(cmd.timestamp > 0, || LedgerError::TimestampRequired)?;
        require_secret(&cmd.customer_id, LedgerError::CustomerIdRequired)?;

        let total = require_overflow_free(purchase_total(event.ticket_price, cmd.quantity))?;
        require_overflow_free(event.balance.checked_add(total))?;
        require_exact_value(total, value)?;
        require_funds(self.accounts.balance_of(caller), value)?;

        Ok(vec![Notification::PurchaseCompleted(PurchaseCompletedData {
            purchase_id: self.store.next_purchase_id(),
            event_id: event.id,
            customer: caller.clone(),
            external_id_hash: cmd.external_id.digest(),
            customer_id_hash: cmd.customer_id.digest(),
            timestamp: cmd.timestamp,
            quantity: cmd.quantity,
            total,
        })])
    }

    /// Cancels a purchase for whoever presents both of its credentials.
    /// Sold tickets are not put back on sale.
    pub fn cancel_purchase(&self, cmd: &CancelPurchase) -> Result<Vec<Notification>, LedgerError> {
        let purchase = self.purchase(cmd.purchase_id)?;
        ensure(
            purchase.external_id_hash.matches(&cmd.external_id)
                && purchase.customer_id_hash.matches(&cmd.customer_id),
            || LedgerError::CredentialMismatch {
                purchase_id: purchase.id,
            },
        )?;
        ensure(purchase.status.can_cancel(), || {
            LedgerError::InvalidPurchaseTransition {
                purchase_id: purchase.id,
                status: purchase.status,
                action: "cancel",
            }
        })?;
        let event = self.event(purchase.event_id)?;
        ensure(event.status.accepts_cancellations(), || {
            LedgerError::CancellationsClosed {
                event_id: event.id,
                status: event.status,
            }
        })?;
        require_overflow_free(self.store.refundable_balance.checked_add(purchase.total))?;

        Ok(vec![Notification::PurchaseCancelled(PurchaseCancelledData {
            purchase_id: purchase.id,
            event_id: event.id,
            quantity: purchase.quantity,
            total: purchase.total,
        })])
    }

    pub fn refund_purchase(
        &self,
        caller: &AccountId,
        event_id: EventId,
        purchase_id: PurchaseId,
    ) -> Result<Vec<Notification>, LedgerError> {
        let event = self.event(event_id)?;
        self.require_organizer(caller, event)?;
        let purchase = self.purchase(purchase_id)?;
        ensure(purchase.event_id == event_id, || {
            LedgerError::PurchaseNotInEvent {
                purchase_id,
                event_id,
            }
        })?;
        ensure(purchase.status.can_refund(), || {
            LedgerError::InvalidPurchaseTransition {
                purchase_id,
                status: purchase.status,
                action: "refund",
            }
        })?;

        Ok(vec![Notification::PurchaseRefunded(PurchaseRefundedData {
            purchase_id,
            event_id,
            customer: purchase.customer.clone(),
            quantity: purchase.quantity,
            total: purchase.total,
        })])
    }

    pub fn check_in(
        &self,
        caller: &AccountId,
        purchase_id: PurchaseId,
    ) -> Result<Vec<Notification>, LedgerError> {
        let purchase = self.purchase(purchase_id)?;
        authorize(
            caller,
            Role::Purchaser,
            &Resource::Purchase {
                customer: &purchase.customer,
            },
        )
        .or_reject(|| LedgerError::NotPurchaser {
            caller: caller.clone(),
            purchase_id,
        })?;
        ensure(purchase.status.can_check_in(), || {
            LedgerError::InvalidPurchaseTransition {
                purchase_id,
                status: purchase.status,
                action: "check in",
            }
        })?;

        Ok(vec![Notification::CustomerCheckedIn(CustomerCheckedInData {
            purchase_id,
            event_id: purchase.event_id,
            customer: purchase.customer.clone(),
            quantity: purchase.quantity,
        })])
    }

    fn require_owner(&self, caller: &AccountId) -> Result<(), LedgerError> {
        authorize(
            caller,
            Role::Owner,
            &Resource::Store {
                owner: &self.store.owner,
            },
        )
        .or_reject(|| LedgerError::NotOwner {
            caller: caller.clone(),
        })
    }

    fn require_organizer(&self, caller: &AccountId, event: &Event) -> Result<(), LedgerError> {
        authorize(caller, Role::Organizer, &self.event_resource(event)).or_reject(|| {
            LedgerError::NotOrganizer {
                caller: caller.clone(),
                event_id: event.id,
            }
        })
    }

    fn require_store_open(&self) -> Result<(), LedgerError> {
        let status = self.store.status;
        ensure(status.is_open(), || LedgerError::StoreNotOpen { status })
    }

    fn event_resource<'a>(&'a self, event: &'a Event) -> Resource<'a> {
        Resource::Event {
            owner: &self.store.owner,
            organizer: &event.organizer,
        }
    }

    /// Existence, then organizer, then source state.
    fn organizer_transition(
        &self,
        caller: &AccountId,
        event_id: EventId,
        action: &'static str,
        allowed: fn(&EventStatus) -> bool,
        target: EventStatus,
    ) -> Result<EventTransitionData, LedgerError> {
        let event = self.event(event_id)?;
        self.require_organizer(caller, event)?;
        ensure(allowed(&event.status), || LedgerError::InvalidEventTransition {
            event_id,
            status: event.status,
            action,
        })?;

        Ok(EventTransitionData {
            event_id,
            previous: event.status,
            status: target,
        })
    }
}

// Record mutations
impl Ledger {
    fn event_mut(&mut self, event_id: EventId) -> Option<&mut Event> {
        event_id.slot().and_then(|slot| self.events.get_mut(slot))
    }

    fn purchase_mut(&mut self, purchase_id: PurchaseId) -> Option<&mut Purchase> {
        purchase_id.slot().and_then(|slot| self.purchases.get_mut(slot))
    }

    /// Applies everything except payouts.
    fn apply_record(&mut self, notification: Notification) {
        match notification {
            Notification::StoreOpened(data) | Notification::StoreSuspended(data) => {
                self.store.status = data.status;
            }
            Notification::StoreClosed(_) => {
                self.store.status = StoreStatus::Closed;
                self.store.settled_balance = Amount::ZERO;
                self.store.excess_balance = Amount::ZERO;
            }
            Notification::OwnershipTransferred(data) => {
                self.store.owner = data.new_owner;
            }
            Notification::FundsReceived(data) => {
                self.accounts.debit(&data.sender, data.amount);
                self.store.excess_balance = self.store.excess_balance.saturating_add(data.amount);
            }
            Notification::EventCreated(data) => self.apply_event_created(data),
            Notification::EventSalesStarted(data)
            | Notification::EventSalesSuspended(data)
            | Notification::EventSalesFinished(data)
            | Notification::EventCompleted(data) => {
                if let Some(event) = self.event_mut(data.event_id) {
                    event.status = data.status;
                }
            }
            Notification::EventSettled(data) => {
                if let Some(event) = self.event_mut(data.event_id) {
                    event.status = EventStatus::Settled;
                    event.balance = Amount::ZERO;
                }
                if data.incentive_paid_to.is_none() {
                    self.store.settled_balance =
                        self.store.settled_balance.saturating_add(data.incentive);
                }
            }
            Notification::EventCancelled(data) => {
                if let Some(event) = self.event_mut(data.event_id) {
                    event.status = EventStatus::Cancelled;
                }
            }
            Notification::PurchaseCompleted(data) => self.apply_purchase_completed(data),
            Notification::PurchaseCancelled(data) => {
                if let Some(purchase) = self.purchase_mut(data.purchase_id) {
                    purchase.status = PurchaseStatus::Cancelled;
                }
                if let Some(event) = self.event_mut(data.event_id) {
                    event.balance = event.balance.saturating_sub(data.total);
                    event.refundable_balance = event.refundable_balance.saturating_add(data.total);
                    event.tickets_cancelled = event.tickets_cancelled.saturating_add(data.quantity);
                }
                self.store.refundable_balance =
                    self.store.refundable_balance.saturating_add(data.total);
            }
            Notification::PurchaseRefunded(data) => {
                if let Some(purchase) = self.purchase_mut(data.purchase_id) {
                    purchase.status = PurchaseStatus::Refunded;
                }
                if let Some(event) = self.event_mut(data.event_id) {
                    event.refundable_balance = event.refundable_balance.saturating_sub(data.total);
                    event.tickets_refunded = event.tickets_refunded.saturating_add(data.quantity);
                }
                self.store.refundable_balance =
                    self.store.refundable_balance.saturating_sub(data.total);
            }
            Notification::CustomerCheckedIn(data) => {
                if let Some(purchase) = self.purchase_mut(data.purchase_id) {
                    purchase.status = PurchaseStatus::CheckedIn;
                }
                if let Some(event) = self.event_mut(data.event_id) {
                    event.tickets_checked_in = event.tickets_checked_in.saturating_add(data.quantity);
                }
            }
        }
    }

    fn apply_event_created(&mut self, data: EventCreatedData) {
        self.store.counter_events = data.event_id.as_u64();
        self.events.push(Event {
            id: data.event_id,
            status: EventStatus::Created,
            external_id_hash: data.external_id_hash,
            organizer: data.organizer,
            name: data.name,
            store_incentive_bps: data.store_incentive_bps,
            ticket_price: data.ticket_price,
            tickets_on_sale: data.tickets_on_sale,
            tickets_sold: 0,
            tickets_left: data.tickets_on_sale,
            tickets_cancelled: 0,
            tickets_refunded: 0,
            tickets_checked_in: 0,
            balance: Amount::ZERO,
            refundable_balance: Amount::ZERO,
        });
    }

    fn apply_purchase_completed(&mut self, data: PurchaseCompletedData) {
        self.store.counter_purchases = data.purchase_id.as_u64();
        if let Some(event) = self.event_mut(data.event_id) {
            event.tickets_left = event.tickets_left.saturating_sub(data.quantity);
            event.tickets_sold = event.tickets_sold.saturating_add(data.quantity);
            event.balance = event.balance.saturating_add(data.total);
        }
        self.accounts.debit(&data.customer, data.total);
        self.purchases.push(Purchase {
            id: data.purchase_id,
            status: PurchaseStatus::Completed,
            external_id_hash: data.external_id_hash,
            timestamp: data.timestamp,
            customer: data.customer,
            customer_id_hash: data.customer_id_hash,
            quantity: data.quantity,
            total: data.total,
            event_id: data.event_id,
        });
    }
}
