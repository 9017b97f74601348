//! Ledger service providing the operation API.

use std::time::Instant;

use common::{AccountId, Amount, EventId, PurchaseId};
use journal::{Journal, JournalQuery, NotificationEnvelope};
use tokio::sync::Mutex;

use crate::access::AccountRoles;
use crate::command::{CommandHandler, CommandResult};
use crate::error::DomainError;

use super::{
    CallContext, CancelPurchase, CreateEvent, EventInfo, EventSalesInfo, Genesis, Ledger,
    LedgerCommand, LedgerError, Notification, PurchaseInfo, PurchaseTickets, StoreInfo,
};

impl CommandResult<Ledger> {
    /// Id announced by an `EventCreated` notification.
    pub fn created_event_id(&self) -> Option<EventId> {
        self.events.iter().find_map(|n| match n {
            Notification::EventCreated(data) => Some(data.event_id),
            _ => None,
        })
    }

    /// Id announced by a `PurchaseCompleted` notification.
    pub fn created_purchase_id(&self) -> Option<PurchaseId> {
        self.events.iter().find_map(|n| match n {
            Notification::PurchaseCompleted(data) => Some(data.purchase_id),
            _ => None,
        })
    }

    /// Value sent out of custody by the command.
    pub fn payouts(&self) -> Vec<crate::accounting::Payout> {
        self.events.iter().flat_map(Notification::payouts).collect()
    }
}

/// Single-writer service over the ledger.
///
/// Every operation takes the same lock, so operations are fully serialized
/// and each one commits or aborts as a whole.
pub struct LedgerService<J: Journal> {
    handler: Mutex<CommandHandler<J, Ledger>>,
}

impl<J: Journal> LedgerService<J> {
    /// Creates a service over a fresh ledger. The journal must be empty.
    pub fn new(journal: J, genesis: Genesis) -> Result<Self, DomainError> {
        let ledger = Ledger::new(genesis)?;
        Ok(Self {
            handler: Mutex::new(CommandHandler::new(journal, ledger)),
        })
    }

    /// Rebuilds the ledger from `genesis` plus everything journaled so far.
    pub async fn restore(journal: J, genesis: Genesis) -> Result<Self, DomainError> {
        let handler = CommandHandler::restore(journal, Ledger::new(genesis)?).await?;
        Ok(Self {
            handler: Mutex::new(handler),
        })
    }

    /// Executes any ledger operation on behalf of `ctx.caller`.
    #[tracing::instrument(skip(self, ctx, command), fields(operation = command.name(), caller = %ctx.caller))]
    pub async fn execute(
        &self,
        ctx: CallContext,
        command: LedgerCommand,
    ) -> Result<CommandResult<Ledger>, DomainError> {
        let operation = command.name();
        let started = Instant::now();

        let result = {
            let mut handler = self.handler.lock().await;
            handler
                .execute(operation, |ledger| ledger.decide(&ctx, &command))
                .await
        };

        metrics::histogram!("ledger_command_duration_seconds", "operation" => operation)
            .record(started.elapsed().as_secs_f64());

        match &result {
            Ok(committed) => {
                metrics::counter!("ledger_commands_total", "operation" => operation).increment(1);
                tracing::info!(
                    sequence = %committed.new_sequence,
                    notifications = committed.events.len(),
                    "command committed"
                );
            }
            Err(DomainError::Ledger(e)) => {
                metrics::counter!(
                    "ledger_commands_rejected_total",
                    "operation" => operation,
                    "code" => e.code()
                )
                .increment(1);
                tracing::warn!(code = e.code(), kind = %e.kind(), error = %e, "command rejected");
            }
            Err(e) => {
                tracing::error!(error = %e, "command failed");
            }
        }

        result
    }

    pub async fn open_store(&self, caller: AccountId) -> Result<CommandResult<Ledger>, DomainError> {
        self.execute(CallContext::new(caller), LedgerCommand::OpenStore)
            .await
    }

    pub async fn suspend_store(
        &self,
        caller: AccountId,
    ) -> Result<CommandResult<Ledger>, DomainError> {
        self.execute(CallContext::new(caller), LedgerCommand::SuspendStore)
            .await
    }

    pub async fn close_store(&self, caller: AccountId) -> Result<CommandResult<Ledger>, DomainError> {
        self.execute(CallContext::new(caller), LedgerCommand::CloseStore)
            .await
    }

    pub async fn transfer_ownership(
        &self,
        caller: AccountId,
        new_owner: AccountId,
    ) -> Result<CommandResult<Ledger>, DomainError> {
        self.execute(
            CallContext::new(caller),
            LedgerCommand::TransferOwnership { new_owner },
        )
        .await
    }

    pub async fn receive_funds(
        &self,
        caller: AccountId,
        value: Amount,
    ) -> Result<CommandResult<Ledger>, DomainError> {
        self.execute(
            CallContext::new(caller).with_value(value),
            LedgerCommand::ReceiveFunds,
        )
        .await
    }

    pub async fn create_event(
        &self,
        caller: AccountId,
        cmd: CreateEvent,
    ) -> Result<CommandResult<Ledger>, DomainError> {
        self.execute(CallContext::new(caller), LedgerCommand::CreateEvent(cmd))
            .await
    }

    pub async fn start_ticket_sales(
        &self,
        caller: AccountId,
        event_id: EventId,
    ) -> Result<CommandResult<Ledger>, DomainError> {
        self.execute(
            CallContext::new(caller),
            LedgerCommand::StartTicketSales { event_id },
        )
        .await
    }

    pub async fn suspend_ticket_sales(
        &self,
        caller: AccountId,
        event_id: EventId,
    ) -> Result<CommandResult<Ledger>, DomainError> {
        self.execute(
            CallContext::new(caller),
            LedgerCommand::SuspendTicketSales { event_id },
        )
        .await
    }

    pub async fn end_ticket_sales(
        &self,
        caller: AccountId,
        event_id: EventId,
    ) -> Result<CommandResult<Ledger>, DomainError> {
        self.execute(
            CallContext::new(caller),
            LedgerCommand::EndTicketSales { event_id },
        )
        .await
    }

    pub async fn complete_event(
        &self,
        caller: AccountId,
        event_id: EventId,
    ) -> Result<CommandResult<Ledger>, DomainError> {
        self.execute(
            CallContext::new(caller),
            LedgerCommand::CompleteEvent { event_id },
        )
        .await
    }

    pub async fn settle_event(
        &self,
        caller: AccountId,
        event_id: EventId,
    ) -> Result<CommandResult<Ledger>, DomainError> {
        self.execute(
            CallContext::new(caller),
            LedgerCommand::SettleEvent { event_id },
        )
        .await
    }

    pub async fn cancel_event(
        &self,
        caller: AccountId,
        event_id: EventId,
    ) -> Result<CommandResult<Ledger>, DomainError> {
        self.execute(
            CallContext::new(caller),
            LedgerCommand::CancelEvent { event_id },
        )
        .await
    }

    /// Buys tickets; `value` must equal `quantity * ticket_price`.
    pub async fn purchase_tickets(
        &self,
        caller: AccountId,
        value: Amount,
        cmd: PurchaseTickets,
    ) -> Result<CommandResult<Ledger>, DomainError> {
        self.execute(
            CallContext::new(caller).with_value(value),
            LedgerCommand::PurchaseTickets(cmd),
        )
        .await
    }

    pub async fn cancel_purchase(
        &self,
        caller: AccountId,
        cmd: CancelPurchase,
    ) -> Result<CommandResult<Ledger>, DomainError> {
        self.execute(CallContext::new(caller), LedgerCommand::CancelPurchase(cmd))
            .await
    }

    pub async fn refund_purchase(
        &self,
        caller: AccountId,
        event_id: EventId,
        purchase_id: PurchaseId,
    ) -> Result<CommandResult<Ledger>, DomainError> {
        self.execute(
            CallContext::new(caller),
            LedgerCommand::RefundPurchase {
                event_id,
                purchase_id,
            },
        )
        .await
    }

    pub async fn check_in(
        &self,
        caller: AccountId,
        purchase_id: PurchaseId,
    ) -> Result<CommandResult<Ledger>, DomainError> {
        self.execute(
            CallContext::new(caller),
            LedgerCommand::CheckIn { purchase_id },
        )
        .await
    }
}

// Queries
impl<J: Journal> LedgerService<J> {
    /// Runs `read` against the last committed state.
    pub async fn read<T>(&self, read: impl FnOnce(&Ledger) -> T) -> T {
        let handler = self.handler.lock().await;
        read(handler.aggregate())
    }

    /// Clones the last committed state.
    pub async fn snapshot(&self) -> Ledger {
        self.read(Ledger::clone).await
    }

    pub async fn store_info(&self) -> StoreInfo {
        self.read(Ledger::store_info).await
    }

    pub async fn event_info(&self, event_id: EventId) -> Result<EventInfo, LedgerError> {
        self.read(|ledger| ledger.event_info(event_id)).await
    }

    pub async fn event_sales_info(&self, event_id: EventId) -> Result<EventSalesInfo, LedgerError> {
        self.read(|ledger| ledger.event_sales_info(event_id)).await
    }

    pub async fn purchase_info(&self, purchase_id: PurchaseId) -> Result<PurchaseInfo, LedgerError> {
        self.read(|ledger| ledger.purchase_info(purchase_id)).await
    }

    pub async fn account_roles(&self, account: &AccountId) -> AccountRoles {
        self.read(|ledger| ledger.account_roles(account)).await
    }

    pub async fn organizer_events(&self, account: &AccountId) -> Vec<EventId> {
        self.read(|ledger| ledger.organizer_events(account)).await
    }

    pub async fn customer_purchases(&self, account: &AccountId) -> Vec<PurchaseId> {
        self.read(|ledger| ledger.customer_purchases(account)).await
    }

    pub async fn account_balance(&self, account: &AccountId) -> Amount {
        self.read(|ledger| ledger.account_balance(account)).await
    }

    /// Journaled notifications matching `query`.
    pub async fn notifications(
        &self,
        query: JournalQuery,
    ) -> Result<Vec<NotificationEnvelope>, DomainError> {
        let handler = self.handler.lock().await;
        Ok(handler.journal().query(query).await?)
    }
}
