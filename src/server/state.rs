//! Application state shared across HTTP handlers.

use crate::booking::BookingLifecycle;
use crate::config::Config;
use crate::gateway::notifier::Notifier;
use crate::gateway::paypal::PaymentProcessor;
use crate::gateway::reports::ReceiptRenderer;
use crate::store::accounts::AccountStore;
use crate::store::bookings::BookingStore;
use crate::store::expenses::ExpenseStore;
use crate::store::maintenance::MaintenanceStore;
use crate::store::rooms::RoomStore;
use crate::store::sessions::SessionStore;
use sqlx::PgPool;
use std::sync::Arc;

/// Everything a handler needs: configuration, the stores, the booking
/// lifecycle manager and the external collaborators. Cloned cheaply (Arcs and
/// pool handles) per request.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Connection pool (health checks)
    pub pool: PgPool,
    /// Booking lifecycle manager; the only mutator of room inventory
    pub lifecycle: Arc<BookingLifecycle>,
    /// Payment provider
    pub payments: Arc<dyn PaymentProcessor>,
    /// Email dispatch
    pub notifier: Arc<dyn Notifier>,
    /// Receipt rendering
    pub receipts: Arc<dyn ReceiptRenderer>,
    /// Room store
    pub rooms: RoomStore,
    /// Account stores
    pub accounts: AccountStore,
    /// Booking ledger (read side)
    pub bookings: BookingStore,
    /// Maintenance request store
    pub maintenance: MaintenanceStore,
    /// Expense store
    pub expenses: ExpenseStore,
    /// Session store
    pub sessions: SessionStore,
}

impl AppState {
    /// Assemble the application state.
    ///
    /// The maintenance store doubles as the lifecycle's surcharge source: a
    /// resident's most recent ticket charge feeds the price calculator.
    #[must_use]
    pub fn new(
        config: Config,
        pool: PgPool,
        payments: Arc<dyn PaymentProcessor>,
        notifier: Arc<dyn Notifier>,
        receipts: Arc<dyn ReceiptRenderer>,
    ) -> Self {
        let maintenance = MaintenanceStore::new(pool.clone());
        let lifecycle = Arc::new(BookingLifecycle::new(
            pool.clone(),
            Arc::new(maintenance.clone()),
            notifier.clone(),
        ));
        Self {
            config: Arc::new(config),
            lifecycle,
            payments,
            notifier,
            receipts,
            rooms: RoomStore::new(pool.clone()),
            accounts: AccountStore::new(pool.clone()),
            bookings: BookingStore::new(pool.clone()),
            maintenance,
            expenses: ExpenseStore::new(pool.clone()),
            sessions: SessionStore::new(pool.clone()),
            pool,
        }
    }
}
