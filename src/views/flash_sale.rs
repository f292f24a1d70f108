//! Flash-sale board: polled stock levels plus optimistic purchases.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use crate::api::{ApiClient, FlashSale, StockState};
use crate::error::SyncError;
use crate::lifecycle::ScopeHandle;
use crate::notify::{Notifier, Toast};
use crate::optimistic::{MutationOutcome, Optimistic};
use crate::polling::Poller;
use crate::session::Session;
use crate::views::mvi::{Intent, Reducer, UiState};
use crate::views::ActionResult;

impl UiState for StockState {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockIntent {
    Purchase { quantity: u64 },
}

impl Intent for StockIntent {}

pub struct StockReducer;

impl Reducer for StockReducer {
    type State = StockState;
    type Intent = StockIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            StockIntent::Purchase { quantity } => StockState {
                stock: state.stock,
                sold: state.sold.saturating_add(quantity).min(state.stock),
            },
        }
    }
}

struct BoardState {
    api: Arc<ApiClient>,
    scope: ScopeHandle,
    notifier: Arc<dyn Notifier>,
    sales: RwLock<Vec<FlashSale>>,
    stock: Mutex<HashMap<String, Optimistic<StockState>>>,
    /// Bumped on every committed purchase.
    commits: AtomicU64,
}

impl BoardState {
    fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::SeqCst)
    }

    /// Replace the sale list wholesale with a fresh fetch.
    ///
    /// `started` is the commit count when the fetch was sent. A fetch that
    /// raced a purchase commit may predate it, so its stock levels do not
    /// overwrite the purchase controls.
    fn apply(&self, sales: Vec<FlashSale>, started: u64) {
        let current = started == self.commit_count();
        {
            let mut controls = self.stock.lock();
            controls.retain(|id, control| {
                control.is_pending() || sales.iter().any(|sale| &sale.id == id)
            });
            if current {
                for sale in &sales {
                    if let Some(control) = controls.get(&sale.id) {
                        control.sync(sale.stock);
                    }
                }
            }
        }
        tracing::debug!(count = sales.len(), current, "Flash sales refreshed");
        *self.sales.write() = sales;
    }
}

/// Flash-sale listing that refreshes while mounted.
pub struct FlashSaleBoard {
    state: Arc<BoardState>,
    session: Session,
    interval: Duration,
    poller: Mutex<Poller>,
}

impl FlashSaleBoard {
    pub fn new(
        api: Arc<ApiClient>,
        session: Session,
        scope: ScopeHandle,
        notifier: Arc<dyn Notifier>,
        interval: Duration,
    ) -> Self {
        Self {
            state: Arc::new(BoardState {
                api,
                scope,
                notifier,
                sales: RwLock::new(Vec::new()),
                stock: Mutex::new(HashMap::new()),
                commits: AtomicU64::new(0),
            }),
            session,
            interval,
            poller: Mutex::new(Poller::new()),
        }
    }

    /// Start polling. The first fetch happens immediately.
    pub fn mount(&self) {
        let api = Arc::clone(&self.state.api);
        let state = Arc::clone(&self.state);
        self.poller.lock().start(
            "flash sales",
            self.state.scope.clone(),
            self.interval,
            Arc::clone(&self.state.notifier),
            {
                let state = Arc::clone(&state);
                move || {
                    let api = Arc::clone(&api);
                    let started = state.commit_count();
                    async move { api.list_flash_sales().await.map(|sales| (sales, started)) }
                }
            },
            move |(sales, started)| state.apply(sales, started),
        );
    }

    pub fn stop(&self) {
        self.poller.lock().stop();
    }

    pub fn is_polling(&self) -> bool {
        self.poller.lock().is_running()
    }

    /// One-off fetch outside the timer (pull to refresh).
    pub async fn refresh(&self) -> Result<(), SyncError> {
        let started = self.state.commit_count();
        match self.state.api.list_flash_sales().await {
            Ok(sales) => {
                self.state
                    .scope
                    .run_if_mounted(|| self.state.apply(sales, started));
                Ok(())
            }
            Err(err) => {
                self.state
                    .notifier
                    .notify(Toast::warning(err.user_message("refresh flash sales")));
                Err(err)
            }
        }
    }

    /// Current sales with in-flight purchases reflected.
    pub fn sales(&self) -> Vec<FlashSale> {
        let controls = self.state.stock.lock();
        self.state
            .sales
            .read()
            .iter()
            .map(|sale| {
                let mut sale = sale.clone();
                if let Some(control) = controls.get(&sale.id) {
                    sale.stock = control.value();
                }
                sale
            })
            .collect()
    }

    pub fn stock(&self, sale_id: &str) -> Option<StockState> {
        if let Some(control) = self.state.stock.lock().get(sale_id) {
            return Some(control.value());
        }
        self.state
            .sales
            .read()
            .iter()
            .find(|sale| sale.id == sale_id)
            .map(|sale| sale.stock)
    }

    /// "3 left" / "Sold out".
    pub fn remaining_label(&self, sale_id: &str) -> Option<String> {
        self.stock(sale_id).map(|stock| stock.label())
    }

    /// Whether the buy control is enabled.
    pub fn can_purchase(&self, sale_id: &str) -> bool {
        let pending = self
            .state
            .stock
            .lock()
            .get(sale_id)
            .is_some_and(|control| control.is_pending());
        !pending && self.stock(sale_id).is_some_and(|stock| !stock.is_sold_out())
    }

    fn stock_control(&self, sale: &FlashSale) -> Optimistic<StockState> {
        self.state
            .stock
            .lock()
            .entry(sale.id.clone())
            .or_insert_with(|| {
                Optimistic::new(
                    sale.stock,
                    self.state.scope.clone(),
                    Arc::clone(&self.state.notifier),
                )
            })
            .clone()
    }

    /// Buy one unit.
    pub async fn purchase(&self, sale_id: &str) -> ActionResult<StockState> {
        if self.session.require_user().is_err() {
            return ActionResult::SignInRequired;
        }
        let sale = self
            .state
            .sales
            .read()
            .iter()
            .find(|sale| sale.id == sale_id)
            .cloned();
        let Some(sale) = sale else {
            return ActionResult::Unavailable;
        };

        let control = self.stock_control(&sale);
        if control.value().is_sold_out() {
            return ActionResult::Unavailable;
        }

        let state = Arc::clone(&self.state);
        let id = sale.id.clone();
        let outcome = control
            .mutate(
                "purchase item",
                |stock| StockReducer::reduce(*stock, StockIntent::Purchase { quantity: 1 }),
                move |_| async move {
                    let receipt = state.api.purchase_flash_sale(&id, 1).await?;
                    // Must precede the controller's commit.
                    state.commits.fetch_add(1, Ordering::SeqCst);
                    Ok(receipt.map(|receipt| receipt.stock))
                },
            )
            .await;

        if let MutationOutcome::Committed(stock) = &outcome {
            self.state.scope.run_if_mounted(|| {
                if let Some(entry) = self
                    .state
                    .sales
                    .write()
                    .iter_mut()
                    .find(|entry| entry.id == sale.id)
                {
                    entry.stock = *stock;
                }
            });
            self.state
                .notifier
                .notify(Toast::info(format!("Purchased {}", sale.title)));
        }
        ActionResult::Done(outcome)
    }
}
