//! Application state container and mutation API.
//!
//! # Responsibility
//! - Own the entity store, filter store, derivation engine, loading flag and
//!   persistence adapter for one process-level session.
//! - Translate caller intents into store writes, then recompute, persist and
//!   notify in that order.
//!
//! # Invariants
//! - Every mutation recomputes the derived view before it returns, so reads
//!   never observe a stale or half-updated view.
//! - Collection changes are mirrored to storage without waiting for I/O.
//! - Hydration never clears storage; only `reset` does.
//! - Subscribers are notified once per effective change, after recomputation.

use crate::config::StoreConfig;
use crate::model::contact::{Contact, ContactFormData, Department};
use crate::model::filter::FilterCriteria;
use crate::persist::adapter::{HydrationSource, PersistenceAdapter};
use crate::persist::kv_store::KeyValueStore;
use crate::store::derive::{DerivationEngine, DerivedView};
use crate::store::entity_store::{Collection, EntityStore};
use crate::store::filter_store::FilterStore;
use crate::store::loading::LoadingState;
use crate::store::{StoreError, StoreResult};
use log::{info, warn};
use std::time::{Duration, Instant};

/// Kind of change delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Contacts { revision: u64 },
    Filters { revision: u64 },
    Loading { is_loading: bool },
}

/// Read-only state handed to subscribers together with a change.
#[derive(Debug, Clone, Copy)]
pub struct StateView<'a> {
    pub contacts: &'a [Contact],
    pub filters: &'a FilterCriteria,
    pub filtered: &'a DerivedView,
    pub is_loading: bool,
}

/// Handle returned by [`AppState::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StateChange, &StateView<'_>)>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Subscribers {
    fn add(&mut self, listener: Listener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, listener));
        id
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, change: &StateChange, view: &StateView<'_>) {
        for (_, listener) in &mut self.listeners {
            listener(change, view);
        }
    }
}

/// Single owner of all contact-book state.
pub struct AppState {
    entities: EntityStore,
    filters: FilterStore,
    engine: DerivationEngine,
    loading: LoadingState,
    persistence: PersistenceAdapter,
    subscribers: Subscribers,
    loading_delay: Duration,
    hydration_source: Option<HydrationSource>,
}

impl AppState {
    /// Opens the configured storage and runs [`AppState::initialize`].
    pub fn init(config: StoreConfig) -> StoreResult<Self> {
        let persistence = PersistenceAdapter::open(&config)?;
        Ok(Self::with_adapter(&config, persistence))
    }

    /// Same as [`AppState::init`] over a caller-provided key-value store.
    pub fn init_with_store(
        config: StoreConfig,
        store: impl KeyValueStore + 'static,
    ) -> StoreResult<Self> {
        let persistence = PersistenceAdapter::with_store(&config, store)?;
        Ok(Self::with_adapter(&config, persistence))
    }

    fn with_adapter(config: &StoreConfig, persistence: PersistenceAdapter) -> Self {
        let mut state = Self {
            entities: EntityStore::default(),
            filters: FilterStore::new(),
            engine: DerivationEngine::new(),
            loading: LoadingState::new(),
            persistence,
            subscribers: Subscribers::default(),
            loading_delay: config.loading_delay,
            hydration_source: None,
        };
        state.initialize();
        state
    }

    /// Hydrates from storage and starts the loading window.
    ///
    /// Falls back to seed data only when storage is empty or unreadable. A
    /// loading timer armed by an earlier call is cancelled.
    pub fn initialize(&mut self) -> HydrationSource {
        self.initialize_at(Instant::now())
    }

    /// [`AppState::initialize`] with an explicit clock reading.
    pub fn initialize_at(&mut self, now: Instant) -> HydrationSource {
        if self.loading.start(now, self.loading_delay) {
            self.notify(StateChange::Loading { is_loading: true });
        }

        let hydration = self.persistence.hydrate();
        self.hydration_source = Some(hydration.source);
        self.entities.replace_all(hydration.contacts);
        self.recompute();
        self.notify(StateChange::Contacts {
            revision: self.entities.revision(),
        });

        info!(
            "event=store_init module=store status=ok source={:?} count={}",
            hydration.source,
            self.entities.len()
        );
        hydration.source
    }

    /// Restarts the loading window without touching data.
    pub fn refresh(&mut self) {
        self.refresh_at(Instant::now());
    }

    /// [`AppState::refresh`] with an explicit clock reading.
    pub fn refresh_at(&mut self, now: Instant) {
        if self.loading.start(now, self.loading_delay) {
            self.notify(StateChange::Loading { is_loading: true });
        }
    }

    /// Fires the loading timer if it is due. Returns whether loading ended.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// [`AppState::tick`] with an explicit clock reading.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        if !self.loading.poll(now) {
            return false;
        }
        self.notify(StateChange::Loading { is_loading: false });
        true
    }

    /// Deadline of the armed loading timer, if any.
    pub fn loading_deadline(&self) -> Option<Instant> {
        self.loading.timer().map(|timer| timer.deadline())
    }

    /// Where the collection came from on the last `initialize`.
    pub fn hydration_source(&self) -> Option<HydrationSource> {
        self.hydration_source
    }

    /// Adds a contact from validated form data.
    ///
    /// # Errors
    /// - `StoreError::Validation` when the form violates the contact contract;
    ///   nothing is stored in that case.
    pub fn add_contact(&mut self, form: ContactFormData) -> StoreResult<Contact> {
        if let Err(err) = form.validate() {
            warn!(
                "event=contact_add module=store status=rejected error={}",
                err
            );
            return Err(StoreError::Validation(err));
        }

        let contact = self.entities.add(form);
        info!(
            "event=contact_add module=store status=ok id={} count={}",
            contact.id,
            self.entities.len()
        );
        self.contacts_changed();
        Ok(contact)
    }

    /// Deletes a contact by id. Unknown ids are a no-op returning `false`.
    pub fn delete_contact(&mut self, id: &str) -> bool {
        if !self.entities.remove(id) {
            info!("event=contact_delete module=store status=not_found id={id}");
            return false;
        }
        info!(
            "event=contact_delete module=store status=ok id={} count={}",
            id,
            self.entities.len()
        );
        self.contacts_changed();
        true
    }

    pub fn set_search_filter(&mut self, text: impl Into<String>) {
        if self.filters.set_search(text) {
            self.filters_changed();
        }
    }

    /// `None` removes the department filter.
    pub fn set_department_filter(&mut self, department: Option<Department>) {
        if self.filters.set_department(department) {
            self.filters_changed();
        }
    }

    /// Selects `department`, or clears the selector when it is already selected.
    pub fn toggle_department_filter(&mut self, department: Department) {
        let next = if self.filters.criteria().department == Some(department) {
            None
        } else {
            Some(department)
        };
        self.set_department_filter(next);
    }

    pub fn clear_filters(&mut self) {
        if self.filters.clear() {
            self.filters_changed();
        }
    }

    /// Clears the durable slot and reinstalls the seed dataset.
    ///
    /// Destructive: every stored change is lost.
    pub fn reset(&mut self) {
        self.persistence.clear();
        let seed = self.persistence.seed().to_vec();
        self.entities.replace_all(seed);
        self.hydration_source = None;
        self.recompute();
        self.notify(StateChange::Contacts {
            revision: self.entities.revision(),
        });
        warn!(
            "event=store_reset module=store status=ok count={}",
            self.entities.len()
        );
    }

    /// Current collection snapshot.
    pub fn contacts(&self) -> Collection {
        self.entities.get()
    }

    pub fn has_contacts(&self) -> bool {
        !self.entities.is_empty()
    }

    pub fn filters(&self) -> &FilterCriteria {
        self.filters.criteria()
    }

    pub fn view(&self) -> &DerivedView {
        self.engine.view()
    }

    pub fn filtered_contacts(&self) -> &[Contact] {
        self.engine.view().contacts()
    }

    pub fn results_count(&self) -> usize {
        self.engine.view().count()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Registers a listener called synchronously after every effective change.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&StateChange, &StateView<'_>) + 'static,
    ) -> SubscriptionId {
        self.subscribers.add(Box::new(listener))
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    /// Waits until every dispatched storage write has been applied.
    pub fn flush(&self) -> StoreResult<()> {
        self.persistence.flush()?;
        Ok(())
    }

    /// Cancels the loading timer, drains pending writes and stops the writer.
    pub fn dispose(mut self) {
        self.loading.cancel();
        self.subscribers.listeners.clear();
        self.persistence.shutdown();
        info!("event=store_dispose module=store status=ok");
    }

    fn contacts_changed(&mut self) {
        self.persistence.persist(self.entities.contacts());
        self.recompute();
        self.notify(StateChange::Contacts {
            revision: self.entities.revision(),
        });
    }

    fn filters_changed(&mut self) {
        self.recompute();
        self.notify(StateChange::Filters {
            revision: self.filters.revision(),
        });
    }

    fn recompute(&mut self) {
        self.engine.sync(&self.entities, &self.filters);
    }

    fn notify(&mut self, change: StateChange) {
        let view = StateView {
            contacts: self.entities.contacts(),
            filters: self.filters.criteria(),
            filtered: self.engine.view(),
            is_loading: self.loading.is_loading(),
        };
        self.subscribers.notify(&change, &view);
    }
}
