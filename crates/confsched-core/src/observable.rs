//! Push-based observable values.
//!
//! An observable carries the latest value of a stream (or nothing yet) and
//! wakes observers when it changes. It is built on `tokio::sync::watch`, so a
//! slow observer only ever sees the most recent value.
//!
//! # Module Structure
//!
//! - [`MutableObservable`]: the writing side, owned by whoever produces values
//! - [`Observable`]: a cheap, cloneable read handle
//! - [`Subscription`]: a running observer; dropping it stops delivery
//! - [`Mediator`]: a result observable fed by one or more sources, with
//!   switch semantics for use cases that change their key
//! - [`combine_latest`]: recomputes a value from two sources on every tick

use crate::scheduler::TaskScheduler;
use crate::sync::lock;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// The writing side of an observable value.
pub struct MutableObservable<T> {
    sender: watch::Sender<Option<T>>,
}

impl<T> MutableObservable<T> {
    /// Creates an observable without a value.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    pub fn with_value(value: T) -> Self {
        let (sender, _) = watch::channel(Some(value));
        Self { sender }
    }

    /// Replaces the current value and wakes every observer.
    pub fn post(&self, value: T) {
        self.sender.send_replace(Some(value));
    }

    /// Removes the current value. Observers are woken but see nothing.
    pub fn clear(&self) {
        self.sender.send_replace(None);
    }

    pub fn observe(&self) -> Observable<T> {
        Observable {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Completes once every [`Observable`] handle has been dropped.
    pub async fn closed(&self) {
        self.sender.closed().await
    }
}

impl<T: Clone> MutableObservable<T> {
    pub fn value(&self) -> Option<T> {
        self.sender.borrow().clone()
    }
}

impl<T> Default for MutableObservable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A read handle on an observable value.
pub struct Observable<T> {
    receiver: watch::Receiver<Option<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            receiver: self.receiver.clone(),
        }
    }
}

impl<T: Clone> Observable<T> {
    /// An observable that holds `value` forever and never changes.
    pub fn just(value: T) -> Self {
        let (_sender, receiver) = watch::channel(Some(value));
        Self { receiver }
    }

    /// The current value, without marking it as seen.
    pub fn value(&self) -> Option<T> {
        self.receiver.borrow().clone()
    }

    /// The current value, marking it as seen for [`Observable::changed`].
    pub fn latest(&mut self) -> Option<T> {
        self.receiver.borrow_and_update().clone()
    }

    /// Waits for a value newer than the last one seen.
    ///
    /// Returns `false` once the writing side is gone and no further values
    /// can arrive.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    /// Waits until the observable holds a value matching `predicate`.
    ///
    /// The current value is checked first. Returns `None` if the writing side
    /// is dropped before a matching value arrives.
    pub async fn wait_for<F>(&mut self, mut predicate: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.receiver
            .wait_for(|value| value.as_ref().is_some_and(&mut predicate))
            .await
            .ok()
            .and_then(|value| (*value).clone())
    }

    /// Waits until the observable holds any value.
    pub async fn next_value(&mut self) -> Option<T> {
        self.wait_for(|_| true).await
    }
}

impl<T> Observable<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Delivers the current value (if any) and every later value to
    /// `on_value`, on the scheduler, until the subscription is dropped.
    pub fn subscribe<F>(&self, scheduler: &TaskScheduler, mut on_value: F) -> Subscription
    where
        F: FnMut(T) + Send + 'static,
    {
        let mut receiver = self.receiver.clone();
        let task = scheduler.spawn(async move {
            let current = receiver.borrow_and_update().clone();
            if let Some(value) = current {
                on_value(value);
            }
            while receiver.changed().await.is_ok() {
                let next = receiver.borrow_and_update().clone();
                if let Some(value) = next {
                    on_value(value);
                }
            }
        });
        Subscription { task }
    }
}

/// A running observer. Delivery stops when this handle is dropped.
#[derive(Debug)]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    /// True once the source has closed and every value was delivered.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct Sources {
    generation: u64,
    subscriptions: Vec<Subscription>,
}

/// A result observable fed by source observables.
///
/// Each source value is mapped on the scheduler and posted to the result.
/// [`Mediator::replace_source`] tears down every earlier source first; a
/// value computed for a superseded source is discarded even if its mapping
/// was already running, so stale keys never overwrite fresh ones.
pub struct Mediator<T> {
    result: Arc<MutableObservable<T>>,
    sources: Arc<Mutex<Sources>>,
}

impl<T> Mediator<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            result: Arc::new(MutableObservable::new()),
            sources: Arc::new(Mutex::new(Sources {
                generation: 0,
                subscriptions: Vec::new(),
            })),
        }
    }

    pub fn observe(&self) -> Observable<T> {
        self.result.observe()
    }

    pub fn value(&self) -> Option<T> {
        self.result.value()
    }

    /// Posts a value directly, bypassing the sources.
    pub fn post(&self, value: T) {
        self.result.post(value);
    }

    /// Adds a source next to the existing ones, pruning sources that closed.
    pub fn add_source<S, F>(&self, scheduler: &TaskScheduler, source: Observable<S>, on_value: F)
    where
        S: Clone + Send + Sync + 'static,
        F: FnMut(S) -> Option<T> + Send + 'static,
    {
        let mut sources = lock(&self.sources);
        sources.subscriptions.retain(|s| !s.is_finished());
        let generation = sources.generation;
        let subscription = self.subscribe_source(scheduler, source, generation, on_value);
        sources.subscriptions.push(subscription);
    }

    /// Drops every existing source, resets the result to `initial` and
    /// starts observing `source`.
    pub fn replace_source<S, F>(
        &self,
        scheduler: &TaskScheduler,
        initial: Option<T>,
        source: Observable<S>,
        on_value: F,
    ) where
        S: Clone + Send + Sync + 'static,
        F: FnMut(S) -> Option<T> + Send + 'static,
    {
        let mut sources = lock(&self.sources);
        sources.generation += 1;
        sources.subscriptions.clear();
        match initial {
            Some(value) => self.result.post(value),
            None => self.result.clear(),
        }
        let generation = sources.generation;
        let subscription = self.subscribe_source(scheduler, source, generation, on_value);
        sources.subscriptions.push(subscription);
    }

    /// Drops every source and clears the result.
    pub fn clear_sources(&self) {
        let mut sources = lock(&self.sources);
        sources.generation += 1;
        sources.subscriptions.clear();
        self.result.clear();
    }

    pub fn source_count(&self) -> usize {
        lock(&self.sources).subscriptions.len()
    }

    fn subscribe_source<S, F>(
        &self,
        scheduler: &TaskScheduler,
        source: Observable<S>,
        generation: u64,
        mut on_value: F,
    ) -> Subscription
    where
        S: Clone + Send + Sync + 'static,
        F: FnMut(S) -> Option<T> + Send + 'static,
    {
        let result = Arc::clone(&self.result);
        let sources = Arc::clone(&self.sources);
        source.subscribe(scheduler, move |value| {
            if let Some(mapped) = on_value(value) {
                let current = lock(&sources);
                if current.generation == generation {
                    result.post(mapped);
                }
            }
        })
    }
}

impl<T> Default for Mediator<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Recomputes `combine` from the latest values of two sources.
///
/// Nothing is emitted until both sources hold a value; after that every
/// change on either side produces a fresh output. The background task ends
/// when `cancel` fires, when nobody observes the output any more, or when
/// both sources are closed. `cancel` is fired when the task ends, so its
/// holder can tell a finished merge from a running one.
pub fn combine_latest<A, B, T, F>(
    scheduler: &TaskScheduler,
    mut first: Observable<A>,
    mut second: Observable<B>,
    cancel: CancellationToken,
    mut combine: F,
) -> Observable<T>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    F: FnMut(&A, &B) -> T + Send + 'static,
{
    let output = MutableObservable::new();
    let observable = output.observe();

    scheduler.spawn(async move {
        let _finished = cancel.clone().drop_guard();
        let mut first_open = true;
        let mut second_open = true;
        let mut dirty = true;

        loop {
            if dirty {
                if let (Some(a), Some(b)) = (first.latest(), second.latest()) {
                    output.post(combine(&a, &b));
                }
                dirty = false;
            }
            if !first_open && !second_open {
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = output.closed() => break,
                open = first.changed(), if first_open => {
                    first_open = open;
                    dirty = open;
                }
                open = second.changed(), if second_open => {
                    second_open = open;
                    dirty = open;
                }
            }
        }
        tracing::trace!("combine_latest source finished");
    });

    observable
}
