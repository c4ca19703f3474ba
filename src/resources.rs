//! Image cache that gates the first start of the game loop.
//!
//! Every source is fetched at most once. The cache tracks which sources are
//! still pending and fires the registered ready callbacks when the last
//! pending source finishes loading.

use anyhow::{anyhow, Error, Result};
use futures::channel::oneshot::channel;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

/// Starts the actual fetch of a source.
///
/// Implementations must eventually report back through
/// [`ResourceCache::complete`], from any later turn of the event loop.
pub trait Fetcher: Sized + 'static {
    type Image: Clone + 'static;

    fn fetch(&self, source: &str, cache: ResourceCache<Self>);
}

/// One source or an ordered list of sources for [`ResourceCache::load`].
#[derive(Debug, Clone, Copy)]
pub enum Sources<'a> {
    One(&'a str),
    Many(&'a [&'a str]),
}

impl<'a> Sources<'a> {
    fn as_slice(&self) -> &[&'a str] {
        match self {
            Sources::One(source) => std::slice::from_ref(source),
            Sources::Many(sources) => *sources,
        }
    }
}

impl<'a> From<&'a str> for Sources<'a> {
    fn from(source: &'a str) -> Self {
        Sources::One(source)
    }
}

impl<'a> From<&'a [&'a str]> for Sources<'a> {
    fn from(sources: &'a [&'a str]) -> Self {
        Sources::Many(sources)
    }
}

impl<'a, const N: usize> From<&'a [&'a str; N]> for Sources<'a> {
    fn from(sources: &'a [&'a str; N]) -> Self {
        Sources::Many(sources)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pending,
    Loaded,
    Failed,
}

enum Entry<I> {
    Pending,
    Loaded(I),
    Failed(Rc<Error>),
}

type ReadyCallback = Rc<dyn Fn()>;
type ErrorCallback = Rc<dyn Fn(&str, &Error)>;

struct Table<I> {
    entries: HashMap<String, Entry<I>>,
    // (registration id, callback), in registration order
    ready_callbacks: Vec<(usize, ReadyCallback)>,
    error_callbacks: Vec<(usize, ErrorCallback)>,
    issued: usize,
}

impl<I> Table<I> {
    fn is_ready(&self) -> bool {
        self.entries
            .values()
            .all(|entry| matches!(entry, Entry::Loaded(_)))
    }

    fn issue(&mut self) -> usize {
        self.issued += 1;
        self.issued
    }

    fn forget(&mut self, ready_id: usize, error_id: usize) {
        self.ready_callbacks.retain(|(id, _)| *id != ready_id);
        self.error_callbacks.retain(|(id, _)| *id != error_id);
    }

    fn ready_callbacks(&self) -> Vec<ReadyCallback> {
        self.ready_callbacks
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect()
    }

    fn error_callbacks(&self) -> Vec<ErrorCallback> {
        self.error_callbacks
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect()
    }
}

/// What a completion changed, collected while the table is borrowed and
/// acted upon after the borrow is released.
enum Settled {
    Waiting,
    Ready(Vec<ReadyCallback>),
    Failed(Rc<Error>, Vec<ErrorCallback>),
}

/// Shared handle to the cache. Clones point at the same table.
pub struct ResourceCache<F: Fetcher> {
    table: Rc<RefCell<Table<F::Image>>>,
    fetcher: Rc<F>,
}

impl<F: Fetcher> Clone for ResourceCache<F> {
    fn clone(&self) -> Self {
        ResourceCache {
            table: Rc::clone(&self.table),
            fetcher: Rc::clone(&self.fetcher),
        }
    }
}

impl<F: Fetcher> ResourceCache<F> {
    pub fn new(fetcher: F) -> Self {
        ResourceCache {
            table: Rc::new(RefCell::new(Table {
                entries: HashMap::new(),
                ready_callbacks: Vec::new(),
                error_callbacks: Vec::new(),
                issued: 0,
            })),
            fetcher: Rc::new(fetcher),
        }
    }

    /// Request one or more sources. Sources seen before (pending, loaded or
    /// failed) do not trigger another fetch.
    pub fn load<'a>(&self, sources: impl Into<Sources<'a>>) {
        let sources = sources.into();
        for &source in sources.as_slice() {
            let is_new = {
                let mut table = self.table.borrow_mut();
                if table.entries.contains_key(source) {
                    false
                } else {
                    table.entries.insert(source.to_owned(), Entry::Pending);
                    true
                }
            };

            // borrow released: a fetcher may complete synchronously
            if is_new {
                log::debug!("Loading image : {}", source);
                self.fetcher.fetch(source, self.clone());
            }
        }
    }

    /// The loaded image, or `None` while the source is pending, failed or
    /// was never requested.
    pub fn get(&self, source: &str) -> Option<F::Image> {
        match self.table.borrow().entries.get(source) {
            Some(Entry::Loaded(image)) => Some(image.clone()),
            _ => None,
        }
    }

    pub fn status(&self, source: &str) -> Option<Status> {
        self.table
            .borrow()
            .entries
            .get(source)
            .map(|entry| match entry {
                Entry::Pending => Status::Pending,
                Entry::Loaded(_) => Status::Loaded,
                Entry::Failed(_) => Status::Failed,
            })
    }

    /// True when every requested source has loaded. An empty cache is ready.
    pub fn is_ready(&self) -> bool {
        self.table.borrow().is_ready()
    }

    /// Register `callback` for every transition into the ready state.
    /// When the cache is already ready the callback also fires right away.
    pub fn on_ready(&self, callback: impl Fn() + 'static) {
        self.add_ready(Rc::new(callback));
    }

    fn add_ready(&self, callback: ReadyCallback) -> usize {
        let (id, ready_now) = {
            let mut table = self.table.borrow_mut();
            let id = table.issue();
            table.ready_callbacks.push((id, Rc::clone(&callback)));
            (id, table.is_ready())
        };

        if ready_now {
            callback();
        }
        id
    }

    /// Register `callback` for every source that fails to load, including
    /// failures that happened before registration.
    pub fn on_error(&self, callback: impl Fn(&str, &Error) + 'static) {
        self.add_error(Rc::new(callback));
    }

    fn add_error(&self, callback: ErrorCallback) -> usize {
        let (id, failed): (usize, Vec<(String, Rc<Error>)>) = {
            let mut table = self.table.borrow_mut();
            let id = table.issue();
            table.error_callbacks.push((id, Rc::clone(&callback)));
            let failed = table
                .entries
                .iter()
                .filter_map(|(source, entry)| match entry {
                    Entry::Failed(err) => Some((source.clone(), Rc::clone(err))),
                    _ => None,
                })
                .collect();
            (id, failed)
        };

        for (source, err) in failed {
            callback(source.as_str(), err.as_ref());
        }
        id
    }

    /// Record the fetch result for `source`.
    ///
    /// Completions may arrive in any order. Readiness is checked after each
    /// one and the ready callbacks run, in registration order, when this
    /// completion settled the last pending source.
    pub fn complete(&self, source: &str, result: Result<F::Image>) {
        let settled = {
            let mut table = self.table.borrow_mut();
            let entry = match table.entries.get_mut(source) {
                Some(entry) if matches!(entry, Entry::Pending) => entry,
                Some(_) => {
                    log::warn!("Ignoring repeated completion for image : {}", source);
                    return;
                }
                None => {
                    log::warn!("Ignoring completion for unrequested image : {}", source);
                    return;
                }
            };

            match result {
                Ok(image) => {
                    *entry = Entry::Loaded(image);
                    if table.is_ready() {
                        Settled::Ready(table.ready_callbacks())
                    } else {
                        Settled::Waiting
                    }
                }
                Err(err) => {
                    let err = Rc::new(err);
                    *entry = Entry::Failed(Rc::clone(&err));
                    Settled::Failed(err, table.error_callbacks())
                }
            }
        };

        match settled {
            Settled::Waiting => {}
            Settled::Ready(callbacks) => {
                log::info!("All requested images loaded");
                for callback in callbacks {
                    callback();
                }
            }
            Settled::Failed(err, callbacks) => {
                log::error!("Failed to load image {} : {:#}", source, err);
                for callback in callbacks {
                    callback(source, err.as_ref());
                }
            }
        }
    }

    /// Resolves on the next ready transition (or right away when already
    /// ready), or with the first load failure.
    ///
    /// The two callbacks behind the future unregister themselves once it
    /// settles, so repeated calls do not pile up dead senders.
    pub fn ready(&self) -> impl Future<Output = Result<()>> {
        let (tx, rx) = channel::<Result<()>>();
        let tx = Rc::new(RefCell::new(Some(tx)));
        let ids: Rc<Cell<Option<(usize, usize)>>> = Rc::new(Cell::new(None));

        let settle = Rc::new({
            let tx = Rc::clone(&tx);
            let ids = Rc::clone(&ids);
            let table = Rc::downgrade(&self.table);
            move |result: Result<()>| {
                if let Some(tx) = tx.borrow_mut().take() {
                    let _ = tx.send(result);
                }
                if let (Some((ready_id, error_id)), Some(table)) = (ids.get(), table.upgrade()) {
                    table.borrow_mut().forget(ready_id, error_id);
                }
            }
        });

        let on_fail = Rc::clone(&settle);
        let error_callback: ErrorCallback = Rc::new(move |source: &str, err: &Error| {
            (*on_fail)(Err(anyhow!("Could not load image {} : {:#}", source, err)))
        });
        let error_id = self.add_error(error_callback);

        let on_ready = Rc::clone(&settle);
        let ready_id = self.add_ready(Rc::new(move || (*on_ready)(Ok(()))));

        ids.set(Some((ready_id, error_id)));
        // settled during registration, before the ids were known
        if tx.borrow().is_none() {
            self.table.borrow_mut().forget(ready_id, error_id);
        }

        async move {
            rx.await
                .map_err(|_| anyhow!("Resource cache dropped before it was ready"))?
        }
    }
}
