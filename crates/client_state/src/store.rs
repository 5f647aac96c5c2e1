use tokio::sync::watch;
use tracing::debug;

pub trait Action: Send + 'static {
    fn name(&self) -> &'static str;
}

pub(crate) struct StateContainer<S, A> {
    store: &'static str,
    tx: watch::Sender<S>,
    reduce: fn(S, A) -> S,
}

impl<S, A> StateContainer<S, A>
where
    S: Clone + Default,
    A: Action,
{
    pub(crate) fn new(store: &'static str, reduce: fn(S, A) -> S) -> Self {
        let (tx, _rx) = watch::channel(S::default());
        Self { store, tx, reduce }
    }

    pub(crate) fn dispatch(&self, action: A) {
        debug!(store = self.store, action = action.name(), "dispatching action");
        let reduce = self.reduce;
        self.tx.send_modify(move |state| {
            let current = std::mem::take(state);
            *state = reduce(current, action);
        });
    }

    pub(crate) fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    // Fires on cancellation too, e.g. when a mount is torn down mid-call.
    pub(crate) fn dispatch_on_drop(&self, action: A) -> DispatchOnDrop<'_, S, A> {
        DispatchOnDrop {
            container: self,
            action: Some(action),
        }
    }
}

pub(crate) struct DispatchOnDrop<'a, S, A>
where
    S: Clone + Default,
    A: Action,
{
    container: &'a StateContainer<S, A>,
    action: Option<A>,
}

impl<S, A> Drop for DispatchOnDrop<'_, S, A>
where
    S: Clone + Default,
    A: Action,
{
    fn drop(&mut self) {
        if let Some(action) = self.action.take() {
            self.container.dispatch(action);
        }
    }
}
