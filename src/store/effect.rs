use std::future::Future;

use futures_util::future::{BoxFuture, FutureExt};

/// Asynchronous follow-up work produced by a reduction. Executing it yields
/// the next action to feed back into the store.
pub enum Effect<Action> {
    /// Nothing to do.
    Nothing,
    /// Dispatch another action right away.
    Action(Action),
    /// Run a future and feed its output back as an action.
    Future(BoxFuture<'static, Action>),
    /// Several effects, executed independently.
    Merge(Vec<Effect<Action>>),
}

impl<Action: Send + 'static> Effect<Action> {
    pub const NONE: Self = Effect::Nothing;

    pub fn action(action: Action) -> Self {
        Effect::Action(action)
    }

    pub fn future<T, F, M>(future: F, map: M) -> Self
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
        M: FnOnce(T) -> Action + Send + 'static,
    {
        Effect::Future(async move { map(future.await) }.boxed())
    }

    pub fn merge(effects: Vec<Self>) -> Self {
        Effect::Merge(effects)
    }
}
