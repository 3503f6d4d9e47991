mod action;
mod effect;
mod reducer;
mod state;

pub use action::Action;
pub use effect::Effect;
pub use reducer::reduce;
pub use state::AppState;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::environment::Environment;

/// Owns the application state and serializes all reductions. Effects run as
/// independent tasks; their completion actions arrive through the store's
/// channel in completion order.
pub struct Store {
    state: AppState,
    environment: Environment,
    sender: flume::Sender<Action>,
    receiver: flume::Receiver<Action>,
    in_flight: Arc<AtomicUsize>,
}

impl Store {
    pub fn new(environment: Environment) -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            state: AppState::default(),
            environment,
            sender,
            receiver,
            in_flight: Arc::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// A sender for dispatching actions from outside the store loop.
    pub fn sender(&self) -> flume::Sender<Action> {
        self.sender.clone()
    }

    /// Reduce one action and execute whatever effect it produces.
    pub fn dispatch(&mut self, action: Action) {
        let effect = reduce(action, &mut self.state, &self.environment);
        self.execute(effect);
    }

    fn execute(&mut self, effect: Effect<Action>) {
        match effect {
            Effect::Nothing => {}
            Effect::Action(action) => self.dispatch(action),
            Effect::Future(future) => {
                let sender = self.sender.clone();
                let in_flight = self.in_flight.clone();
                in_flight.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    let action = future.await;
                    let _ = sender.send(action);
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                });
            }
            Effect::Merge(effects) => {
                for effect in effects {
                    self.execute(effect);
                }
            }
        }
    }

    /// Reduce incoming actions as they arrive. Meant as the main loop of a
    /// hosting shell; it does not return on its own.
    pub async fn run(&mut self) {
        while let Ok(action) = self.receiver.recv_async().await {
            self.dispatch(action);
        }
    }

    /// Drive the store until every spawned effect has completed and all
    /// resulting actions are reduced.
    pub async fn run_until_idle(&mut self) {
        loop {
            while let Ok(action) = self.receiver.try_recv() {
                self.dispatch(action);
            }
            if self.in_flight.load(Ordering::SeqCst) == 0 && self.receiver.is_empty() {
                return;
            }
            if let Ok(action) = self.receiver.recv_async().await {
                self.dispatch(action);
            }
        }
    }
}
