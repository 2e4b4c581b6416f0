//! Refresh subscriptions
//!
//! A [`Subscription`] binds a refresh loop to a set of inputs (category,
//! query string, ...). Changing the inputs cancels the running loop before a
//! new one starts, so results for old inputs can never land after the switch.

use super::controller::{RefreshController, RefreshHandle, RefreshToken};
use futures_util::future::BoxFuture;
use std::fmt::Debug;
use std::sync::Arc;

/// Builds one refresh cycle for the given inputs
pub type ActionFactory<I> = Arc<dyn Fn(I, RefreshToken) -> BoxFuture<'static, ()> + Send + Sync>;

/// A mounted refresh loop keyed by its inputs
pub struct Subscription<I> {
    name: String,
    controller: RefreshController,
    inputs: I,
    factory: ActionFactory<I>,
    handle: RefreshHandle,
    generation: u64,
}

impl<I> Subscription<I>
where
    I: Clone + PartialEq + Debug + Send + Sync + 'static,
{
    /// Start refreshing with the initial inputs
    pub fn mount(
        name: impl Into<String>,
        controller: RefreshController,
        inputs: I,
        factory: ActionFactory<I>,
    ) -> Self {
        let name = name.into();
        let handle = start(&name, controller, inputs.clone(), factory.clone());
        tracing::info!(subscription = %name, inputs = ?inputs, "Subscription mounted");

        Self {
            name,
            controller,
            inputs,
            factory,
            handle,
            generation: 0,
        }
    }

    /// Replace the inputs, restarting the loop.
    ///
    /// Returns `false` (and leaves the loop alone) when the inputs are equal
    /// to the current ones.
    pub fn update(&mut self, inputs: I) -> bool {
        self.update_with(inputs, || {})
    }

    /// Like [`Subscription::update`], running `between` after the old loop
    /// is cancelled and before the new one starts.
    pub fn update_with(&mut self, inputs: I, between: impl FnOnce()) -> bool {
        if inputs == self.inputs {
            return false;
        }

        self.handle.cancel();
        between();
        tracing::info!(subscription = %self.name, from = ?self.inputs, to = ?inputs, "Subscription inputs changed");

        self.inputs = inputs;
        self.handle = start(&self.name, self.controller, self.inputs.clone(), self.factory.clone());
        self.generation += 1;
        true
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &I {
        &self.inputs
    }

    /// Number of input changes since mount
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_active()
    }

    /// Stop refreshing for good
    pub fn unmount(self) {
        self.handle.cancel();
        tracing::info!(subscription = %self.name, "Subscription unmounted");
    }
}

fn start<I>(name: &str, controller: RefreshController, inputs: I, factory: ActionFactory<I>) -> RefreshHandle
where
    I: Clone + Send + Sync + 'static,
{
    controller.start(name, move |token| factory(inputs.clone(), token))
}
