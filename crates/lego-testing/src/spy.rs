//! Call-recording wrappers for listeners, overrides and intercepters.

use std::cell::RefCell;
use std::rc::Rc;

use lego_core::{BeforeResult, ListenerArg, Outcome, StateMap, Value};

/// One recorded invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct SpyCall {
    pub state: StateMap,
    pub args: Vec<Value>,
}

/// Records every call made through the handlers it wraps.
///
/// Clones share the same log, so a test can keep one handle while the
/// wrapped closure moves into a definition or a prop.
#[derive(Clone, Debug, Default)]
pub struct Spy {
    calls: Rc<RefCell<Vec<SpyCall>>>,
}

impl Spy {
    pub fn new() -> Self {
        Self::default()
    }

    fn record<M>(&self, arg: &ListenerArg<M>, args: &[Value]) {
        self.calls.borrow_mut().push(SpyCall {
            state: arg.state.clone(),
            args: args.to_vec(),
        });
    }

    /// Wraps a listener-shaped handler.
    pub fn handler<M, F, O>(&self, handler: F) -> impl Fn(&ListenerArg<M>, &[Value]) -> Outcome
    where
        F: Fn(&ListenerArg<M>, &[Value]) -> O,
        O: Into<Outcome>,
    {
        let spy = self.clone();
        move |arg: &ListenerArg<M>, args: &[Value]| {
            spy.record(arg, args);
            handler(arg, args).into()
        }
    }

    /// Wraps an override that runs before the default.
    pub fn before<M, F>(
        &self,
        handler: F,
    ) -> impl Fn(&ListenerArg<M>, &[Value]) -> Option<BeforeResult>
    where
        F: Fn(&ListenerArg<M>, &[Value]) -> Option<BeforeResult>,
    {
        let spy = self.clone();
        move |arg: &ListenerArg<M>, args: &[Value]| {
            spy.record(arg, args);
            handler(arg, args)
        }
    }

    /// Wraps an intercepter transformer.
    pub fn transformer<M, F>(
        &self,
        transform: F,
    ) -> impl Fn(&ListenerArg<M>, &[Value]) -> Value
    where
        F: Fn(&ListenerArg<M>, &[Value]) -> Value,
    {
        let spy = self.clone();
        move |arg: &ListenerArg<M>, args: &[Value]| {
            spy.record(arg, args);
            transform(arg, args)
        }
    }

    pub fn calls(&self) -> Vec<SpyCall> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    pub fn last_call(&self) -> Option<SpyCall> {
        self.calls.borrow().last().cloned()
    }

    /// State the most recent call observed.
    pub fn last_state(&self) -> Option<StateMap> {
        self.last_call().map(|call| call.state)
    }

    pub fn reset(&self) {
        self.calls.borrow_mut().clear();
    }
}
