use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::listeners::ListenerArg;
use crate::outcome::Outcome;
use crate::overrides::Override;
use crate::owned::InstanceModel;
use crate::state::StateContainer;

/// Per-instance cell shared by the instance and its composed tables.
pub(crate) struct Scope<M> {
    component: Rc<str>,
    state: StateContainer,
    model: InstanceModel<M>,
    overrides: RefCell<IndexMap<String, Override<M>>>,
}

impl<M> Scope<M> {
    pub(crate) fn new(
        component: Rc<str>,
        state: StateContainer,
        model: InstanceModel<M>,
        overrides: IndexMap<String, Override<M>>,
    ) -> Self {
        Self {
            component,
            state,
            model,
            overrides: RefCell::new(overrides),
        }
    }

    pub(crate) fn component(&self) -> &str {
        &self.component
    }

    pub(crate) fn state(&self) -> &StateContainer {
        &self.state
    }

    pub(crate) fn model(&self) -> &InstanceModel<M> {
        &self.model
    }

    /// Fresh `{ state, instance }` view, taken at call time.
    pub(crate) fn listener_arg(&self) -> ListenerArg<M> {
        ListenerArg {
            state: self.state.snapshot(),
            instance: self.model.clone(),
        }
    }

    /// The override currently installed for `name`. The table borrow is
    /// released before any handler runs so handlers may swap props.
    pub(crate) fn current_override(&self, name: &str) -> Option<Override<M>> {
        self.overrides.borrow().get(name).cloned()
    }

    pub(crate) fn replace_overrides(&self, overrides: IndexMap<String, Override<M>>) {
        *self.overrides.borrow_mut() = overrides;
    }

    /// Passes `outcome` through the merge gate and hands it back.
    pub(crate) fn commit(&self, listener: &str, outcome: Outcome) -> Outcome {
        if self.state.merge(&outcome) {
            log::debug!(
                "{}.{listener}: committed {:?}",
                self.component,
                outcome.partial().map(|partial| partial.keys().collect::<Vec<_>>())
            );
        }
        outcome
    }
}
