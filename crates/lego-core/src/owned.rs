use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Handle to the private model an instance creates once at mount.
///
/// The model lives inside an `Rc<RefCell<...>>` owned by exactly one instance.
/// Handlers and hooks receive clones of this handle for the duration of a call,
/// so they all observe and mutate the same model. Composed listeners and
/// intercepters do not keep it alive: the model is dropped with its instance
/// unless a handler stashes a clone.
pub struct InstanceModel<M> {
    inner: Rc<RefCell<M>>,
}

impl<M> Clone for InstanceModel<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<M> InstanceModel<M> {
    pub(crate) fn new(model: M) -> Self {
        Self {
            inner: Rc::new(RefCell::new(model)),
        }
    }

    /// Run `f` with an immutable reference to the model.
    pub fn with<R>(&self, f: impl FnOnce(&M) -> R) -> R {
        let borrow = self.inner.borrow();
        f(&borrow)
    }

    /// Run `f` with a mutable reference to the model.
    pub fn update<R>(&self, f: impl FnOnce(&mut M) -> R) -> R {
        let mut borrow = self.inner.borrow_mut();
        f(&mut borrow)
    }

    /// Replace the model entirely.
    pub fn replace(&self, model: M) -> M {
        self.inner.replace(model)
    }

    /// Whether two handles refer to the same model.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<M: Clone> InstanceModel<M> {
    pub fn get(&self) -> M {
        self.inner.borrow().clone()
    }
}

impl<M: fmt::Debug> fmt::Debug for InstanceModel<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InstanceModel").field(&*self.inner.borrow()).finish()
    }
}
