use std::ops::{Deref, DerefMut};

use super::{AttributeSet, GraphicsContext};

/// Saves the attribute bindings on creation and puts them back on drop.
///
/// Anything drawn through the guard may rebind attributes freely; the
/// caller's bindings are intact once the guard goes out of scope, including
/// on early return.
pub struct ScopedAttributes<'a, C: GraphicsContext + ?Sized> {
    context: &'a mut C,
    saved: AttributeSet,
}

impl<'a, C: GraphicsContext + ?Sized> ScopedAttributes<'a, C> {
    pub fn new(context: &'a mut C) -> Self {
        let saved = context.attributes();
        Self { context, saved }
    }
}

impl<C: GraphicsContext + ?Sized> Deref for ScopedAttributes<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.context
    }
}

impl<C: GraphicsContext + ?Sized> DerefMut for ScopedAttributes<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.context
    }
}

impl<C: GraphicsContext + ?Sized> Drop for ScopedAttributes<'_, C> {
    fn drop(&mut self) {
        self.context.restore_attributes(&self.saved);
    }
}
