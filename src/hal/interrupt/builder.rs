use core::marker::PhantomData;

use super::{FlagSlots, InterruptRouter, SourceSet};

// Builder states
pub struct NeedDispatchSet;
pub struct NeedFlagSlots;
pub struct Ready;

pub struct InterruptRouterBuilder<'s, 'f, State> {
    dispatch: SourceSet,
    slots: Option<&'s FlagSlots<'f>>,
    _phantom: PhantomData<State>,
}

// Start the builder
impl<'s, 'f> InterruptRouterBuilder<'s, 'f, NeedDispatchSet> {
    pub fn new() -> Self {
        InterruptRouterBuilder {
            dispatch: SourceSet::empty(),
            slots: None,
            _phantom: PhantomData,
        }
    }
}

impl Default for InterruptRouterBuilder<'_, '_, NeedDispatchSet> {
    fn default() -> Self {
        Self::new()
    }
}

// Choose which sources the dispatcher services
impl<'s, 'f> InterruptRouterBuilder<'s, 'f, NeedDispatchSet> {
    pub fn dispatch(self, sources: SourceSet) -> InterruptRouterBuilder<'s, 'f, NeedFlagSlots> {
        InterruptRouterBuilder {
            dispatch: sources,
            slots: None,
            _phantom: PhantomData,
        }
    }

    pub fn dispatch_all(self) -> InterruptRouterBuilder<'s, 'f, NeedFlagSlots> {
        self.dispatch(SourceSet::all())
    }
}

// Attach (or decline) flag storage
impl<'s, 'f> InterruptRouterBuilder<'s, 'f, NeedFlagSlots> {
    pub fn flag_slots(self, slots: &'s FlagSlots<'f>) -> InterruptRouterBuilder<'s, 'f, Ready> {
        InterruptRouterBuilder {
            dispatch: self.dispatch,
            slots: Some(slots),
            _phantom: PhantomData,
        }
    }

    /// The router acknowledges dispatched sources without raising any flag.
    pub fn no_flags(self) -> InterruptRouterBuilder<'s, 'f, Ready> {
        InterruptRouterBuilder {
            dispatch: self.dispatch,
            slots: None,
            _phantom: PhantomData,
        }
    }
}

// Build the router
impl<'s, 'f> InterruptRouterBuilder<'s, 'f, Ready> {
    pub fn build(self) -> InterruptRouter<'s, 'f> {
        InterruptRouter::from_parts(self.slots, self.dispatch)
    }
}
