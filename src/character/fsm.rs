//! Finite state machine with one pending transition and a per-state timer.

/// A state change applied at the start of an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<S> {
    pub from: S,
    pub to: S,
}

/// Tracks the current, previous and requested state.
///
/// Requests are latched and applied by the next [`Fsm::begin_update`]; when
/// several requests arrive before that, the last one wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Fsm<S> {
    current: S,
    previous: S,
    requested: S,
    state_time: f32,
}

impl<S: Copy + Eq> Fsm<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            previous: initial,
            requested: initial,
            state_time: 0.0,
        }
    }

    pub fn current(&self) -> S {
        self.current
    }

    pub fn previous(&self) -> S {
        self.previous
    }

    pub fn requested(&self) -> S {
        self.requested
    }

    /// Seconds spent in the current state, including the running update.
    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    pub fn request(&mut self, state: S) {
        self.requested = state;
    }

    pub fn is_transition_pending(&self) -> bool {
        self.requested != self.current
    }

    /// Apply the pending request, if any, and advance the state timer by `dt`.
    ///
    /// The caller runs the leave and enter handlers of the returned transition
    /// before updating the (new) current state.
    pub fn begin_update(&mut self, dt: f32) -> Option<Transition<S>> {
        let transition = if self.is_transition_pending() {
            self.previous = self.current;
            self.current = self.requested;
            self.state_time = 0.0;
            Some(Transition {
                from: self.previous,
                to: self.current,
            })
        } else {
            None
        };

        self.state_time += dt;
        transition
    }
}
