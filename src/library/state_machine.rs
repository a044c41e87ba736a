use std::collections::VecDeque;

/// Single-threaded Elm-style loop: a pure transition function decides the next
/// state and a list of effects, the caller runs each effect and feeds back the
/// events it produced. Everything happens on the calling thread, in order.
#[derive(Debug, Clone)]
pub struct StateMachine<TState, TEvent, TEffect> {
    state: TState,
    pending_effects: Vec<TEffect>,
    queue: VecDeque<TEvent>,
}

impl<TState, TEvent, TEffect> StateMachine<TState, TEvent, TEffect>
where
    TState: Clone,
{
    pub fn new(init: (TState, Vec<TEffect>)) -> Self {
        let (state, effects) = init;
        Self {
            state,
            pending_effects: effects,
            queue: VecDeque::new(),
        }
    }

    pub fn state(&self) -> &TState {
        &self.state
    }

    /// Runs the effects returned by `init`.
    pub fn start<T, E>(&mut self, transition_fn: T, mut run_effect_fn: E)
    where
        T: FnMut(TState, TEvent) -> (TState, Vec<TEffect>),
        E: FnMut(TEffect) -> Vec<TEvent>,
    {
        for effect in std::mem::take(&mut self.pending_effects) {
            self.queue.extend(run_effect_fn(effect));
        }
        self.drain(transition_fn, run_effect_fn);
    }

    /// Handles `event` and every event its effects produce, breadth first.
    pub fn dispatch<T, E>(&mut self, event: TEvent, transition_fn: T, run_effect_fn: E)
    where
        T: FnMut(TState, TEvent) -> (TState, Vec<TEffect>),
        E: FnMut(TEffect) -> Vec<TEvent>,
    {
        self.queue.push_back(event);
        self.drain(transition_fn, run_effect_fn);
    }

    fn drain<T, E>(&mut self, mut transition_fn: T, mut run_effect_fn: E)
    where
        T: FnMut(TState, TEvent) -> (TState, Vec<TEffect>),
        E: FnMut(TEffect) -> Vec<TEvent>,
    {
        while let Some(event) = self.queue.pop_front() {
            let (new_state, effects) = transition_fn(self.state.clone(), event);
            self.state = new_state;

            for effect in effects {
                self.queue.extend(run_effect_fn(effect));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Light {
        Off,
        On { presses: u32 },
    }

    #[derive(Debug)]
    enum Press {
        Toggle,
        Echo,
    }

    #[derive(Debug, PartialEq)]
    enum Beep {
        Once,
    }

    fn transition(state: Light, event: Press) -> (Light, Vec<Beep>) {
        match (state, event) {
            (Light::Off, Press::Toggle) => (Light::On { presses: 1 }, vec![Beep::Once]),
            (Light::On { presses }, Press::Echo) => (Light::On { presses: presses + 1 }, vec![]),
            (Light::On { .. }, Press::Toggle) => (Light::Off, vec![]),
            (state, _) => (state, vec![]),
        }
    }

    #[test]
    fn test_effect_events_are_fed_back() {
        let mut machine = StateMachine::new((Light::Off, vec![]));
        let mut beeps = 0;

        machine.dispatch(Press::Toggle, transition, |Beep::Once| {
            beeps += 1;
            vec![Press::Echo]
        });

        assert_eq!(beeps, 1);
        assert_eq!(machine.state(), &Light::On { presses: 2 });
    }

    #[test]
    fn test_start_runs_initial_effects() {
        let mut machine = StateMachine::new((Light::On { presses: 0 }, vec![Beep::Once]));
        machine.start(transition, |_| vec![Press::Echo, Press::Echo]);
        assert_eq!(machine.state(), &Light::On { presses: 2 });
    }
}
