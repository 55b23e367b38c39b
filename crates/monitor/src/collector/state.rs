use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorState {
    Idle,
    Sampling,
}

#[derive(Debug, Default)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn set(&self, state: CollectorState) {
        let raw = match state {
            CollectorState::Idle => 0,
            CollectorState::Sampling => 1,
        };
        self.0.store(raw, Ordering::Release);
    }

    pub(crate) fn get(&self) -> CollectorState {
        match self.0.load(Ordering::Acquire) {
            1 => CollectorState::Sampling,
            _ => CollectorState::Idle,
        }
    }
}
