//! Lifecycle of a single configuration hand-off
//!
//! The parent moves through [`HandoffPhase`], the worker through
//! [`WorkerPhase`]. Both only ever advance to the direct successor.

use std::fmt;

use tracing::debug;

use crate::error::{Error, Result};

pub trait Phase: Copy + Eq + fmt::Debug {
    fn successor(self) -> Option<Self>;
}

/// Parent side: the store is built, written, the worker runs and exits, and
/// the file is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffPhase {
    Created,
    Persisted,
    Spawned,
    Exited,
    Cleaned,
}

impl Phase for HandoffPhase {
    fn successor(self) -> Option<Self> {
        match self {
            HandoffPhase::Created => Some(HandoffPhase::Persisted),
            HandoffPhase::Persisted => Some(HandoffPhase::Spawned),
            HandoffPhase::Spawned => Some(HandoffPhase::Exited),
            HandoffPhase::Exited => Some(HandoffPhase::Cleaned),
            HandoffPhase::Cleaned => None,
        }
    }
}

/// Worker side: started with a path, configuration loaded and decoded, then
/// handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    Started,
    Loaded,
    Consumed,
}

impl Phase for WorkerPhase {
    fn successor(self) -> Option<Self> {
        match self {
            WorkerPhase::Started => Some(WorkerPhase::Loaded),
            WorkerPhase::Loaded => Some(WorkerPhase::Consumed),
            WorkerPhase::Consumed => None,
        }
    }
}

#[derive(Debug)]
pub struct Handoff<P: Phase> {
    phase: P,
}

impl<P: Phase> Handoff<P> {
    pub fn start(initial: P) -> Self {
        Self { phase: initial }
    }

    pub fn phase(&self) -> P {
        self.phase
    }

    pub fn advance(&mut self, next: P) -> Result<()> {
        if self.phase.successor() != Some(next) {
            return Err(Error::Handoff(format!(
                "cannot move from {:?} to {:?}",
                self.phase, next
            )));
        }
        debug!("Hand-off {:?} -> {:?}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}
