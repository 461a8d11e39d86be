// slot.rs - The single "current relief" slot
//
// At most one relief is current. A build asks for a ticket first; when it
// finishes, only the newest ticket may replace the current relief. Failed
// builds leave the previous relief in place.

use std::sync::Arc;

use image::DynamicImage;

use crate::error::{ReliefError, ReliefResult};
use crate::params::ReliefParams;
use crate::pipeline::{Relief, build_relief};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug, PartialEq, Eq)]
pub enum Commit {
    /// The result became current; the previous relief was dropped
    Replaced,
    /// A newer ticket was issued meanwhile; the result was discarded
    Stale,
}

#[derive(Debug, Default)]
pub struct ReliefSlot {
    current: Option<Relief>,
    latest: u64,
}

impl ReliefSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Relief> {
        self.current.as_ref()
    }

    /// Hand the current relief over to the caller, leaving the slot empty
    pub fn take(&mut self) -> Option<Relief> {
        self.current.take()
    }

    /// Start a new build; every earlier ticket becomes stale
    pub fn request(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Apply a finished build. Errors of the latest ticket are returned and
    /// leave the current relief untouched.
    pub fn commit(&mut self, ticket: Ticket, result: ReliefResult<Relief>) -> ReliefResult<Commit> {
        if !self.is_latest(ticket) {
            tracing::debug!(ticket = ticket.0, latest = self.latest, "discarding superseded build");
            return Ok(Commit::Stale);
        }
        match result {
            Ok(relief) => {
                self.current = Some(relief);
                Ok(Commit::Replaced)
            }
            Err(err) => {
                tracing::warn!(error = %err, kept_previous = self.current.is_some(), "relief build failed");
                Err(err)
            }
        }
    }

    /// Synchronous request + build + commit
    pub fn rebuild(&mut self, texture: &Arc<DynamicImage>, params: &ReliefParams) -> ReliefResult<&Relief> {
        let ticket = self.request();
        let result = build_relief(texture, params);
        self.commit(ticket, result)?;
        self.current.as_ref().ok_or_else(|| ReliefError::geometry("slot empty after commit"))
    }
}
