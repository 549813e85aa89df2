#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use std::fmt;
use std::time::Duration;

use crate::size::Size;

/// A single override applied on top of [`Settings::default`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocOption {
    /// Total amount of memory, divided evenly among the buffers.
    Size(Size),
    /// Number of buffers.
    Count(usize),
    /// Touch one byte per 4 KiB so the pages become resident.
    Physical(bool),
    /// Block the calling thread for this long before returning.
    Hold(Duration),
}

/// Mutable settings record the options are folded into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    size: Size,
    count: usize,
    physical: bool,
    hold: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            size: Size::MEGABYTE,
            count: 1,
            physical: false,
            hold: None,
        }
    }
}

impl Settings {
    /// Folds `options` over the defaults in order; the last write to a field wins.
    pub fn from_options<I>(options: I) -> Self
    where
        I: IntoIterator<Item = AllocOption>,
    {
        let mut settings = Self::default();
        settings.extend(options);
        settings
    }

    pub fn apply(&mut self, option: AllocOption) {
        match option {
            AllocOption::Size(size) => self.size = size,
            AllocOption::Count(count) => self.count = count,
            AllocOption::Physical(physical) => self.physical = physical,
            AllocOption::Hold(hold) => self.hold = Some(hold),
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.apply(AllocOption::Size(size));
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.apply(AllocOption::Count(count));
        self
    }

    #[must_use]
    pub fn with_physical(mut self, physical: bool) -> Self {
        self.apply(AllocOption::Physical(physical));
        self
    }

    #[must_use]
    pub fn with_hold(mut self, hold: Duration) -> Self {
        self.apply(AllocOption::Hold(hold));
        self
    }

    /// Never fails; count and size are checked by the engine once the
    /// per-buffer size is known.
    #[must_use]
    pub fn resolve(&self) -> AllocationPlan {
        AllocationPlan {
            total_size: self.size,
            count: self.count,
            physical: self.physical,
            hold: self.hold,
        }
    }
}

impl Extend<AllocOption> for Settings {
    fn extend<T: IntoIterator<Item = AllocOption>>(&mut self, iter: T) {
        for option in iter {
            self.apply(option);
        }
    }
}

impl FromIterator<AllocOption> for Settings {
    fn from_iter<T: IntoIterator<Item = AllocOption>>(iter: T) -> Self {
        Self::from_options(iter)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocationPlan {
    pub total_size: Size,
    pub count: usize,
    pub physical: bool,
    pub hold: Option<Duration>,
}

impl AllocationPlan {
    /// `total_size / count`, or `None` when count is zero. Remainder bytes are dropped.
    #[must_use]
    pub fn buffer_size(&self) -> Option<u64> {
        let count = u64::try_from(self.count).ok()?;
        self.total_size.as_bytes().checked_div(count)
    }
}

/// Buffers produced by one engine call, owned by the caller from then on.
#[derive(Debug, Default)]
pub struct Allocation {
    payload: Vec<Box<[u8]>>,
}

impl Allocation {
    pub(crate) fn new(payload: Vec<Box<[u8]>>) -> Self {
        Self { payload }
    }

    #[must_use]
    pub fn buffers(&self) -> &[Box<[u8]>] {
        &self.payload
    }

    pub fn buffers_mut(&mut self) -> &mut [Box<[u8]>] {
        &mut self.payload
    }

    #[must_use]
    pub fn into_buffers(self) -> Vec<Box<[u8]>> {
        self.payload
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Length shared by every buffer, zero when there are none.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.payload.first().map_or(0, |b| b.len())
    }

    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.payload.iter().map(|b| b.len() as u64).sum()
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "allocated: {} elements", self.payload.len())
    }
}
