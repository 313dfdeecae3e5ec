//! Per-user cooldowns.
//!
//! Each command owns one [`CooldownStore`] holding at most one record per
//! user. Records carry their own deadline and are dropped lazily when a
//! lookup finds them expired, or in bulk by [`CooldownStore::purge_expired`].

use chatbridge_common::UserId;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::fmt;

/// Longest window a store will track.
const MAX_WINDOW_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

/// Source of the current time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Starts at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(start) }
    }

    /// Moves the clock forward by `seconds`.
    pub fn advance(&self, seconds: u64) {
        let mut now = self.now.lock();
        *now += window(seconds);
    }

    /// Jumps to `time`.
    pub fn set(&self, time: DateTime<Utc>) {
        *self.now.lock() = time;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Converts whole seconds into a window, capped at ten years.
pub fn window(seconds: u64) -> Duration {
    let capped = seconds.min(MAX_WINDOW_SECONDS);
    Duration::seconds(i64::try_from(capped).unwrap_or(i64::MAX))
}

/// Why a record exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CooldownKind {
    /// The last run succeeded.
    Normal,
    /// The last run failed.
    Errored,
}

/// How a handler run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionOutcome {
    /// The handler ran and asked for the cooldown.
    Ran,
    /// The handler ran and asked to skip the cooldown.
    Skipped,
    /// The handler failed.
    Failed,
}

/// The last counted invocation of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownRecord {
    /// When the invocation finished.
    pub timestamp: DateTime<Utc>,
    /// Which window applies.
    pub kind: CooldownKind,
}

/// Window lengths for one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownWindows {
    /// After a successful run.
    pub normal: Duration,
    /// After a failed run.
    pub errored: Duration,
}

impl CooldownWindows {
    /// Windows from whole seconds.
    pub fn from_seconds(normal: u64, errored: u64) -> Self {
        Self {
            normal: window(normal),
            errored: window(errored),
        }
    }

    /// Window that applies to a record of `kind`.
    pub const fn window(&self, kind: CooldownKind) -> Duration {
        match kind {
            CooldownKind::Normal => self.normal,
            CooldownKind::Errored => self.errored,
        }
    }
}

/// Result of checking a user against a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// The user may run the command.
    Open,
    /// The user must wait.
    Closed {
        /// Kind of the blocking record.
        kind: CooldownKind,
        /// When the user may run the command again.
        expires_at: DateTime<Utc>,
        /// Time left until `expires_at`.
        remaining: Duration,
    },
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    record: CooldownRecord,
    deadline: DateTime<Utc>,
}

/// Cooldown records of one command.
#[derive(Debug, Default)]
pub struct CooldownStore {
    entries: DashMap<UserId, Entry>,
}

impl CooldownStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether `user` may run the command at `now`. An expired record
    /// is removed on the way.
    pub fn check(&self, user: UserId, now: DateTime<Utc>, windows: CooldownWindows) -> Gate {
        let Some(entry) = self.entries.get(&user).map(|entry| *entry) else {
            return Gate::Open;
        };

        let expires_at = entry.record.timestamp + windows.window(entry.record.kind);
        if now >= expires_at {
            self.entries.remove_if(&user, |_, current| current.deadline <= now);
            return Gate::Open;
        }

        Gate::Closed {
            kind: entry.record.kind,
            expires_at,
            remaining: expires_at - now,
        }
    }

    /// Records a finished invocation. Skipped runs and developer-only
    /// commands leave the store untouched.
    pub fn record(
        &self,
        user: UserId,
        outcome: ExecutionOutcome,
        now: DateTime<Utc>,
        developer_only: bool,
        windows: CooldownWindows,
    ) {
        let kind = match outcome {
            ExecutionOutcome::Skipped => return,
            ExecutionOutcome::Ran => CooldownKind::Normal,
            ExecutionOutcome::Failed => CooldownKind::Errored,
        };

        if developer_only {
            return;
        }

        let record = CooldownRecord { timestamp: now, kind };
        self.entries.insert(
            user,
            Entry {
                record,
                deadline: now + windows.window(kind),
            },
        );
    }

    /// The live record of `user`, if any.
    pub fn get(&self, user: UserId) -> Option<CooldownRecord> {
        self.entries.get(&user).map(|entry| entry.record)
    }

    /// Drops every record whose deadline has passed and returns how many
    /// were removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.deadline > now);
        before.saturating_sub(self.entries.len())
    }

    /// Number of stored records, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
