use crate::cancel::CancelSlot;
use crate::naming::SplitAt;
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Longest single sleep between wall-clock checks, so suspends and clock
/// steps delay a rotation by at most this much.
const MAX_SLEEP: Duration = Duration::from_secs(30);

/// First occurrence of `split_at` strictly after `now`, in `now`'s time zone.
///
/// Occurrences are resolved with [`SplitAt::on`], the same instants the file
/// namer switches at.
pub fn next_fire_after<Tz: TimeZone>(now: &DateTime<Tz>, split_at: SplitAt) -> DateTime<Tz> {
    let tz = now.timezone();
    let mut date = now.naive_local().date();

    loop {
        let at = split_at.on(date, &tz);
        if at > *now {
            return at;
        }
        date = match date.succ_opt() {
            Some(next) => next,
            None => return at,
        };
    }
}

/// Tracks the next rotation instant and reports when it has been reached.
#[derive(Debug, Clone)]
pub struct Schedule<Tz: TimeZone> {
    split_at: SplitAt,
    next: DateTime<Tz>,
}

impl<Tz: TimeZone> Schedule<Tz> {
    pub fn new(split_at: SplitAt, now: &DateTime<Tz>) -> Self {
        Self {
            split_at,
            next: next_fire_after(now, split_at),
        }
    }

    pub fn next(&self) -> &DateTime<Tz> {
        &self.next
    }

    /// Returns `true` once per occurrence, on the first call at or after it.
    ///
    /// If several occurrences were missed (the host slept for days) they
    /// collapse into one.
    pub fn due(&mut self, now: &DateTime<Tz>) -> bool {
        if *now < self.next {
            return false;
        }
        self.next = next_fire_after(now, self.split_at);
        true
    }

    /// Time to wait before the next call to [`Schedule::due`].
    pub fn wait(&self, now: &DateTime<Tz>) -> Duration {
        (self.next.clone() - now.clone())
            .to_std()
            .unwrap_or(Duration::ZERO)
            .min(MAX_SLEEP)
    }
}

/// Background task that cancels the current session once a day at `split_at`.
///
/// The task is aborted when the clock is dropped.
pub struct RotationClock {
    handle: JoinHandle<()>,
}

impl RotationClock {
    pub fn spawn(split_at: SplitAt, slot: CancelSlot) -> Self {
        Self::spawn_with(split_at, slot, Local::now)
    }

    /// Same as [`RotationClock::spawn`], reading the wall clock from `now`.
    pub fn spawn_with<Tz, F>(split_at: SplitAt, slot: CancelSlot, now: F) -> Self
    where
        Tz: TimeZone + Send + 'static,
        Tz::Offset: Send + Display,
        F: Fn() -> DateTime<Tz> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut schedule = Schedule::new(split_at, &now());
            tracing::info!("Next rotation at {}", schedule.next().to_rfc3339());

            loop {
                let wait = schedule.wait(&now());
                tokio::time::sleep(wait).await;

                if schedule.due(&now()) {
                    tracing::info!("Time to rotate output file");
                    slot.cancel_current();
                    tracing::info!("Next rotation at {}", schedule.next().to_rfc3339());
                }
            }
        });

        Self { handle }
    }
}

impl Drop for RotationClock {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
