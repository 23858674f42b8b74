//! Table allocation engine.
//!
//! Replays one business day event by event and decides, for each event,
//! whether it is legal, what state changes it causes, and which output
//! records it produces.
//!
//! # State
//!
//! - A fixed arena of table slots, indexed `0..N`. A slot is either empty
//!   or holds an [`Occupancy`] (who sits there and since when).
//! - A name-keyed map of tracked clients and their [`ClientStatus`]. A
//!   client with no entry is absent.
//! - A FIFO wait queue of at most `N` names.
//!
//! # Invariants (hold after every event)
//!
//! - `Seated(t)` for a client iff table `t`'s occupancy names that client.
//! - The queue holds exactly the `Waiting` clients, each once.
//! - `queue.len() <= N`.
//!
//! Events are applied strictly in input order. A fatal error halts the
//! engine: later events are refused and closing is not available.

use std::collections::{BTreeMap, VecDeque};

use thiserror::Error;

use crate::config::ClubConfig;
use crate::event::{Event, EventKind};
use crate::record::{Fatal, Record, Rejection, TableSummary};
use crate::time::{ClockTime, billable_hours};
use crate::types::{ClientName, TableId};

/// Where a tracked client currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientStatus {
    /// Inside, not at a table and not queued.
    InClub,
    /// Occupying the given table.
    Seated(TableId),
    /// In the wait queue.
    Waiting,
}

/// Who holds a table and since when.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Occupancy {
    client: ClientName,
    since: ClockTime,
}

/// One table slot.
#[derive(Debug, Clone, Default)]
struct Table {
    occupancy: Option<Occupancy>,
    /// Minutes of completed occupancy so far.
    minutes: u32,
}

impl Table {
    /// Ends the current occupancy at `time`, crediting its duration.
    fn vacate(&mut self, time: ClockTime) -> Option<ClientName> {
        let occupancy = self.occupancy.take()?;
        self.minutes += occupancy.since.minutes_until(time);
        Some(occupancy.client)
    }
}

/// How the engine handled one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// The event changed state and was echoed.
    Accepted,
    /// A repeated wait request; nothing happened and nothing was printed.
    Ignored,
    /// The wait queue was full, so the client was shown out instead.
    TurnedAway,
    /// The event was refused; state is unchanged.
    Rejected(Rejection),
    /// The run is over.
    Fatal(Fatal),
}

/// Result of applying one event: its status and the records it produced,
/// in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub status: StepStatus,
    pub records: Vec<Record>,
}

impl Step {
    const fn ignored() -> Self {
        Self {
            status: StepStatus::Ignored,
            records: Vec::new(),
        }
    }

    fn accepted(event: &Event) -> Self {
        Self {
            status: StepStatus::Accepted,
            records: vec![echo(event)],
        }
    }

    fn rejected(event: &Event, time: ClockTime, reason: Rejection) -> Self {
        tracing::info!(client = %event.client, %time, %reason, "event rejected");
        Self {
            status: StepStatus::Rejected(reason),
            records: vec![echo(event), Record::Rejected { time, reason }],
        }
    }
}

fn echo(event: &Event) -> Record {
    Record::Echo {
        event: event.clone(),
    }
}

/// Errors from misusing the engine.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    #[error("engine halted after a fatal {0} error")]
    Halted(Fatal),
}

/// End-of-day summary produced by [`Club::close`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosingReport {
    pub close_time: ClockTime,
    /// Clients still inside at closing, in ascending name order.
    pub forced_departures: Vec<ClientName>,
    /// One entry per table, in table order.
    pub tables: Vec<TableSummary>,
}

impl ClosingReport {
    /// The closing block as output records: forced departures, the closing
    /// time, then one line per table.
    pub fn records(&self) -> Vec<Record> {
        let departures = self
            .forced_departures
            .iter()
            .map(|client| Record::ForcedDeparture {
                time: self.close_time,
                client: client.clone(),
            });
        let closed = std::iter::once(Record::Closed {
            time: self.close_time,
        });
        let tables = self.tables.iter().copied().map(Record::Table);
        departures.chain(closed).chain(tables).collect()
    }

    pub fn total_revenue(&self) -> u64 {
        self.tables.iter().map(|t| t.revenue).sum()
    }

    pub fn total_minutes(&self) -> u32 {
        self.tables.iter().map(|t| t.minutes).sum()
    }
}

/// The allocation state machine for one business day.
#[derive(Debug)]
pub struct Club {
    config: ClubConfig,
    tables: Vec<Table>,
    clients: BTreeMap<ClientName, ClientStatus>,
    queue: VecDeque<ClientName>,
    halted: Option<Fatal>,
    last_time: Option<ClockTime>,
}

impl Club {
    pub fn new(config: ClubConfig) -> Self {
        let table_count = config.table_count() as usize;
        Self {
            tables: vec![Table::default(); table_count],
            clients: BTreeMap::new(),
            queue: VecDeque::with_capacity(table_count),
            halted: None,
            last_time: None,
            config,
        }
    }

    /// The first output line of a run.
    pub const fn opening(&self) -> Record {
        Record::Opened {
            time: self.config.open_time(),
        }
    }

    /// Applies the next event.
    ///
    /// Rejections and fatal errors are reported through the returned
    /// [`Step`]; the only `Err` is calling this after a fatal error.
    pub fn apply(&mut self, event: &Event) -> Result<Step, EngineError> {
        if let Some(fatal) = self.halted {
            return Err(EngineError::Halted(fatal));
        }

        let Ok(time) = event.time.parse::<ClockTime>() else {
            return Ok(self.halt(event, Fatal::IncorrectFormat));
        };
        self.note_time(time);

        let step = match event.kind {
            EventKind::Arrival => self.arrive(event, time),
            EventKind::Sit { table } => match self.config.table(table) {
                Some(table) => self.sit(event, time, table),
                None => self.halt(event, Fatal::IncorrectFormat),
            },
            EventKind::WaitForTable => self.wait(event, time),
            EventKind::Departure => self.depart(event, time),
            EventKind::Unknown { .. } => self.halt(event, Fatal::UnknownEvent),
        };
        Ok(step)
    }

    /// Closes the day: bills open occupancies up to closing time, shows
    /// everyone out and totals each table.
    pub fn close(mut self) -> Result<ClosingReport, EngineError> {
        if let Some(fatal) = self.halted {
            return Err(EngineError::Halted(fatal));
        }

        let close_time = self.config.close_time();
        for table in &mut self.tables {
            table.vacate(close_time);
        }

        let rate = u64::from(self.config.hourly_rate());
        let tables = self
            .tables
            .iter()
            .enumerate()
            .map(|(index, table)| TableSummary {
                table: TableId::from_index(index),
                revenue: u64::from(billable_hours(table.minutes)) * rate,
                minutes: table.minutes,
            })
            .collect();

        let forced_departures: Vec<_> = self.clients.into_keys().collect();
        tracing::debug!(remaining = forced_departures.len(), "club closed");

        Ok(ClosingReport {
            close_time,
            forced_departures,
            tables,
        })
    }

    /// Status of a tracked client, or `None` if absent.
    pub fn status(&self, client: &ClientName) -> Option<ClientStatus> {
        self.clients.get(client).copied()
    }

    /// Who sits at `table`, if anyone.
    pub fn occupant(&self, table: TableId) -> Option<&ClientName> {
        self.tables
            .get(table.index())?
            .occupancy
            .as_ref()
            .map(|o| &o.client)
    }

    /// The wait queue, head first.
    pub fn waiting(&self) -> impl Iterator<Item = &ClientName> {
        self.queue.iter()
    }

    pub fn free_tables(&self) -> usize {
        self.tables.iter().filter(|t| t.occupancy.is_none()).count()
    }

    pub const fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    fn note_time(&mut self, time: ClockTime) {
        if let Some(last) = self.last_time {
            if time < last {
                tracing::warn!(%time, previous = %last, "event is earlier than the one before it");
            }
        }
        self.last_time = Some(time);
    }

    fn halt(&mut self, event: &Event, error: Fatal) -> Step {
        tracing::warn!(%event, %error, "fatal error, stopping replay");
        self.halted = Some(error);
        Step {
            status: StepStatus::Fatal(error),
            records: vec![
                echo(event),
                Record::Failed {
                    time: event.time.clone(),
                    error,
                },
            ],
        }
    }

    fn arrive(&mut self, event: &Event, time: ClockTime) -> Step {
        if !self.config.is_open_at(time) {
            return Step::rejected(event, time, Rejection::NotOpenYet);
        }
        if self.clients.contains_key(&event.client) {
            return Step::rejected(event, time, Rejection::YouShallNotPass);
        }

        self.clients
            .insert(event.client.clone(), ClientStatus::InClub);
        tracing::debug!(client = %event.client, %time, "client arrived");
        Step::accepted(event)
    }

    fn sit(&mut self, event: &Event, time: ClockTime, table: TableId) -> Step {
        if self.clients.get(&event.client) != Some(&ClientStatus::InClub) {
            return Step::rejected(event, time, Rejection::ClientUnknown);
        }

        let slot = &mut self.tables[table.index()];
        if slot.occupancy.is_some() {
            return Step::rejected(event, time, Rejection::PlaceIsBusy);
        }
        slot.occupancy = Some(Occupancy {
            client: event.client.clone(),
            since: time,
        });

        self.clients
            .insert(event.client.clone(), ClientStatus::Seated(table));
        tracing::debug!(client = %event.client, %table, %time, "client seated");
        Step::accepted(event)
    }

    fn wait(&mut self, event: &Event, time: ClockTime) -> Step {
        if self.free_tables() > 0 {
            return Step::rejected(event, time, Rejection::ICanWaitNoLonger);
        }

        match self.clients.get(&event.client) {
            Some(ClientStatus::Waiting) => return Step::ignored(),
            Some(ClientStatus::Seated(_)) => {
                return Step::rejected(event, time, Rejection::ClientUnknown);
            }
            Some(ClientStatus::InClub) | None => {}
        }

        // Queue overflow shows the client out without untracking them.
        if self.queue.len() >= self.tables.len() {
            tracing::debug!(client = %event.client, %time, "wait queue full, client turned away");
            return Step {
                status: StepStatus::TurnedAway,
                records: vec![Record::ForcedDeparture {
                    time,
                    client: event.client.clone(),
                }],
            };
        }

        self.queue.push_back(event.client.clone());
        self.clients
            .insert(event.client.clone(), ClientStatus::Waiting);
        tracing::debug!(client = %event.client, %time, position = self.queue.len(), "client queued");
        Step::accepted(event)
    }

    /// The departure is echoed before the client is checked, so a refused
    /// departure still prints its echo first. The echo is printed once, not
    /// repeated before the error line (see DESIGN.md, "Departure of an
    /// unknown or waiting client").
    fn depart(&mut self, event: &Event, time: ClockTime) -> Step {
        let mut records = vec![echo(event)];

        let seat = match self.clients.get(&event.client) {
            Some(ClientStatus::InClub) => None,
            Some(ClientStatus::Seated(table)) => Some(*table),
            Some(ClientStatus::Waiting) | None => {
                let reason = Rejection::ClientUnknown;
                tracing::info!(client = %event.client, %time, %reason, "event rejected");
                records.push(Record::Rejected { time, reason });
                return Step {
                    status: StepStatus::Rejected(reason),
                    records,
                };
            }
        };

        if let Some(table) = seat {
            records.extend(self.release(table, time));
        }
        self.clients.remove(&event.client);
        tracing::debug!(client = %event.client, %time, "client left");

        Step {
            status: StepStatus::Accepted,
            records,
        }
    }

    /// Frees `table` at `time` and hands it to the head of the queue, if
    /// anyone is waiting.
    fn release(&mut self, table: TableId, time: ClockTime) -> Option<Record> {
        let slot = &mut self.tables[table.index()];
        slot.vacate(time);

        let next = self.queue.pop_front()?;
        slot.occupancy = Some(Occupancy {
            client: next.clone(),
            since: time,
        });
        self.clients.insert(next.clone(), ClientStatus::Seated(table));
        tracing::debug!(client = %next, %table, %time, "seated from wait queue");

        Some(Record::AutoSeated {
            time,
            client: next,
            table,
        })
    }
}
