//! The mutable schedule: a sparse day x timeslot grid plus per-meeting chains.
//!
//! A meeting that needs K timeslots is stored as a chain of K appointments on
//! consecutive slots of one day. The grid and the chains index the same
//! appointments and are always updated together; a meeting is either planned
//! (has a chain) or listed as unplanned, never both.

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::domain::{JudgeId, MeetingId, Problem, RoomId};
use crate::error::{Result, ScheduleError};

/// One occupied timeslot of one meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Appointment {
    pub meeting: MeetingId,
    pub judge: JudgeId,
    pub room: RoomId,
    pub day: u32,
    pub timeslot: u32,
}

/// Where a whole chain sits: resources plus the first slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub judge: JudgeId,
    pub room: RoomId,
    pub day: u32,
    pub start: u32,
}

impl Placement {
    pub const fn new(judge: JudgeId, room: RoomId, day: u32, start: u32) -> Self {
        Self {
            judge,
            room,
            day,
            start,
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "judge {} room {} day {} slot {}",
            self.judge, self.room, self.day, self.start
        )
    }
}

type Cell = (u32, u32);

/// Assignment state of every meeting of a [`Problem`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use docket_core::{Case, Judge, Meeting, Placement, Problem, Room, Schedule};
///
/// let problem = Problem::new(
///     vec![Judge::new(0, "A")],
///     vec![Room::new(0, "R")],
///     vec![Case::new(0)],
///     vec![Meeting::new(0, 0, 60)],
/// )
/// .unwrap();
///
/// // 240 minutes in 30 minute slots: 8 slots per day
/// let mut schedule = Schedule::new(Arc::new(problem), 1, 240, 30).unwrap();
/// assert!(schedule.is_unplanned(0));
///
/// schedule.plan(0, Placement::new(0, 0, 1, 3)).unwrap();
/// let chain = schedule.chain(0).unwrap();
/// assert_eq!(chain.len(), 2);
/// assert_eq!((chain[1].day, chain[1].timeslot), (1, 4));
/// ```
#[derive(Clone)]
pub struct Schedule {
    problem: Arc<Problem>,
    grid: BTreeMap<Cell, Vec<Appointment>>,
    chains: BTreeMap<MeetingId, Vec<Appointment>>,
    unplanned: BTreeSet<MeetingId>,
    work_days: u32,
    minutes_per_day: u32,
    granularity: u32,
    slots_per_day: u32,
}

impl Schedule {
    /// Creates a schedule with every meeting of the problem unplanned.
    pub fn new(
        problem: Arc<Problem>,
        work_days: u32,
        minutes_per_day: u32,
        granularity: u32,
    ) -> Result<Self> {
        if granularity == 0 {
            return Err(ScheduleError::InvalidDimensions(
                "granularity must be positive".to_string(),
            ));
        }
        if minutes_per_day == 0 || minutes_per_day % granularity != 0 {
            return Err(ScheduleError::InvalidDimensions(format!(
                "minutes per day ({}) must be a positive multiple of the granularity ({})",
                minutes_per_day, granularity
            )));
        }
        if work_days == 0 {
            return Err(ScheduleError::InvalidDimensions(
                "work days must be at least 1".to_string(),
            ));
        }

        let unplanned = (0..problem.meeting_count()).collect();
        Ok(Self {
            problem,
            grid: BTreeMap::new(),
            chains: BTreeMap::new(),
            unplanned,
            work_days,
            minutes_per_day,
            granularity,
            slots_per_day: minutes_per_day / granularity,
        })
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    /// Shared handle on the entity arena.
    pub fn problem_arc(&self) -> &Arc<Problem> {
        &self.problem
    }

    #[inline]
    pub fn work_days(&self) -> u32 {
        self.work_days
    }

    #[inline]
    pub fn minutes_per_day(&self) -> u32 {
        self.minutes_per_day
    }

    #[inline]
    pub fn granularity(&self) -> u32 {
        self.granularity
    }

    #[inline]
    pub fn slots_per_day(&self) -> u32 {
        self.slots_per_day
    }

    /// Number of timeslots the meeting occupies.
    pub fn chain_len(&self, meeting: MeetingId) -> Result<u32> {
        let duration = self.problem.meeting(meeting)?.duration;
        if duration == 0 {
            return Err(ScheduleError::ZeroDuration(meeting));
        }
        Ok(duration.div_ceil(self.granularity))
    }

    /// Zero-based position of a (day, slot) pair in the flattened grid.
    #[inline]
    pub fn flat_index(&self, day: u32, slot: u32) -> u64 {
        (day as u64 - 1) * self.slots_per_day as u64 + (slot as u64 - 1)
    }

    /// Inverse of [`flat_index`](Self::flat_index).
    #[inline]
    pub fn split_index(&self, index: u64) -> (u32, u32) {
        let per_day = self.slots_per_day as u64;
        ((index / per_day) as u32 + 1, (index % per_day) as u32 + 1)
    }

    /// Checks that a chain for `meeting` could be laid at `placement`.
    /// Returns the chain length.
    pub fn check_target(&self, meeting: MeetingId, placement: Placement) -> Result<u32> {
        let len = self.chain_len(meeting)?;
        if placement.day == 0 || placement.start == 0 {
            return Err(ScheduleError::OutOfGrid {
                day: placement.day,
                slot: placement.start,
            });
        }
        let end = placement.start.saturating_add(len - 1);
        if end > self.slots_per_day {
            return Err(ScheduleError::ExceedsDay {
                meeting,
                start: placement.start,
                end,
                slots_per_day: self.slots_per_day,
            });
        }
        Ok(len)
    }

    /// Adds a single appointment to the grid and to its meeting's chain.
    ///
    /// Grows `work_days` when the appointment lands past the horizon.
    pub fn add_appointment(&mut self, appointment: Appointment) -> Result<()> {
        let meeting = appointment.meeting;
        self.problem.meeting(meeting)?;
        if self.unplanned.contains(&meeting) {
            return Err(ScheduleError::AlreadyUnplanned(meeting));
        }
        if appointment.day == 0
            || appointment.timeslot == 0
            || appointment.timeslot > self.slots_per_day
        {
            return Err(ScheduleError::OutOfGrid {
                day: appointment.day,
                slot: appointment.timeslot,
            });
        }

        let cell = self
            .grid
            .entry((appointment.day, appointment.timeslot))
            .or_default();
        match cell.binary_search_by_key(&meeting, |a| a.meeting) {
            Ok(_) => {
                return Err(ScheduleError::ChainDesync {
                    meeting,
                    detail: format!(
                        "already holds day {} slot {}",
                        appointment.day, appointment.timeslot
                    ),
                })
            }
            Err(pos) => cell.insert(pos, appointment),
        }

        let chain = self.chains.entry(meeting).or_default();
        let key = (appointment.day, appointment.timeslot);
        let pos = chain.partition_point(|a| (a.day, a.timeslot) < key);
        chain.insert(pos, appointment);

        if appointment.day > self.work_days {
            self.work_days = appointment.day;
        }
        Ok(())
    }

    /// Removes a single appointment from the grid and from its chain.
    pub fn remove_appointment(&mut self, appointment: Appointment) -> Result<()> {
        let key = (appointment.day, appointment.timeslot);
        let not_found = || ScheduleError::AppointmentNotFound {
            meeting: appointment.meeting,
            day: appointment.day,
            slot: appointment.timeslot,
        };

        let cell_pos = self
            .grid
            .get(&key)
            .and_then(|cell| cell.iter().position(|a| *a == appointment))
            .ok_or_else(not_found)?;
        let chain_pos = self
            .chains
            .get(&appointment.meeting)
            .and_then(|chain| chain.iter().position(|a| *a == appointment))
            .ok_or_else(|| ScheduleError::ChainDesync {
                meeting: appointment.meeting,
                detail: "grid appointment without chain entry".to_string(),
            })?;

        if let Some(cell) = self.grid.get_mut(&key) {
            cell.remove(cell_pos);
            if cell.is_empty() {
                self.grid.remove(&key);
            }
        }
        if let Some(chain) = self.chains.get_mut(&appointment.meeting) {
            chain.remove(chain_pos);
            if chain.is_empty() {
                self.chains.remove(&appointment.meeting);
            }
        }
        Ok(())
    }

    /// Lays a full chain for a meeting that is neither planned nor unplanned.
    pub fn place_chain(&mut self, meeting: MeetingId, placement: Placement) -> Result<()> {
        let len = self.check_target(meeting, placement)?;
        if self.unplanned.contains(&meeting) {
            return Err(ScheduleError::AlreadyUnplanned(meeting));
        }
        if self.chains.contains_key(&meeting) {
            return Err(ScheduleError::AlreadyPlanned(meeting));
        }
        for offset in 0..len {
            self.add_appointment(Appointment {
                meeting,
                judge: placement.judge,
                room: placement.room,
                day: placement.day,
                timeslot: placement.start + offset,
            })?;
        }
        Ok(())
    }

    /// Removes a meeting's whole chain and returns where it was.
    ///
    /// The meeting is left in limbo; callers follow up with
    /// [`mark_unplanned`](Self::mark_unplanned) or [`place_chain`](Self::place_chain).
    pub fn remove_chain(&mut self, meeting: MeetingId) -> Result<Placement> {
        let chain = self.chain(meeting)?.to_vec();
        let head = chain[0];
        for appointment in chain {
            self.remove_appointment(appointment)?;
        }
        Ok(Placement::new(head.judge, head.room, head.day, head.timeslot))
    }

    /// Lists a chainless meeting as unplanned.
    pub fn mark_unplanned(&mut self, meeting: MeetingId) -> Result<()> {
        self.problem.meeting(meeting)?;
        if self.chains.contains_key(&meeting) {
            return Err(ScheduleError::AlreadyPlanned(meeting));
        }
        if !self.unplanned.insert(meeting) {
            return Err(ScheduleError::AlreadyUnplanned(meeting));
        }
        Ok(())
    }

    /// Takes a meeting out of the unplanned list.
    pub fn take_unplanned(&mut self, meeting: MeetingId) -> Result<()> {
        if self.unplanned.remove(&meeting) {
            Ok(())
        } else {
            Err(ScheduleError::NotUnplanned(meeting))
        }
    }

    /// Moves an unplanned meeting onto the grid.
    ///
    /// Used by construction code; validates before touching any state.
    pub fn plan(&mut self, meeting: MeetingId, placement: Placement) -> Result<()> {
        self.check_target(meeting, placement)?;
        if !self.unplanned.contains(&meeting) {
            return Err(ScheduleError::NotUnplanned(meeting));
        }
        self.take_unplanned(meeting)?;
        self.place_chain(meeting, placement)
    }

    /// The chain of a planned meeting, ordered by position.
    pub fn chain(&self, meeting: MeetingId) -> Result<&[Appointment]> {
        self.problem.meeting(meeting)?;
        self.chains
            .get(&meeting)
            .map(Vec::as_slice)
            .ok_or(ScheduleError::NotPlanned(meeting))
    }

    /// Where a planned meeting sits, `None` if it is unplanned.
    pub fn placement(&self, meeting: MeetingId) -> Option<Placement> {
        self.chains
            .get(&meeting)
            .and_then(|c| c.first())
            .map(|a| Placement::new(a.judge, a.room, a.day, a.timeslot))
    }

    #[inline]
    pub fn is_planned(&self, meeting: MeetingId) -> bool {
        self.chains.contains_key(&meeting)
    }

    #[inline]
    pub fn is_unplanned(&self, meeting: MeetingId) -> bool {
        self.unplanned.contains(&meeting)
    }

    /// Planned meetings in id order.
    pub fn planned_meetings(&self) -> impl Iterator<Item = MeetingId> + '_ {
        self.chains.keys().copied()
    }

    /// Unplanned meetings in id order.
    pub fn unplanned_meetings(&self) -> impl Iterator<Item = MeetingId> + '_ {
        self.unplanned.iter().copied()
    }

    pub fn planned_count(&self) -> usize {
        self.chains.len()
    }

    pub fn unplanned_count(&self) -> usize {
        self.unplanned.len()
    }

    /// Chains in meeting id order.
    pub fn chains(&self) -> impl Iterator<Item = (MeetingId, &[Appointment])> + '_ {
        self.chains.iter().map(|(m, c)| (*m, c.as_slice()))
    }

    /// Every appointment, ordered by day, then timeslot, then meeting id.
    ///
    /// The iterator borrows the schedule; calling the method again restarts
    /// the walk.
    pub fn appointments(&self) -> impl Iterator<Item = &Appointment> + '_ {
        self.grid.values().flatten()
    }

    /// Non-empty cells as `((day, slot), appointments)`, in grid order.
    pub fn cells(&self) -> impl Iterator<Item = ((u32, u32), &[Appointment])> + '_ {
        self.grid.iter().map(|(cell, a)| (*cell, a.as_slice()))
    }

    /// Appointments held in one (day, slot) cell.
    pub fn appointments_at(&self, day: u32, slot: u32) -> &[Appointment] {
        self.grid
            .get(&(day, slot))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Appointments of one day in slot order.
    pub fn appointments_on_day(&self, day: u32) -> impl Iterator<Item = &Appointment> + '_ {
        self.grid
            .range((day, 0)..=(day, u32::MAX))
            .flat_map(|(_, cell)| cell.iter())
    }

    /// Chain heads of one judge on one day, sorted by start slot.
    pub fn judge_day_placements(&self, judge: JudgeId, day: u32) -> Vec<(MeetingId, Placement)> {
        self.appointments_on_day(day)
            .filter(|a| a.judge == judge)
            .filter(|a| {
                self.chains
                    .get(&a.meeting)
                    .and_then(|c| c.first())
                    .is_some_and(|head| head == *a)
            })
            .map(|a| {
                (
                    a.meeting,
                    Placement::new(a.judge, a.room, a.day, a.timeslot),
                )
            })
            .collect()
    }

    /// True when `room` holds nothing but `except` on slots
    /// `start..start + len` of `day`.
    pub fn room_free(&self, room: RoomId, day: u32, start: u32, len: u32, except: MeetingId) -> bool {
        (start..start + len).all(|slot| {
            self.appointments_at(day, slot)
                .iter()
                .all(|a| a.room != room || a.meeting == except)
        })
    }

    /// Highest day holding an appointment.
    pub fn last_used_day(&self) -> Option<u32> {
        self.grid.keys().next_back().map(|(day, _)| *day)
    }

    /// Drops trailing days without appointments, never going below one day.
    pub fn trim_trailing_empty_days(&mut self) {
        let last = self.last_used_day().unwrap_or(1).max(1);
        if self.work_days > last {
            self.work_days = last;
        }
    }

    /// Restores an exact horizon recorded earlier.
    pub(crate) fn set_work_days(&mut self, work_days: u32) {
        self.work_days = work_days.max(1);
    }

    /// Recomputes every chain from the grid.
    pub fn rebuild_chains_from_grid(&mut self) -> Result<()> {
        let mut chains: BTreeMap<MeetingId, Vec<Appointment>> = BTreeMap::new();
        for appointment in self.grid.values().flatten() {
            if self.unplanned.contains(&appointment.meeting) {
                return Err(ScheduleError::ChainDesync {
                    meeting: appointment.meeting,
                    detail: "unplanned meeting found in grid".to_string(),
                });
            }
            chains
                .entry(appointment.meeting)
                .or_default()
                .push(*appointment);
        }
        // grid order is already (day, slot)
        self.chains = chains;
        Ok(())
    }

    /// Verifies the structural invariants of the schedule.
    pub fn check_invariants(&self) -> Result<()> {
        let desync = |meeting: MeetingId, detail: String| ScheduleError::ChainDesync { meeting, detail };

        let mut grid_count = 0usize;
        for ((day, slot), cell) in &self.grid {
            if cell.is_empty() {
                return Err(ScheduleError::InvalidDimensions(format!(
                    "empty cell kept at day {} slot {}",
                    day, slot
                )));
            }
            if *day > self.work_days || *slot > self.slots_per_day {
                return Err(ScheduleError::OutOfGrid {
                    day: *day,
                    slot: *slot,
                });
            }
            for a in cell {
                if (a.day, a.timeslot) != (*day, *slot) {
                    return Err(desync(a.meeting, "appointment filed in wrong cell".into()));
                }
                let in_chain = self
                    .chains
                    .get(&a.meeting)
                    .is_some_and(|c| c.contains(a));
                if !in_chain {
                    return Err(desync(a.meeting, format!("day {} slot {} missing from chain", day, slot)));
                }
                grid_count += 1;
            }
        }

        let mut chain_count = 0usize;
        for (meeting, chain) in &self.chains {
            let meeting = *meeting;
            if self.unplanned.contains(&meeting) {
                return Err(desync(meeting, "planned and unplanned".into()));
            }
            let len = self.chain_len(meeting)?;
            if chain.len() as u32 != len {
                return Err(desync(
                    meeting,
                    format!("chain has {} appointments, expected {}", chain.len(), len),
                ));
            }
            let head = chain[0];
            for (i, a) in chain.iter().enumerate() {
                if a.meeting != meeting
                    || a.judge != head.judge
                    || a.room != head.room
                    || a.day != head.day
                    || a.timeslot != head.timeslot + i as u32
                {
                    return Err(desync(meeting, format!("chain broken at position {}", i)));
                }
            }
            chain_count += chain.len();
        }
        if chain_count != grid_count {
            return Err(ScheduleError::ChainDesync {
                meeting: self.chains.keys().next().copied().unwrap_or_default(),
                detail: format!("{} chained vs {} gridded appointments", chain_count, grid_count),
            });
        }

        for meeting in 0..self.problem.meeting_count() {
            if !self.chains.contains_key(&meeting) && !self.unplanned.contains(&meeting) {
                return Err(desync(meeting, "neither planned nor unplanned".into()));
            }
        }
        if let Some(m) = self.unplanned.iter().find(|m| **m >= self.problem.meeting_count()) {
            return Err(ScheduleError::UnknownMeeting(*m));
        }
        Ok(())
    }
}

impl PartialEq for Schedule {
    fn eq(&self, other: &Self) -> bool {
        self.work_days == other.work_days
            && self.minutes_per_day == other.minutes_per_day
            && self.granularity == other.granularity
            && self.unplanned == other.unplanned
            && self.chains == other.chains
            && self.grid == other.grid
    }
}

impl Eq for Schedule {}

impl fmt::Debug for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schedule")
            .field("work_days", &self.work_days)
            .field("slots_per_day", &self.slots_per_day)
            .field("planned", &self.chains.len())
            .field("unplanned", &self.unplanned)
            .finish_non_exhaustive()
    }
}
