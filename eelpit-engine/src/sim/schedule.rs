// schedule.rs - Timers for the frame driver
//
// Timers never touch pit state. When due they post an event into the
// driver's queue, which drains it in the same frame.

use std::collections::VecDeque;

use crate::event::PitEvent;

struct Pending {
    at: f64,
    seq: u64,
    event: PitEvent,
}

struct Interval {
    every: f64,
    next: f64,
    event: PitEvent,
}

#[derive(Default)]
pub struct Schedule {
    pending: Vec<Pending>,
    intervals: Vec<Interval>,
    seq: u64,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post `event` once, `delay` seconds after `now`.
    pub fn after(&mut self, now: f64, delay: f64, event: PitEvent) {
        self.pending.push(Pending { at: now + delay.max(0.0), seq: self.seq, event });
        self.seq += 1;
    }

    /// Post `event` every `period` seconds, first at `now + period`.
    /// Re-arming an event that already repeats is a no-op.
    pub fn every(&mut self, now: f64, period: f64, event: PitEvent) {
        if self.is_repeating(&event) { return; }
        self.intervals.push(Interval { every: period, next: now + period, event });
    }

    pub fn is_repeating(&self, event: &PitEvent) -> bool {
        self.intervals.iter().any(|i| i.event == *event)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Move everything due at `now` into `queue`: one-shots in firing order,
    /// then each interval at most once.
    pub fn fire(&mut self, now: f64, queue: &mut VecDeque<PitEvent>) {
        self.pending.sort_by(|a, b| a.at.total_cmp(&b.at).then(a.seq.cmp(&b.seq)));
        let due = self.pending.partition_point(|p| p.at <= now);
        queue.extend(self.pending.drain(..due).map(|p| p.event));

        for interval in &mut self.intervals {
            if now < interval.next { continue; }
            queue.push_back(interval.event);
            interval.next += interval.every;
            if interval.next <= now {
                // Fell behind (long frame); skip the missed beats.
                interval.next = now + interval.every;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire(schedule: &mut Schedule, now: f64) -> Vec<PitEvent> {
        let mut q = VecDeque::new();
        schedule.fire(now, &mut q);
        q.into_iter().collect()
    }

    #[test]
    fn one_shots_fire_in_time_order() {
        let mut s = Schedule::new();
        s.after(0.0, 0.08, PitEvent::SpawnCrumb { x: Some(2.0), y: None });
        s.after(0.0, 0.04, PitEvent::SpawnCrumb { x: Some(1.0), y: None });
        s.after(0.0, 0.5, PitEvent::Trickle);

        assert!(fire(&mut s, 0.01).is_empty());
        assert_eq!(
            fire(&mut s, 0.1),
            vec![
                PitEvent::SpawnCrumb { x: Some(1.0), y: None },
                PitEvent::SpawnCrumb { x: Some(2.0), y: None },
            ]
        );
        assert_eq!(s.pending(), 1);
        assert_eq!(fire(&mut s, 0.5), vec![PitEvent::Trickle]);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn intervals_repeat_without_bursting() {
        let mut s = Schedule::new();
        s.every(0.0, 1.0, PitEvent::Flash);
        s.every(0.0, 1.0, PitEvent::Flash);

        assert!(fire(&mut s, 0.5).is_empty());
        assert_eq!(fire(&mut s, 1.0), vec![PitEvent::Flash]);
        assert!(fire(&mut s, 1.5).is_empty());
        // A ten second gap still yields a single beat.
        assert_eq!(fire(&mut s, 12.0), vec![PitEvent::Flash]);
        assert!(fire(&mut s, 12.5).is_empty());
        assert_eq!(fire(&mut s, 13.0), vec![PitEvent::Flash]);
    }
}
