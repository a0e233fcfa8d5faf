//! Randomized backtracking search for a valid weekly assignment.
//!
//! Each day is assigned a bitmask selecting `slots` people out of the
//! (shuffled) roster. A candidate mask is rejected when any selected person
//! has already used up their quota, would exceed the consecutive-day limit,
//! or is blocked on that day. The first full-week assignment where every
//! person hits the quota exactly wins; shuffling the roster and the
//! candidate order is what makes reruns produce different rosters.

use crate::domain::model::{DayAssignment, RosterSpec, Schedule, WeekPlan};
use crate::utils::error::{Result, RosterError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeSet;

pub fn solve_week(spec: &RosterSpec, plan: &WeekPlan) -> Result<Schedule> {
    let mut rng = match spec.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut people = spec.people.clone();
    people.shuffle(&mut rng);

    let n = people.len();
    if n > 20 {
        return Err(RosterError::ProcessingError {
            message: format!("Roster of {} people exceeds the supported maximum of 20", n),
        });
    }

    let blocked: Vec<BTreeSet<usize>> = people
        .iter()
        .map(|p| spec.blocked_for(p).cloned().unwrap_or_default())
        .collect();

    let mut day_choices: Vec<Vec<u32>> = Vec::with_capacity(plan.days.len());
    for day in &plan.days {
        if day.slots == 0 {
            day_choices.push(Vec::new());
            continue;
        }
        let mut combos = combinations(n, day.slots);
        combos.shuffle(&mut rng);
        day_choices.push(combos);
    }

    let mut search = Search {
        quota: spec.quota,
        max_consecutive: spec.max_consecutive,
        day_choices,
        blocked,
        counts: vec![0; n],
        consec: vec![0; n],
        masks: vec![0; plan.days.len()],
    };

    if !search.backtrack(0) {
        return Err(RosterError::SolverError {
            message: "exhausted all candidate assignments for this week".to_string(),
        });
    }

    let days = plan
        .days
        .iter()
        .zip(&search.masks)
        .map(|(day, &mask)| DayAssignment {
            label: day.label.clone(),
            date: day.date,
            holiday: day.holiday,
            people: (0..n)
                .filter(|p| mask & (1 << p) != 0)
                .map(|p| people[p].clone())
                .collect(),
        })
        .collect();

    Ok(Schedule { days })
}

struct Search {
    quota: usize,
    max_consecutive: usize,
    day_choices: Vec<Vec<u32>>,
    blocked: Vec<BTreeSet<usize>>,
    counts: Vec<usize>,
    consec: Vec<usize>,
    masks: Vec<u32>,
}

impl Search {
    fn backtrack(&mut self, day: usize) -> bool {
        if day == self.day_choices.len() {
            return self.counts.iter().all(|&c| c == self.quota);
        }

        // Holiday: nobody works remotely, which also breaks any
        // consecutive-day run in progress.
        if self.day_choices[day].is_empty() {
            self.masks[day] = 0;
            let saved = self.consec.clone();
            self.consec.fill(0);
            if self.backtrack(day + 1) {
                return true;
            }
            self.consec = saved;
            return false;
        }

        let candidates = self.day_choices[day].clone();
        for mask in candidates {
            if !self.admissible(mask, day) {
                continue;
            }

            let saved = self.consec.clone();
            for p in 0..self.counts.len() {
                if mask & (1 << p) != 0 {
                    self.counts[p] += 1;
                    self.consec[p] += 1;
                } else {
                    self.consec[p] = 0;
                }
            }
            self.masks[day] = mask;

            if self.backtrack(day + 1) {
                return true;
            }

            for p in 0..self.counts.len() {
                if mask & (1 << p) != 0 {
                    self.counts[p] -= 1;
                }
            }
            self.consec = saved;
        }

        false
    }

    fn admissible(&self, mask: u32, day: usize) -> bool {
        for p in 0..self.counts.len() {
            if mask & (1 << p) == 0 {
                continue;
            }
            if self.counts[p] >= self.quota {
                return false;
            }
            if self.consec[p] >= self.max_consecutive {
                return false;
            }
            if self.blocked[p].contains(&day) {
                return false;
            }
        }
        true
    }
}

/// All bitmasks selecting `k` out of `n` items.
fn combinations(n: usize, k: usize) -> Vec<u32> {
    fn combine(start: usize, mask: u32, n: usize, k: usize, out: &mut Vec<u32>) {
        if k == 0 {
            out.push(mask);
            return;
        }
        for i in start..=(n - k) {
            combine(i + 1, mask | (1 << i), n, k - 1, out);
        }
    }

    if k > n {
        return Vec::new();
    }
    let mut out = Vec::new();
    combine(0, 0, n, k, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::{BTreeSet, HashMap};

    fn spec(
        people: &[&str],
        quota: usize,
        base_slots: usize,
        extra_day: Option<usize>,
        holidays: &[usize],
        max_consecutive: usize,
    ) -> RosterSpec {
        RosterSpec {
            people: people.iter().map(|p| p.to_string()).collect(),
            quota,
            base_slots,
            extra_day,
            holidays: holidays.iter().copied().collect(),
            blocked_days: HashMap::new(),
            max_consecutive,
            week_start: NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
            seed: Some(7),
        }
    }

    fn assert_schedule_valid(spec: &RosterSpec, schedule: &Schedule) {
        for person in &spec.people {
            assert_eq!(
                schedule.remote_days_for(person),
                spec.quota,
                "{} must be remote exactly {} days",
                person,
                spec.quota
            );
        }

        let plan = WeekPlan::from_spec(spec);
        for (day, planned) in schedule.days.iter().zip(&plan.days) {
            assert_eq!(day.people.len(), planned.slots);
            if planned.holiday {
                assert!(day.people.is_empty());
            }
        }

        // Consecutive-day limit, with holidays breaking runs.
        for person in &spec.people {
            let mut run = 0usize;
            for day in &schedule.days {
                if day.holiday {
                    run = 0;
                } else if day.people.iter().any(|p| p == person) {
                    run += 1;
                    assert!(
                        run <= spec.max_consecutive,
                        "{} is remote more than {} days in a row",
                        person,
                        spec.max_consecutive
                    );
                } else {
                    run = 0;
                }
            }
        }
    }

    #[test]
    fn test_full_week_satisfies_all_constraints() {
        let spec = spec(
            &["Oussama", "Outman", "Ayoub", "Omar", "Yamin", "Sara", "Hamza"],
            3,
            4,
            Some(2),
            &[],
            2,
        );
        let plan = WeekPlan::from_spec(&spec);
        let schedule = solve_week(&spec, &plan).unwrap();
        assert_schedule_valid(&spec, &schedule);
    }

    #[test]
    fn test_holiday_day_stays_empty() {
        let spec = spec(&["A", "B", "C", "D"], 2, 2, None, &[0], 2);
        let plan = WeekPlan::from_spec(&spec);
        let schedule = solve_week(&spec, &plan).unwrap();
        assert!(schedule.days[0].holiday);
        assert!(schedule.days[0].people.is_empty());
        assert_schedule_valid(&spec, &schedule);
    }

    #[test]
    fn test_blocked_day_is_honored() {
        let mut spec = spec(
            &["Oussama", "Outman", "Ayoub", "Omar", "Yamin", "Sara", "Hamza"],
            3,
            4,
            Some(2),
            &[],
            2,
        );
        spec.blocked_days
            .insert("Sara".to_string(), BTreeSet::from([0, 1]));
        let plan = WeekPlan::from_spec(&spec);
        let schedule = solve_week(&spec, &plan).unwrap();
        assert!(!schedule.days[0].people.iter().any(|p| p == "Sara"));
        assert!(!schedule.days[1].people.iter().any(|p| p == "Sara"));
        assert_schedule_valid(&spec, &schedule);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let spec = spec(
            &["Oussama", "Outman", "Ayoub", "Omar", "Yamin", "Sara", "Hamza"],
            3,
            4,
            Some(2),
            &[],
            2,
        );
        let plan = WeekPlan::from_spec(&spec);
        let first = solve_week(&spec, &plan).unwrap();
        let second = solve_week(&spec, &plan).unwrap();
        assert_eq!(format!("{:?}", first), format!("{:?}", second));
    }

    #[test]
    fn test_different_seeds_can_differ() {
        let base = spec(
            &["Oussama", "Outman", "Ayoub", "Omar", "Yamin", "Sara", "Hamza"],
            3,
            4,
            Some(2),
            &[],
            2,
        );
        let plan = WeekPlan::from_spec(&base);
        let schedules: Vec<String> = (0..8)
            .map(|s| {
                let mut spec = base.clone();
                spec.seed = Some(s);
                format!("{:?}", solve_week(&spec, &plan).unwrap())
            })
            .collect();
        assert!(
            schedules.iter().any(|s| s != &schedules[0]),
            "eight different seeds should not all produce the same roster"
        );
    }

    #[test]
    fn test_infeasible_consecutive_limit_errors() {
        // Four working days at three slots each force one person off on
        // Tuesday or Friday, leaving them three remote days in a row.
        let spec = spec(&["A", "B", "C", "D"], 3, 3, None, &[0], 2);
        let plan = WeekPlan::from_spec(&spec);
        let err = solve_week(&spec, &plan).unwrap_err();
        assert!(matches!(err, RosterError::SolverError { .. }));
    }

    #[test]
    fn test_holiday_resets_consecutive_run() {
        // With a one-day limit, Tuesday and Thursday around the Wednesday
        // holiday must count as separate runs.
        let spec = spec(&["A", "B"], 2, 1, None, &[2], 1);
        let plan = WeekPlan::from_spec(&spec);
        let schedule = solve_week(&spec, &plan).unwrap();
        assert_schedule_valid(&spec, &schedule);
    }

    #[test]
    fn test_combinations_count() {
        assert_eq!(combinations(7, 4).len(), 35);
        assert_eq!(combinations(7, 5).len(), 21);
        assert_eq!(combinations(3, 3), vec![0b111]);
    }
}
