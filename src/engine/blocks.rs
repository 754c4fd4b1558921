//! Construction des blocs de travail : un bloc continu par candidat
//! retenu, bornes étalées sur la fenêtre d'exploitation pour couvrir
//! ouverture, pointe et fermeture sans démarrage simultané de toute
//! l'équipe.

use super::expand::OperatingWindow;
use super::scoring::ScoredCandidate;
use super::tracker::{BlockRecord, StaffTracker};
use super::types::{Assignment, EngineOptions};
use crate::model::{Role, StaffMember, TimePreference};
use crate::timeutil;
use chrono::NaiveDate;

/// Remplit le quota d'un rôle en itérant la liste classée ; met à jour
/// le tracker à chaque bloc accepté. Retourne les assignations produites
/// (possiblement moins que le quota).
pub fn assign_role(
    date: NaiveDate,
    window: &OperatingWindow,
    role: Role,
    quota: u32,
    candidates: &[ScoredCandidate<'_>],
    tracker: &mut StaffTracker,
    opts: &EngineOptions,
) -> Vec<Assignment> {
    let mut assignments: Vec<Assignment> = Vec::new();

    for candidate in candidates {
        if assignments.len() as u32 >= quota {
            break;
        }
        let staff = candidate.staff;
        let Some(shift_minutes) = plannable_minutes(staff, window, tracker, opts) else {
            continue;
        };

        let (start, end) = place_block(
            window,
            shift_minutes,
            role,
            staff.time_preference,
            assignments.len() as u32,
            quota,
        );
        let Some((start, end)) = snap_into_window(window, start, end, shift_minutes) else {
            continue;
        };

        let hours = timeutil::minutes_to_hours(end - start);
        tracker.record(
            &staff.id,
            BlockRecord {
                date,
                role,
                start_minutes: start,
                end_minutes: end,
                hours,
            },
        );
        assignments.push(Assignment {
            staff_id: staff.id.clone(),
            staff_name: staff.name.clone(),
            role,
            date,
            start_minutes: start,
            end_minutes: end,
            hours,
        });
    }

    assignments
}

/// Durée assignable en minutes, alignée demi-heure vers le bas pour ne
/// jamais dépasser le reliquat. `None` sous le bloc minimal.
fn plannable_minutes(
    staff: &StaffMember,
    window: &OperatingWindow,
    tracker: &StaffTracker,
    opts: &EngineOptions,
) -> Option<u32> {
    let hours = tracker
        .remaining_hours(staff)
        .min(window.span_hours())
        .min(opts.max_shift_hours);
    let minutes = (timeutil::hours_to_minutes(hours) / 30) * 30;
    if timeutil::minutes_to_hours(minutes) < opts.min_shift_hours {
        return None;
    }
    Some(minutes)
}

/// Position brute du bloc dans la fenêtre, avant arrondi.
fn place_block(
    window: &OperatingWindow,
    shift_minutes: u32,
    role: Role,
    preference: TimePreference,
    index: u32,
    quota: u32,
) -> (u32, u32) {
    let span = window.span_minutes();
    if shift_minutes >= span {
        return (window.start_minutes, window.end_minutes);
    }

    if role.is_management() {
        // le premier encadrant ouvre, les suivants ferment
        return if index == 0 {
            (window.start_minutes, window.start_minutes + shift_minutes)
        } else {
            (window.end_minutes - shift_minutes, window.end_minutes)
        };
    }

    let closers = if quota >= 4 { 2 } else { 1 };
    if index >= quota.saturating_sub(closers) {
        // les derniers assignés garantissent la fermeture
        return (window.end_minutes - shift_minutes, window.end_minutes);
    }

    let openers = quota - closers;
    let fraction = f64::from(index) / f64::from(openers.max(1));
    let fraction = match preference {
        TimePreference::Early => fraction * 0.5,
        TimePreference::Late => 0.5 + fraction * 0.5,
        TimePreference::Flexible => fraction,
    };
    let latest_start = window.end_minutes - shift_minutes;
    let offset = (f64::from(latest_start - window.start_minutes) * fraction).round() as u32;
    let start = window.start_minutes + offset;
    (start, start + shift_minutes)
}

/// Arrondit les bornes à la demi-heure puis les ramène dans la fenêtre ;
/// la longueur finale ne dépasse jamais `shift_minutes`.
fn snap_into_window(
    window: &OperatingWindow,
    start: u32,
    end: u32,
    shift_minutes: u32,
) -> Option<(u32, u32)> {
    let mut start = timeutil::round_to_half_hour(start).max(window.start_minutes);
    let mut end = timeutil::round_to_half_hour(end).min(window.end_minutes);
    if end.saturating_sub(start) > shift_minutes {
        start = end - shift_minutes;
    }
    if start < window.start_minutes {
        start = window.start_minutes;
        end = (start + shift_minutes).min(window.end_minutes);
    }
    (end > start).then_some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scoring;
    use crate::model::StaffMember;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn window(start: u32, end: u32) -> OperatingWindow {
        OperatingWindow {
            start_minutes: start,
            end_minutes: end,
        }
    }

    fn roster(role: Role, count: usize) -> Vec<StaffMember> {
        (0..count)
            .map(|i| StaffMember::new(format!("p{i}"), role, 40.0, 35.0).unwrap())
            .collect()
    }

    fn assign(
        staff: &[StaffMember],
        role: Role,
        quota: u32,
        w: &OperatingWindow,
        tracker: &mut StaffTracker,
    ) -> Vec<Assignment> {
        let opts = EngineOptions::default();
        let ranked =
            scoring::rank_candidates(staff, role, monday(), w, tracker, &[], &opts);
        assign_role(monday(), w, role, quota, &ranked, tracker, &opts)
    }

    #[test]
    fn short_window_assigns_whole_window() {
        let staff = roster(Role::Waiter, 1);
        let mut tracker = StaffTracker::new(&staff);
        let w = window(480, 780); // 5h < max
        let out = assign(&staff, Role::Waiter, 1, &w, &mut tracker);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].start_minutes, 480);
        assert_eq!(out[0].end_minutes, 780);
        assert_eq!(out[0].hours, 5.0);
    }

    #[test]
    fn first_manager_opens_second_closes() {
        let staff = roster(Role::Manager, 2);
        let mut tracker = StaffTracker::new(&staff);
        let w = window(480, 1380); // 08:00–23:00, 15h
        let out = assign(&staff, Role::Manager, 2, &w, &mut tracker);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].start_minutes, w.start_minutes);
        assert_eq!(out[1].end_minutes, w.end_minutes);
    }

    #[test]
    fn last_non_manager_covers_close() {
        let staff = roster(Role::Waiter, 3);
        let mut tracker = StaffTracker::new(&staff);
        let w = window(480, 1380);
        let out = assign(&staff, Role::Waiter, 3, &w, &mut tracker);
        assert_eq!(out.len(), 3);
        // quota < 4 → exactement un fermeur, le dernier assigné
        assert_eq!(out[2].end_minutes, w.end_minutes);
        // le premier ouvreur démarre à l'ouverture
        assert_eq!(out[0].start_minutes, w.start_minutes);
        // les ouvreurs ne ferment pas tous
        assert!(out[0].end_minutes < w.end_minutes);
    }

    #[test]
    fn four_or_more_get_two_closers() {
        let staff = roster(Role::Waiter, 4);
        let mut tracker = StaffTracker::new(&staff);
        let w = window(480, 1380);
        let out = assign(&staff, Role::Waiter, 4, &w, &mut tracker);
        assert_eq!(out.len(), 4);
        let closers = out
            .iter()
            .filter(|a| a.end_minutes == w.end_minutes)
            .count();
        assert_eq!(closers, 2);
    }

    #[test]
    fn boundaries_are_half_hour_aligned() {
        let staff = roster(Role::Waiter, 3);
        let mut tracker = StaffTracker::new(&staff);
        let w = window(480, 1380);
        let out = assign(&staff, Role::Waiter, 3, &w, &mut tracker);
        for a in &out {
            assert_eq!(a.start_minutes % 30, 0, "start {}", a.start_minutes);
            assert_eq!(a.end_minutes % 30, 0, "end {}", a.end_minutes);
            assert!(a.start_minutes >= w.start_minutes);
            assert!(a.end_minutes <= w.end_minutes);
        }
    }

    #[test]
    fn candidate_below_min_shift_is_skipped() {
        let tired = StaffMember::new("tired", Role::Waiter, 10.0, 10.0).unwrap();
        let fresh = StaffMember::new("fresh", Role::Waiter, 40.0, 35.0).unwrap();
        let staff = vec![tired.clone(), fresh];
        let mut tracker = StaffTracker::new(&staff);
        tracker.record(
            &tired.id,
            BlockRecord {
                date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
                role: Role::Waiter,
                start_minutes: 540,
                end_minutes: 1020,
                hours: 8.0,
            },
        );
        let w = window(480, 1380);
        let out = assign(&staff, Role::Waiter, 2, &w, &mut tracker);
        // "tired" n'a que 2h restantes : écarté, seul "fresh" est assigné
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].staff_name, "fresh");
    }

    #[test]
    fn quota_exhausts_candidate_list_gracefully() {
        let staff = roster(Role::Waiter, 1);
        let mut tracker = StaffTracker::new(&staff);
        let w = window(480, 1380);
        let out = assign(&staff, Role::Waiter, 5, &w, &mut tracker);
        assert_eq!(out.len(), 1);
    }
}
