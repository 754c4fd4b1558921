//! Contraintes souples : classement pondéré des candidats éligibles.
//! Quatre facteurs, somme pondérée, tri stable décroissant — l'ordre du
//! roster départage les ex æquo.

use super::eligibility;
use super::expand::OperatingWindow;
use super::tracker::StaffTracker;
use super::types::EngineOptions;
use crate::model::{AbsenceRecord, Role, StaffMember, TimePreference};
use chrono::{Datelike, NaiveDate};

/// Candidat éligible avec son score agrégé.
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    pub staff: &'a StaffMember,
    pub score: f64,
}

/// Filtre l'éligibilité puis classe par score décroissant.
pub fn rank_candidates<'a>(
    staff: &'a [StaffMember],
    role: Role,
    date: NaiveDate,
    window: &OperatingWindow,
    tracker: &StaffTracker,
    absences: &[AbsenceRecord],
    opts: &EngineOptions,
) -> Vec<ScoredCandidate<'a>> {
    let mut candidates: Vec<ScoredCandidate<'a>> = staff
        .iter()
        .filter(|s| eligibility::is_eligible(s, role, date, tracker, absences, opts))
        .map(|s| ScoredCandidate {
            score: total_score(s, date, window, tracker, opts),
            staff: s,
        })
        .collect();
    // tri stable : les égalités gardent l'ordre du roster
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    candidates
}

fn total_score(
    staff: &StaffMember,
    date: NaiveDate,
    window: &OperatingWindow,
    tracker: &StaffTracker,
    opts: &EngineOptions,
) -> f64 {
    let possible_hours = tracker
        .remaining_hours(staff)
        .min(window.span_hours())
        .min(opts.max_shift_hours);

    opts.weight_contract * contract_score(staff, tracker.weekly_hours(&staff.id))
        + opts.weight_consolidation * consolidation_score(possible_hours, opts)
        + opts.weight_preference * preference_score(staff.time_preference, window, opts)
        + opts.weight_availability * availability_score(staff, date)
}

/// Besoin contractuel : plus on est loin de sa cible, plus on monte.
fn contract_score(staff: &StaffMember, worked: f64) -> f64 {
    let target = staff.contract_target();
    if target <= 0.0 {
        return 0.0;
    }
    ((target - worked) / target).max(0.0)
}

/// Consolidation : privilégie les candidats à qui on peut encore donner
/// un bloc long. Plancher à 0.2 sous le minimum — jamais zéro.
fn consolidation_score(possible_hours: f64, opts: &EngineOptions) -> f64 {
    if possible_hours >= opts.ideal_shift_hours {
        1.0
    } else if possible_hours >= opts.min_shift_hours {
        possible_hours / opts.ideal_shift_hours
    } else {
        0.2
    }
}

/// Alignement préférence/créneau, via le milieu de la fenêtre comparé à
/// la frontière 14:00. Délibérément mineur : simple départage.
fn preference_score(
    preference: TimePreference,
    window: &OperatingWindow,
    opts: &EngineOptions,
) -> f64 {
    let midpoint = (window.start_minutes + window.end_minutes) / 2;
    let leans_early = midpoint < opts.late_boundary_minutes;
    match preference {
        TimePreference::Flexible => 0.5,
        TimePreference::Early => {
            if leans_early {
                1.0
            } else {
                0.3
            }
        }
        TimePreference::Late => {
            if leans_early {
                0.8
            } else {
                1.0
            }
        }
    }
}

/// Disponibilité déclarée : contrainte souple, pas un doublon du filtre
/// dur — un jour hors disponibilité reste assignable, pénalisé à 0.2.
fn availability_score(staff: &StaffMember, date: NaiveDate) -> f64 {
    if staff.is_available_on(date.weekday()) {
        1.0
    } else {
        0.2
    }
}
