//! Contraintes dures : un candidat rejeté ici ne peut pas être assigné,
//! quel que soit son score. Le filtre lit le tracker, ne l'écrit jamais.

use super::tracker::StaffTracker;
use super::types::EngineOptions;
use crate::model::{AbsenceRecord, Role, StaffMember};
use chrono::NaiveDate;

/// Motif de rejet, pour le diagnostic des pénuries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    Inactive,
    RoleMismatch,
    AlreadyScheduled,
    HoursExhausted,
    Absent,
}

/// Retourne `None` si le candidat est assignable pour (rôle, date),
/// sinon le premier motif de rejet rencontré.
pub fn check(
    staff: &StaffMember,
    role: Role,
    date: NaiveDate,
    tracker: &StaffTracker,
    absences: &[AbsenceRecord],
    opts: &EngineOptions,
) -> Option<Ineligibility> {
    if !staff.is_active {
        return Some(Ineligibility::Inactive);
    }
    if staff.role != role {
        return Some(Ineligibility::RoleMismatch);
    }
    // un seul bloc continu par jour et par membre
    if tracker.has_worked(&staff.id, date) {
        return Some(Ineligibility::AlreadyScheduled);
    }
    // en dessous du bloc minimal, aucune assignation ne vaut la peine
    if tracker.remaining_hours(staff) < opts.min_shift_hours {
        return Some(Ineligibility::HoursExhausted);
    }
    if absences.iter().any(|a| a.blocks(&staff.id, date)) {
        return Some(Ineligibility::Absent);
    }
    None
}

pub fn is_eligible(
    staff: &StaffMember,
    role: Role,
    date: NaiveDate,
    tracker: &StaffTracker,
    absences: &[AbsenceRecord],
    opts: &EngineOptions,
) -> bool {
    check(staff, role, date, tracker, absences, opts).is_none()
}
