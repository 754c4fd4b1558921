//! Analyse a posteriori : produit des avertissements classés, sans
//! jamais modifier les assignations (passe unique, pas de retour en
//! arrière).

use super::expand::DayPlan;
use super::tracker::StaffTracker;
use super::types::{Assignment, EngineOptions, Severity, Warning, WarningKind};
use crate::model::{Role, StaffMember};

/// Pénurie constatée sur un rôle d'une journée.
#[derive(Debug, Clone, Copy)]
pub struct Shortfall {
    pub role: Role,
    pub missing: u32,
}

/// Avertissements d'une journée : absence de couverture, encadrement
/// manquant à l'ouverture/fermeture, pénuries par rôle.
pub fn day_warnings(
    plan: &DayPlan,
    assignments: &[Assignment],
    shortfalls: &[Shortfall],
    opts: &EngineOptions,
) -> Vec<Warning> {
    let mut out = Vec::new();
    let Some(window) = plan.window else {
        return out;
    };

    if assignments.is_empty() {
        out.push(Warning {
            kind: WarningKind::NoCoverage,
            severity: Severity::High,
            message: format!("no staff assigned on {} despite declared operations", plan.date),
            staff_id: None,
            date: Some(plan.date),
        });
    } else {
        let opening_covered = assignments.iter().any(|a| {
            a.role.is_management()
                && a.start_minutes <= window.start_minutes + opts.manager_cover_minutes
        });
        if !opening_covered {
            out.push(Warning {
                kind: WarningKind::MissingOpeningManager,
                severity: Severity::High,
                message: format!("no management cover at opening on {}", plan.date),
                staff_id: None,
                date: Some(plan.date),
            });
        }
        let closing_covered = assignments.iter().any(|a| {
            a.role.is_management()
                && a.end_minutes + opts.manager_cover_minutes >= window.end_minutes
        });
        if !closing_covered {
            out.push(Warning {
                kind: WarningKind::MissingClosingManager,
                severity: Severity::High,
                message: format!("no management cover at closing on {}", plan.date),
                staff_id: None,
                date: Some(plan.date),
            });
        }
    }

    for shortfall in shortfalls {
        out.push(Warning {
            kind: WarningKind::NoEligibleStaff,
            severity: Severity::Medium,
            message: format!(
                "{} {} slot(s) unfilled on {}: no eligible staff",
                shortfall.missing,
                shortfall.role.as_str(),
                plan.date
            ),
            staff_id: None,
            date: Some(plan.date),
        });
    }

    out
}

/// Avertissements de fin de semaine : écarts aux heures contractuelles.
pub fn global_warnings(
    staff: &[StaffMember],
    tracker: &StaffTracker,
    opts: &EngineOptions,
) -> Vec<Warning> {
    let mut out = Vec::new();
    for member in staff.iter().filter(|s| s.is_active) {
        let hours = tracker.weekly_hours(&member.id);
        if member.contracted_hours > 0.0
            && hours < member.contracted_hours * opts.under_contract_ratio
        {
            out.push(Warning {
                kind: WarningKind::UnderContract,
                severity: Severity::Medium,
                message: format!(
                    "{} scheduled {hours:.1}h of {:.1}h contracted",
                    member.name, member.contracted_hours
                ),
                staff_id: Some(member.id.clone()),
                date: None,
            });
        }
        if hours > member.max_hours_per_week * opts.near_max_ratio {
            out.push(Warning {
                kind: WarningKind::NearMaxHours,
                severity: Severity::Low,
                message: format!(
                    "{} scheduled {hours:.1}h, close to the {:.1}h ceiling",
                    member.name, member.max_hours_per_week
                ),
                staff_id: Some(member.id.clone()),
                date: None,
            });
        }
    }
    out
}
