//! Moteur de génération : Expansion → (par jour) Éligibilité → Score →
//! Blocs → Tracker → (fin de semaine) Avertissements. Calcul pur,
//! synchrone et déterministe sur un instantané immuable.

pub mod blocks;
pub mod eligibility;
pub mod expand;
pub mod scoring;
pub mod tracker;
pub mod types;
pub mod warnings;

pub use eligibility::Ineligibility;
pub use expand::{DayPlan, OperatingWindow};
pub use tracker::{BlockRecord, StaffTracker};
pub use types::{
    Assignment, DayResult, EngineError, EngineOptions, GenerateRequest, GenerateResult,
    Severity, StaffUtilization, Warning, WarningKind, WeekSummary,
};

use chrono::{Datelike, Days, Weekday};

/// Moteur de planification hebdomadaire. Une instance est réutilisable ;
/// chaque run reçoit son propre tracker, deux générations concurrentes
/// ne partagent aucun état.
#[derive(Debug, Default)]
pub struct RotaEngine {
    options: EngineOptions,
}

impl RotaEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Génère la semaine complète. Ne retourne une erreur que pour une
    /// violation de contrat d'appel ; les pénuries de couverture sont des
    /// avertissements dans un résultat complet et cohérent.
    pub fn generate(&self, request: &GenerateRequest) -> Result<GenerateResult, EngineError> {
        validate_request(request)?;

        let plans = expand::expand_week(request.week_start, &request.templates)?;
        let mut tracker = StaffTracker::new(&request.staff);
        let mut days: Vec<DayResult> = Vec::with_capacity(plans.len());

        for plan in &plans {
            let mut assignments: Vec<Assignment> = Vec::new();
            let mut shortfalls: Vec<warnings::Shortfall> = Vec::new();

            if let Some(window) = plan.window {
                for requirement in &plan.requirements {
                    if requirement.count == 0 {
                        continue;
                    }
                    let ranked = scoring::rank_candidates(
                        &request.staff,
                        requirement.role,
                        plan.date,
                        &window,
                        &tracker,
                        &request.absences,
                        &self.options,
                    );
                    let produced = blocks::assign_role(
                        plan.date,
                        &window,
                        requirement.role,
                        requirement.count,
                        &ranked,
                        &mut tracker,
                        &self.options,
                    );
                    let missing = requirement.count - produced.len() as u32;
                    if missing > 0 {
                        shortfalls.push(warnings::Shortfall {
                            role: requirement.role,
                            missing,
                        });
                    }
                    assignments.extend(produced);
                }
            }

            let day_warnings =
                warnings::day_warnings(plan, &assignments, &shortfalls, &self.options);

            #[cfg(feature = "logging")]
            tracing::debug!(
                date = %plan.date,
                assignments = assignments.len(),
                warnings = day_warnings.len(),
                "day generated"
            );

            days.push(DayResult {
                date: plan.date,
                weekday: plan.date.weekday(),
                has_operations: plan.has_operations(),
                operating_start: plan.window.map(|w| w.start_minutes),
                operating_end: plan.window.map(|w| w.end_minutes),
                assignments,
                warnings: day_warnings,
            });
        }

        let global_warnings =
            warnings::global_warnings(&request.staff, &tracker, &self.options);
        let summary = build_summary(&days, &global_warnings, &request.staff, &tracker);

        Ok(GenerateResult {
            week_start: request.week_start,
            week_end: request
                .week_start
                .checked_add_days(Days::new(6))
                .ok_or_else(|| EngineError::Other(anyhow::anyhow!("date overflow")))?,
            days,
            global_warnings,
            summary,
        })
    }
}

fn validate_request(request: &GenerateRequest) -> Result<(), EngineError> {
    if request.week_start.weekday() != Weekday::Mon {
        return Err(EngineError::WeekStartNotMonday(request.week_start));
    }
    if request.templates.is_empty() {
        return Err(EngineError::EmptyTemplates);
    }
    if request.staff.is_empty() {
        return Err(EngineError::EmptyStaff);
    }
    for template in &request.templates {
        template
            .validate()
            .map_err(|detail| EngineError::InvalidTemplate {
                template: template.id.clone(),
                detail,
            })?;
    }
    Ok(())
}

fn build_summary(
    days: &[DayResult],
    global_warnings: &[Warning],
    staff: &[crate::model::StaffMember],
    tracker: &StaffTracker,
) -> WeekSummary {
    let total_assignments = days.iter().map(|d| d.assignments.len()).sum();
    let total_hours = days
        .iter()
        .flat_map(|d| d.assignments.iter())
        .map(|a| a.hours)
        .sum();
    let total_warnings =
        days.iter().map(|d| d.warnings.len()).sum::<usize>() + global_warnings.len();

    let staff_utilization = staff
        .iter()
        .filter(|s| s.is_active)
        .map(|s| StaffUtilization {
            staff_id: s.id.clone(),
            name: s.name.clone(),
            hours: tracker.weekly_hours(&s.id),
            contracted_hours: s.contracted_hours,
            max_hours_per_week: s.max_hours_per_week,
            days_worked: tracker.days_worked(&s.id),
        })
        .collect();

    WeekSummary {
        total_assignments,
        total_hours,
        total_warnings,
        staff_utilization,
    }
}
