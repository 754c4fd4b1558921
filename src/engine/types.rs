use crate::model::{
    AbsenceRecord, Role, ShiftTemplate, StaffId, StaffMember,
};
use crate::timeutil;
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Constantes et pondérations du moteur. Les défauts reflètent la politique
/// maison ; les tests peuvent les resserrer.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Durée minimale d'un bloc de travail (heures).
    pub min_shift_hours: f64,
    /// Durée maximale d'un bloc de travail (heures).
    pub max_shift_hours: f64,
    /// Durée idéale visée par la consolidation (heures).
    pub ideal_shift_hours: f64,
    pub weight_contract: f64,
    pub weight_consolidation: f64,
    pub weight_preference: f64,
    pub weight_availability: f64,
    /// Frontière matin/soir pour la préférence horaire (minutes, 14:00).
    pub late_boundary_minutes: u32,
    /// Fenêtre de couverture manager en début/fin de journée (minutes).
    pub manager_cover_minutes: u32,
    /// Sous le ratio d'heures contractuelles → avertissement.
    pub under_contract_ratio: f64,
    /// Au-dessus du ratio du plafond → avertissement.
    pub near_max_ratio: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            min_shift_hours: 4.0,
            max_shift_hours: 8.5,
            ideal_shift_hours: 8.0,
            weight_contract: 100.0,
            weight_consolidation: 50.0,
            weight_preference: 5.0,
            weight_availability: 40.0,
            late_boundary_minutes: 14 * 60,
            manager_cover_minutes: 60,
            under_contract_ratio: 0.8,
            near_max_ratio: 0.95,
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("week start {0} is not a Monday")]
    WeekStartNotMonday(NaiveDate),
    #[error("no shift templates supplied")]
    EmptyTemplates,
    #[error("no staff supplied")]
    EmptyStaff,
    #[error("invalid template {template}: {detail}")]
    InvalidTemplate { template: String, detail: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    NoCoverage,
    MissingOpeningManager,
    MissingClosingManager,
    NoEligibleStaff,
    UnderContract,
    NearMaxHours,
}

/// Avertissement structuré ; purement informatif, ne bloque jamais
/// une assignation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<StaffId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// Bloc de travail assigné (immuable après génération).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub staff_id: StaffId,
    pub staff_name: String,
    pub role: Role,
    pub date: NaiveDate,
    /// Minutes depuis minuit, alignées sur la demi-heure.
    pub start_minutes: u32,
    /// Peut dépasser 1440 pour une fin après minuit.
    pub end_minutes: u32,
    pub hours: f64,
}

impl Assignment {
    pub fn start_hhmm(&self) -> String {
        timeutil::format_minutes(self.start_minutes)
    }
    pub fn end_hhmm(&self) -> String {
        timeutil::format_minutes(self.end_minutes)
    }
}

/// Résultat d'une journée : fenêtre d'exploitation et assignations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayResult {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub has_operations: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_end: Option<u32>,
    pub assignments: Vec<Assignment>,
    pub warnings: Vec<Warning>,
}

/// Heures planifiées par membre, pour le récapitulatif.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffUtilization {
    pub staff_id: StaffId,
    pub name: String,
    pub hours: f64,
    pub contracted_hours: f64,
    pub max_hours_per_week: f64,
    pub days_worked: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekSummary {
    pub total_assignments: usize,
    pub total_hours: f64,
    pub total_warnings: usize,
    pub staff_utilization: Vec<StaffUtilization>,
}

/// Entrée du moteur : instantané immuable d'une semaine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Doit tomber un lundi.
    pub week_start: NaiveDate,
    pub templates: Vec<ShiftTemplate>,
    pub staff: Vec<StaffMember>,
    #[serde(default)]
    pub absences: Vec<AbsenceRecord>,
}

/// Sortie du moteur : une semaine complète, cohérente même incomplète.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResult {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub days: Vec<DayResult>,
    pub global_warnings: Vec<Warning>,
    pub summary: WeekSummary,
}

impl GenerateResult {
    /// Itère tous les avertissements (journaliers + globaux).
    pub fn all_warnings(&self) -> impl Iterator<Item = &Warning> {
        self.days
            .iter()
            .flat_map(|d| d.warnings.iter())
            .chain(self.global_warnings.iter())
    }

    pub fn has_high_severity_warnings(&self) -> bool {
        self.all_warnings().any(|w| w.severity == Severity::High)
    }
}
