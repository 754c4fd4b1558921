#![forbid(unsafe_code)]
//! Rotaplan — bibliothèque de génération de plannings hebdomadaires (sans BD).
//!
//! - Stockage fichiers (JSON/CSV).
//! - Assignation en passe unique : filtre dur, score pondéré, blocs étalés.
//! - Créneaux nocturnes gérés sur un axe minutes monotone.
//! - Le moteur est une fonction pure (templates, staff, absences, semaine)
//!   → (assignations, avertissements) ; la persistance reste en dehors.

pub mod engine;
pub mod io;
pub mod model;
pub mod storage;
pub mod timeutil;

pub use engine::{
    Assignment, DayResult, EngineError, EngineOptions, GenerateRequest, GenerateResult,
    RotaEngine, Severity, StaffTracker, Warning, WarningKind, WeekSummary,
};
pub use model::{
    AbsenceRecord, AbsenceStatus, Role, RoleRequirement, ShiftTemplate, ShiftType, StaffId,
    StaffMember, TimePreference,
};
pub use storage::RotaStore;
