use crate::model::{Role, StaffId, StaffMember};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Trace d'audit d'un bloc assigné.
#[derive(Debug, Clone)]
pub struct BlockRecord {
    pub date: NaiveDate,
    pub role: Role,
    pub start_minutes: u32,
    pub end_minutes: u32,
    pub hours: f64,
}

#[derive(Debug, Clone, Default)]
struct TrackerEntry {
    weekly_hours: f64,
    days_worked: BTreeSet<NaiveDate>,
    blocks: Vec<BlockRecord>,
}

/// État mutable d'une génération : heures cumulées et jours travaillés
/// par membre. Une instance par run, passée explicitement de phase en
/// phase ; jamais persistée.
#[derive(Debug, Clone)]
pub struct StaffTracker {
    entries: HashMap<StaffId, TrackerEntry>,
}

impl StaffTracker {
    pub fn new(staff: &[StaffMember]) -> Self {
        let entries = staff
            .iter()
            .map(|s| (s.id.clone(), TrackerEntry::default()))
            .collect();
        Self { entries }
    }

    /// Heures déjà planifiées cette semaine (monotone croissant).
    pub fn weekly_hours(&self, id: &StaffId) -> f64 {
        self.entries.get(id).map_or(0.0, |e| e.weekly_hours)
    }

    /// Heures encore assignables sous le plafond contractuel.
    pub fn remaining_hours(&self, staff: &StaffMember) -> f64 {
        (staff.max_hours_per_week - self.weekly_hours(&staff.id)).max(0.0)
    }

    /// Un seul bloc continu par jour et par membre.
    pub fn has_worked(&self, id: &StaffId, date: NaiveDate) -> bool {
        self.entries
            .get(id)
            .is_some_and(|e| e.days_worked.contains(&date))
    }

    pub fn days_worked(&self, id: &StaffId) -> usize {
        self.entries.get(id).map_or(0, |e| e.days_worked.len())
    }

    /// Enregistre un bloc accepté : heures, jour, trace d'audit.
    pub fn record(&mut self, id: &StaffId, block: BlockRecord) {
        let entry = self.entries.entry(id.clone()).or_default();
        entry.weekly_hours += block.hours;
        entry.days_worked.insert(block.date);
        entry.blocks.push(block);
    }

    pub fn blocks(&self, id: &StaffId) -> &[BlockRecord] {
        self.entries.get(id).map_or(&[], |e| e.blocks.as_slice())
    }
}
