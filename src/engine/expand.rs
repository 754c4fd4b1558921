//! Expansion des templates : une fenêtre d'exploitation par jour, besoins
//! en rôles agrégés sur l'ensemble des templates qui se chevauchent.

use super::types::EngineError;
use crate::model::{Role, RoleRequirement, ShiftTemplate, ShiftType};
use crate::timeutil;
use chrono::{Datelike, Days, NaiveDate};

/// Fenêtre d'exploitation sur l'axe monotone (fin > 1440 si nocturne).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingWindow {
    pub start_minutes: u32,
    pub end_minutes: u32,
}

impl OperatingWindow {
    pub fn span_minutes(&self) -> u32 {
        self.end_minutes - self.start_minutes
    }
    pub fn span_hours(&self) -> f64 {
        timeutil::minutes_to_hours(self.span_minutes())
    }
}

/// Journée dérivée : fenêtre + besoins cumulés. `window = None` pour un
/// jour sans template applicable (aucune assignation produite).
#[derive(Debug, Clone)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub window: Option<OperatingWindow>,
    pub requirements: Vec<RoleRequirement>,
}

impl DayPlan {
    pub fn has_operations(&self) -> bool {
        self.window.is_some()
    }
}

/// Déplie une semaine complète (7 jours à partir du lundi donné).
pub fn expand_week(
    week_start: NaiveDate,
    templates: &[ShiftTemplate],
) -> Result<Vec<DayPlan>, EngineError> {
    (0..7u64)
        .map(|offset| {
            let date = week_start
                .checked_add_days(Days::new(offset))
                .ok_or_else(|| EngineError::Other(anyhow::anyhow!("date overflow")))?;
            expand_day(date, templates)
        })
        .collect()
}

fn expand_day(date: NaiveDate, templates: &[ShiftTemplate]) -> Result<DayPlan, EngineError> {
    let mut applicable: Vec<&ShiftTemplate> = templates
        .iter()
        .filter(|t| t.day_of_week == date.weekday())
        .collect();
    // tri stable : la priorité décide l'ordre d'agrégation, l'ordre
    // d'entrée départage
    applicable.sort_by(|a, b| b.priority.cmp(&a.priority));

    if applicable.is_empty() {
        return Ok(DayPlan {
            date,
            window: None,
            requirements: Vec::new(),
        });
    }

    let mut window: Option<OperatingWindow> = None;
    let mut requirements: Vec<RoleRequirement> = Vec::new();

    for template in applicable {
        let start = parse_template_time(template, &template.start_time)?;
        let raw_end = parse_template_time(template, &template.end_time)?;
        let end = timeutil::adjusted_end(start, raw_end);

        window = Some(match window {
            None => OperatingWindow {
                start_minutes: start,
                end_minutes: end,
            },
            Some(w) => OperatingWindow {
                start_minutes: w.start_minutes.min(start),
                end_minutes: w.end_minutes.max(end),
            },
        });

        for req in skeleton_requirements(template) {
            bump(&mut requirements, req.role, req.count);
        }
    }

    Ok(DayPlan {
        date,
        window,
        requirements,
    })
}

fn parse_template_time(template: &ShiftTemplate, raw: &str) -> Result<u32, EngineError> {
    timeutil::parse_hhmm(raw).map_err(|detail| EngineError::InvalidTemplate {
        template: template.id.clone(),
        detail,
    })
}

/// Besoins effectifs d'un template : tels quels en pointe, réduits en
/// équipe squelette à l'ouverture (1 tête en plus de l'encadrement) et
/// à la fermeture (3 têtes).
fn skeleton_requirements(template: &ShiftTemplate) -> Vec<RoleRequirement> {
    match template.shift_type {
        ShiftType::Peak => template
            .role_requirements
            .iter()
            .filter(|r| r.count > 0)
            .cloned()
            .collect(),
        ShiftType::Opening => skeleton_crew(template, 1),
        ShiftType::Closing => skeleton_crew(template, 3),
    }
}

fn skeleton_crew(template: &ShiftTemplate, extra_heads: u32) -> Vec<RoleRequirement> {
    // Exactement une présence d'encadrement. Si le template n'en déclare
    // aucune, on injecte un manager synthétique — politique héritée, à
    // confirmer côté produit.
    let management = template
        .role_requirements
        .iter()
        .find(|r| r.role.is_management() && r.count > 0)
        .map_or(Role::Manager, |r| r.role);

    let mut out = vec![RoleRequirement {
        role: management,
        count: 1,
    }];

    let others: Vec<Role> = template
        .role_requirements
        .iter()
        .filter(|r| !r.role.is_management() && r.count > 0)
        .map(|r| r.role)
        .collect();
    if others.is_empty() {
        return out;
    }

    // Cycle sur les rôles déclarés, dans l'ordre : les compteurs montent
    // quand la liste est plus courte que l'effectif cible.
    for i in 0..extra_heads as usize {
        bump(&mut out, others[i % others.len()], 1);
    }
    out
}

fn bump(requirements: &mut Vec<RoleRequirement>, role: Role, count: u32) {
    match requirements.iter_mut().find(|r| r.role == role) {
        Some(existing) => existing.count += count,
        None => requirements.push(RoleRequirement { role, count }),
    }
}
