use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifiant fort pour StaffMember
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffId(String);

impl StaffId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Fonction occupée par un membre du personnel. Énumération fermée :
/// le parsing insensible à la casse se fait une seule fois à la frontière
/// d'entrée, le moteur ne compare que des variantes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Manager,
    AssistantManager,
    Chef,
    Waiter,
    Bartender,
    Barista,
    Cleaner,
}

impl Role {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "manager" => Ok(Self::Manager),
            "assistant_manager" => Ok(Self::AssistantManager),
            "chef" | "cook" => Ok(Self::Chef),
            "waiter" | "waitress" | "server" => Ok(Self::Waiter),
            "bartender" => Ok(Self::Bartender),
            "barista" => Ok(Self::Barista),
            "cleaner" => Ok(Self::Cleaner),
            _ => Err(format!("unknown role: {raw:?}")),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::AssistantManager => "assistant_manager",
            Self::Chef => "chef",
            Self::Waiter => "waiter",
            Self::Bartender => "bartender",
            Self::Barista => "barista",
            Self::Cleaner => "cleaner",
        }
    }

    /// Manager ou assistant : couvre l'ouverture/fermeture.
    pub fn is_management(&self) -> bool {
        matches!(self, Self::Manager | Self::AssistantManager)
    }
}

/// Préférence horaire d'un membre ; jamais bloquante, pondérée faiblement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePreference {
    Early,
    Late,
    #[default]
    Flexible,
}

impl TimePreference {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "early" | "morning" => Ok(Self::Early),
            "late" | "evening" => Ok(Self::Late),
            "flexible" | "" => Ok(Self::Flexible),
            _ => Err(format!("unknown time preference: {raw:?}")),
        }
    }
}

/// Membre du personnel (lecture seule pour le moteur).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    pub role: Role,
    pub max_hours_per_week: f64,
    /// Cible contractuelle ; 0.0 = non renseignée (le plafond sert de cible).
    #[serde(default)]
    pub contracted_hours: f64,
    #[serde(default)]
    pub available_days: Vec<Weekday>,
    #[serde(default)]
    pub time_preference: TimePreference,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl StaffMember {
    /// Crée un membre en validant `contracted_hours <= max_hours_per_week`.
    pub fn new<N: Into<String>>(
        name: N,
        role: Role,
        max_hours_per_week: f64,
        contracted_hours: f64,
    ) -> Result<Self, String> {
        if max_hours_per_week <= 0.0 {
            return Err("max_hours_per_week must be positive".to_string());
        }
        if contracted_hours < 0.0 {
            return Err("contracted_hours cannot be negative".to_string());
        }
        if contracted_hours > max_hours_per_week {
            return Err("contracted_hours cannot exceed max_hours_per_week".to_string());
        }
        Ok(Self {
            id: StaffId::random(),
            name: name.into(),
            role,
            max_hours_per_week,
            contracted_hours,
            available_days: Vec::new(),
            time_preference: TimePreference::Flexible,
            is_active: true,
        })
    }

    /// Cible d'heures : contrat si renseigné, sinon le plafond.
    pub fn contract_target(&self) -> f64 {
        if self.contracted_hours > 0.0 {
            self.contracted_hours
        } else {
            self.max_hours_per_week
        }
    }

    pub fn is_available_on(&self, day: Weekday) -> bool {
        self.available_days.contains(&day)
    }
}

/// Densité de personnel attendue pour un template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    Opening,
    #[default]
    Peak,
    Closing,
}

impl ShiftType {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "opening" => Ok(Self::Opening),
            "peak" | "" => Ok(Self::Peak),
            "closing" => Ok(Self::Closing),
            _ => Err(format!("unknown shift type: {raw:?}")),
        }
    }
}

/// Besoin en personnel pour un rôle donné.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRequirement {
    pub role: Role,
    pub count: u32,
}

/// Template d'horaires d'ouverture pour un jour de semaine.
/// Plusieurs templates sur le même jour = demande cumulée, pas alternatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftTemplate {
    pub id: String,
    pub name: String,
    pub day_of_week: Weekday,
    /// Horaire mural `HH:MM` ; `end_time <= start_time` = créneau nocturne.
    pub start_time: String,
    pub end_time: String,
    pub role_requirements: Vec<RoleRequirement>,
    #[serde(default)]
    pub priority: u8,
    #[serde(default)]
    pub shift_type: ShiftType,
}

impl ShiftTemplate {
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("template id cannot be empty".to_string());
        }
        if self.name.trim().is_empty() {
            return Err("template name cannot be empty".to_string());
        }
        crate::timeutil::parse_hhmm(&self.start_time)?;
        crate::timeutil::parse_hhmm(&self.end_time)?;
        if self.role_requirements.is_empty() {
            return Err("template must declare at least one role requirement".to_string());
        }
        if self.role_requirements.iter().all(|r| r.count == 0) {
            return Err("template role requirements are all zero".to_string());
        }
        Ok(())
    }
}

/// Statut d'une absence ; seules les absences approuvées contraignent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceStatus {
    Approved,
    Pending,
    Rejected,
}

impl AbsenceStatus {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "approved" => Ok(Self::Approved),
            "pending" => Ok(Self::Pending),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("unknown absence status: {raw:?}")),
        }
    }
}

/// Absence sur un intervalle de dates inclusif `[start_date, end_date]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceRecord {
    pub staff_id: StaffId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: AbsenceStatus,
}

impl AbsenceRecord {
    pub fn new(
        staff_id: StaffId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        status: AbsenceStatus,
    ) -> Result<Self, String> {
        if end_date < start_date {
            return Err("absence end_date must not precede start_date".to_string());
        }
        Ok(Self {
            staff_id,
            start_date,
            end_date,
            status,
        })
    }

    /// Vraie si l'absence est approuvée et couvre `date`.
    pub fn blocks(&self, staff_id: &StaffId, date: NaiveDate) -> bool {
        self.status == AbsenceStatus::Approved
            && &self.staff_id == staff_id
            && self.start_date <= date
            && date <= self.end_date
    }
}

/// Parse un jour de semaine depuis un libellé court ou long, insensible
/// à la casse.
pub fn parse_weekday(raw: &str) -> Result<Weekday, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(format!("unknown weekday: {raw:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!(Role::parse("Manager").unwrap(), Role::Manager);
        assert_eq!(
            Role::parse("assistant manager").unwrap(),
            Role::AssistantManager
        );
        assert_eq!(Role::parse("WAITER").unwrap(), Role::Waiter);
        assert!(Role::parse("astronaut").is_err());
    }

    #[test]
    fn staff_invariant_contract_below_max() {
        assert!(StaffMember::new("a", Role::Waiter, 40.0, 45.0).is_err());
        let s = StaffMember::new("a", Role::Waiter, 40.0, 0.0).unwrap();
        assert_eq!(s.contract_target(), 40.0);
        let s = StaffMember::new("a", Role::Waiter, 40.0, 32.0).unwrap();
        assert_eq!(s.contract_target(), 32.0);
    }

    #[test]
    fn absence_blocks_only_when_approved_and_covering() {
        let id = StaffId::new("s1");
        let a = AbsenceRecord::new(
            id.clone(),
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 4).unwrap(),
            AbsenceStatus::Approved,
        )
        .unwrap();
        assert!(a.blocks(&id, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()));
        assert!(a.blocks(&id, NaiveDate::from_ymd_opt(2025, 6, 4).unwrap()));
        assert!(!a.blocks(&id, NaiveDate::from_ymd_opt(2025, 6, 5).unwrap()));
        assert!(!a.blocks(&StaffId::new("s2"), NaiveDate::from_ymd_opt(2025, 6, 3).unwrap()));

        let pending = AbsenceRecord::new(
            id.clone(),
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 4).unwrap(),
            AbsenceStatus::Pending,
        )
        .unwrap();
        assert!(!pending.blocks(&id, NaiveDate::from_ymd_opt(2025, 6, 3).unwrap()));
    }
}
