use crate::engine::GenerateResult;
use crate::model::{
    parse_weekday, AbsenceRecord, AbsenceStatus, Role, ShiftTemplate, StaffId, StaffMember,
    TimePreference,
};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import du personnel depuis CSV : header
/// `name,role,max_hours,contracted_hours[,available_days][,time_preference][,active]`.
/// `available_days` est une liste `;`-séparée de jours (`mon;tue;...`).
pub fn import_staff_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<StaffMember>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        let role_raw = rec.get(1).context("missing role")?.trim();
        if name.is_empty() || role_raw.is_empty() {
            bail!("invalid staff row (empty name or role)");
        }
        let role = Role::parse(role_raw).map_err(anyhow::Error::msg)?;
        let max_hours: f64 = rec
            .get(2)
            .context("missing max_hours")?
            .trim()
            .parse()
            .with_context(|| format!("invalid max_hours for {name}"))?;
        let contracted: f64 = match rec.get(3).map(str::trim) {
            Some("") | None => 0.0,
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid contracted_hours for {name}"))?,
        };
        let mut member = StaffMember::new(name.to_string(), role, max_hours, contracted)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid staff record for {name}"))?;
        if let Some(days) = rec.get(4) {
            let days = days.trim();
            if !days.is_empty() {
                member.available_days = parse_days(days)
                    .with_context(|| format!("invalid available_days for {name}"))?;
            }
        }
        if let Some(pref) = rec.get(5) {
            let pref = pref.trim();
            if !pref.is_empty() {
                member.time_preference = TimePreference::parse(pref)
                    .map_err(anyhow::Error::msg)
                    .with_context(|| format!("invalid time_preference for {name}"))?;
            }
        }
        if let Some(flag) = rec.get(6) {
            let flag = flag.trim();
            if !flag.is_empty() {
                member.is_active = parse_bool(flag)
                    .with_context(|| format!("invalid active value for {name}"))?;
            }
        }
        out.push(member);
    }
    Ok(out)
}

fn parse_days(raw: &str) -> anyhow::Result<Vec<chrono::Weekday>> {
    raw.split(';')
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| parse_weekday(chunk).map_err(anyhow::Error::msg))
        .collect()
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

/// Import des absences : header `name,start,end[,status]` (dates
/// `YYYY-MM-DD`, statut `approved` par défaut). Les noms sont résolus
/// contre le roster importé.
pub fn import_absences_csv<P: AsRef<Path>>(
    path: P,
    staff: &[StaffMember],
) -> anyhow::Result<Vec<AbsenceRecord>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        let staff_id = resolve_staff(staff, name)?;
        let start = parse_date(rec.get(1).context("missing start")?.trim())?;
        let end = parse_date(rec.get(2).context("missing end")?.trim())?;
        let status = match rec.get(3).map(str::trim) {
            Some("") | None => AbsenceStatus::Approved,
            Some(raw) => AbsenceStatus::parse(raw).map_err(anyhow::Error::msg)?,
        };
        let record = AbsenceRecord::new(staff_id, start, end, status)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid absence for {name}"))?;
        out.push(record);
    }
    Ok(out)
}

fn resolve_staff(staff: &[StaffMember], name: &str) -> anyhow::Result<StaffId> {
    staff
        .iter()
        .find(|s| s.name == name)
        .map(|s| s.id.clone())
        .with_context(|| format!("unknown staff name: {name}"))
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

/// Charge et valide des templates depuis un fichier JSON.
pub fn load_templates_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<ShiftTemplate>> {
    let data = fs::read(&path)
        .with_context(|| format!("reading templates {}", path.as_ref().display()))?;
    let templates: Vec<ShiftTemplate> = serde_json::from_slice(&data)
        .with_context(|| format!("parsing templates {}", path.as_ref().display()))?;
    for template in &templates {
        template
            .validate()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid template {}", template.id))?;
    }
    Ok(templates)
}

/// Export JSON des templates (jolie mise en forme).
pub fn export_templates_json<P: AsRef<Path>>(
    path: P,
    templates: &[ShiftTemplate],
) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(templates)?;
    fs::write(path, json)?;
    Ok(())
}

/// Export JSON du résultat complet d'une génération.
pub fn export_result_json<P: AsRef<Path>>(path: P, result: &GenerateResult) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path, json)?;
    Ok(())
}

/// Export CSV des assignations : header
/// `date,weekday,staff,role,start,end,hours`.
pub fn export_assignments_csv<P: AsRef<Path>>(
    path: P,
    result: &GenerateResult,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "weekday", "staff", "role", "start", "end", "hours"])?;
    for day in &result.days {
        for a in &day.assignments {
            w.write_record([
                a.date.to_string().as_str(),
                day.weekday.to_string().as_str(),
                a.staff_name.as_str(),
                a.role.as_str(),
                a.start_hhmm().as_str(),
                a.end_hhmm().as_str(),
                format!("{:.1}", a.hours).as_str(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}
