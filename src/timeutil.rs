//! Arithmétique horaire minimaliste : `HH:MM` ↔ minutes depuis minuit.
//!
//! Les fins de service nocturnes sont représentées au-delà de 1440 minutes
//! (ex. 02:00 le lendemain = 1560), ce qui garde toutes les comparaisons
//! d'intervalles sur un axe monotone.

/// Minutes dans une journée civile.
pub const MINUTES_PER_DAY: u32 = 1440;

/// Parse un horaire mural strict `HH:MM` en minutes depuis minuit.
pub fn parse_hhmm(raw: &str) -> Result<u32, String> {
    let (h, m) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected HH:MM, got {raw:?}"))?;
    let hours: u32 = h
        .parse()
        .map_err(|_| format!("invalid hour in {raw:?}"))?;
    let minutes: u32 = m
        .parse()
        .map_err(|_| format!("invalid minute in {raw:?}"))?;
    if hours >= 24 || minutes >= 60 {
        return Err(format!("time out of range: {raw:?}"));
    }
    Ok(hours * 60 + minutes)
}

/// Formatte des minutes en `HH:MM`, repliées sur 24h pour l'affichage
/// des fins nocturnes.
pub fn format_minutes(total: u32) -> String {
    let wrapped = total % MINUTES_PER_DAY;
    format!("{:02}:{:02}", wrapped / 60, wrapped % 60)
}

/// Durée en minutes entre deux horaires muraux ; `end <= start` signifie
/// que le créneau passe minuit.
pub fn span_minutes(start: u32, end: u32) -> u32 {
    if end <= start {
        end + MINUTES_PER_DAY - start
    } else {
        end - start
    }
}

/// Fin ajustée sur l'axe monotone (au-delà de 1440 si nocturne).
pub fn adjusted_end(start: u32, end: u32) -> u32 {
    start + span_minutes(start, end)
}

/// Arrondit à la demi-heure la plus proche.
pub fn round_to_half_hour(minutes: u32) -> u32 {
    ((minutes + 15) / 30) * 30
}

/// Minutes → heures décimales.
pub fn minutes_to_hours(minutes: u32) -> f64 {
    f64::from(minutes) / 60.0
}

/// Heures décimales → minutes (entrée supposée positive).
pub fn hours_to_minutes(hours: f64) -> u32 {
    (hours * 60.0).round() as u32
}
