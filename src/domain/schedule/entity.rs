use chrono::{DateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::{DomainError, DomainResult, SyncStatus};

/// Day of a weekly recurring slot. Stored as 1 (Monday) ..= 7 (Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn number(&self) -> u8 {
        match self {
            DayOfWeek::Monday => 1,
            DayOfWeek::Tuesday => 2,
            DayOfWeek::Wednesday => 3,
            DayOfWeek::Thursday => 4,
            DayOfWeek::Friday => 5,
            DayOfWeek::Saturday => 6,
            DayOfWeek::Sunday => 7,
        }
    }

    pub fn from_number(n: u8) -> DomainResult<Self> {
        match n {
            1 => Ok(DayOfWeek::Monday),
            2 => Ok(DayOfWeek::Tuesday),
            3 => Ok(DayOfWeek::Wednesday),
            4 => Ok(DayOfWeek::Thursday),
            5 => Ok(DayOfWeek::Friday),
            6 => Ok(DayOfWeek::Saturday),
            7 => Ok(DayOfWeek::Sunday),
            other => Err(DomainError::InvalidValue(format!(
                "Day of week must be between 1 and 7, got {}",
                other
            ))),
        }
    }

    /// Display name used in schedule listings
    pub fn nombre(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Lunes",
            DayOfWeek::Tuesday => "Martes",
            DayOfWeek::Wednesday => "Miércoles",
            DayOfWeek::Thursday => "Jueves",
            DayOfWeek::Friday => "Viernes",
            DayOfWeek::Saturday => "Sábado",
            DayOfWeek::Sunday => "Domingo",
        }
    }
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.nombre())
    }
}

impl FromStr for DayOfWeek {
    type Err = DomainError;

    /// Accepts `1`..`7`, Spanish names (with or without accents) and English names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if let Ok(n) = normalized.parse::<u8>() {
            return DayOfWeek::from_number(n);
        }
        match normalized.as_str() {
            "lunes" | "monday" => Ok(DayOfWeek::Monday),
            "martes" | "tuesday" => Ok(DayOfWeek::Tuesday),
            "miercoles" | "miércoles" | "wednesday" => Ok(DayOfWeek::Wednesday),
            "jueves" | "thursday" => Ok(DayOfWeek::Thursday),
            "viernes" | "friday" => Ok(DayOfWeek::Friday),
            "sabado" | "sábado" | "saturday" => Ok(DayOfWeek::Saturday),
            "domingo" | "sunday" => Ok(DayOfWeek::Sunday),
            _ => Err(DomainError::InvalidValue(format!("Unknown day of week: '{}'", s))),
        }
    }
}

/// Parse a wall-clock time given as `HH:MM` (or `HH:MM:00`).
/// Slots are stored with minute precision, so seconds must be zero.
pub fn parse_clock(raw: &str) -> DomainResult<NaiveTime> {
    let raw = raw.trim();
    let time = NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| DomainError::InvalidValue(format!("Invalid time '{}', expected HH:MM", raw)))?;

    if !is_whole_minute(&time) {
        return Err(DomainError::InvalidValue(format!(
            "Invalid time '{}', seconds are not supported (expected HH:MM)",
            raw
        )));
    }
    Ok(time)
}

pub fn is_whole_minute(time: &NaiveTime) -> bool {
    time.second() == 0 && time.nanosecond() == 0
}

/// Zero-padded `HH:MM`, so stored values sort lexicographically
pub fn format_clock(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// A weekly recurring class slot of a subject (horario)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: i64,
    pub materia_id: i64,
    pub dia_semana: DayOfWeek,
    pub hora_inicio: NaiveTime,
    pub hora_fin: NaiveTime,
    pub aula: Option<String>,
    pub sync_status: SyncStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert a schedule entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSchedule {
    pub materia_id: i64,
    pub dia_semana: DayOfWeek,
    pub hora_inicio: NaiveTime,
    pub hora_fin: NaiveTime,
    pub aula: Option<String>,
}

/// Partial update of a schedule entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleChanges {
    pub dia_semana: Option<DayOfWeek>,
    pub hora_inicio: Option<NaiveTime>,
    pub hora_fin: Option<NaiveTime>,
    pub aula: Option<Option<String>>,
}

impl ScheduleChanges {
    pub fn is_empty(&self) -> bool {
        self.dia_semana.is_none()
            && self.hora_inicio.is_none()
            && self.hora_fin.is_none()
            && self.aula.is_none()
    }

    /// Whether the change moves the slot (day or start time)
    pub fn moves_slot(&self) -> bool {
        self.dia_semana.is_some() || self.hora_inicio.is_some()
    }
}

impl Schedule {
    pub fn apply_changes(&mut self, changes: ScheduleChanges) {
        if let Some(dia) = changes.dia_semana {
            self.dia_semana = dia;
        }
        if let Some(inicio) = changes.hora_inicio {
            self.hora_inicio = inicio;
        }
        if let Some(fin) = changes.hora_fin {
            self.hora_fin = fin;
        }
        if let Some(aula) = changes.aula {
            self.aula = aula;
        }

        self.sync_status = SyncStatus::Pending;
        self.updated_at = Utc::now();
    }
}

/// Schedule entry joined with the subject it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDetail {
    pub schedule: Schedule,
    pub materia_nombre: String,
    pub codigo: String,
    pub docente: Option<String>,
    pub color: String,
}

impl ScheduleDetail {
    pub fn dia_nombre(&self) -> &'static str {
        self.schedule.dia_semana.nombre()
    }
}
