// src/integrations/cloud/models.rs
//
// Document shapes of the cloud collections. Field names are camelCase and
// ids are strings, as stored by the mobile client.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{format_clock, DayOfWeek, Grade, Schedule, Subject, User};

pub const USERS_COLLECTION: &str = "usuarios";
pub const SUBJECTS_COLLECTION: &str = "materias";
pub const GRADES_COLLECTION: &str = "notas";
pub const SCHEDULES_COLLECTION: &str = "horarios";

/// Profile stored at `usuarios/{uid}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudUserProfile {
    pub uid: String,
    pub email: String,
    pub nombre: String,
    #[serde(default)]
    pub universidad: String,
    #[serde(default)]
    pub carrera: String,
    #[serde(default)]
    pub semestre: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_creacion: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ultimo_acceso: Option<DateTime<Utc>>,
}

impl CloudUserProfile {
    pub fn from_local(user: &User, uid: &str) -> Self {
        Self {
            uid: uid.to_string(),
            email: user.email.clone(),
            nombre: user.nombre.clone(),
            universidad: String::new(),
            carrera: String::new(),
            semestre: 0,
            fecha_creacion: Some(user.created_at),
            ultimo_acceso: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudSubject {
    pub codigo: String,
    pub nombre: String,
    pub creditos: u8,
    #[serde(default)]
    pub docente: String,
    #[serde(default)]
    pub periodo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub usuario_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activa: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_creacion: Option<DateTime<Utc>>,
}

impl CloudSubject {
    pub fn from_local(subject: &Subject, owner: &str) -> Self {
        Self {
            codigo: subject.codigo.clone(),
            nombre: subject.nombre.clone(),
            creditos: subject.creditos,
            docente: subject.docente.clone().unwrap_or_default(),
            periodo: subject.periodo.clone().unwrap_or_default(),
            color: Some(subject.color.clone()),
            usuario_id: owner.to_string(),
            activa: Some(true),
            fecha_creacion: Some(subject.created_at),
        }
    }
}

/// Evaluation kinds the cloud documents distinguish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeKind {
    Parcial,
    Final,
    Practica,
    Tarea,
}

impl GradeKind {
    /// Classify a free-text evaluation type such as "Parcial 1" or "Laboratorio"
    pub fn classify(tipo_evaluacion: &str) -> Self {
        let lower = tipo_evaluacion.to_lowercase();
        if lower.contains("final") {
            GradeKind::Final
        } else if lower.contains("parcial") || lower.contains("examen") {
            GradeKind::Parcial
        } else if lower.contains("práctica")
            || lower.contains("practica")
            || lower.contains("laboratorio")
            || lower.contains("taller")
        {
            GradeKind::Practica
        } else {
            GradeKind::Tarea
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudGrade {
    pub materia_id: String,
    pub usuario_id: String,
    pub tipo: GradeKind,
    pub descripcion: String,
    pub calificacion: f64,
    /// Weight in percent; documents written by older clients lack it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub porcentaje: Option<f64>,
    pub fecha: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_creacion: Option<DateTime<Utc>>,
}

impl CloudGrade {
    pub fn from_local(grade: &Grade, owner: &str) -> Self {
        Self {
            materia_id: grade.materia_id.to_string(),
            usuario_id: owner.to_string(),
            tipo: GradeKind::classify(&grade.tipo_evaluacion),
            descripcion: grade.tipo_evaluacion.clone(),
            calificacion: grade.nota,
            porcentaje: Some(grade.porcentaje),
            fecha: grade.fecha.format("%Y-%m-%d").to_string(),
            fecha_creacion: Some(grade.created_at),
        }
    }
}

/// Lowercase, unaccented weekday names used by the cloud documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudDay {
    Lunes,
    Martes,
    Miercoles,
    Jueves,
    Viernes,
    Sabado,
    Domingo,
}

impl From<DayOfWeek> for CloudDay {
    fn from(day: DayOfWeek) -> Self {
        match day {
            DayOfWeek::Monday => CloudDay::Lunes,
            DayOfWeek::Tuesday => CloudDay::Martes,
            DayOfWeek::Wednesday => CloudDay::Miercoles,
            DayOfWeek::Thursday => CloudDay::Jueves,
            DayOfWeek::Friday => CloudDay::Viernes,
            DayOfWeek::Saturday => CloudDay::Sabado,
            DayOfWeek::Sunday => CloudDay::Domingo,
        }
    }
}

impl From<CloudDay> for DayOfWeek {
    fn from(day: CloudDay) -> Self {
        match day {
            CloudDay::Lunes => DayOfWeek::Monday,
            CloudDay::Martes => DayOfWeek::Tuesday,
            CloudDay::Miercoles => DayOfWeek::Wednesday,
            CloudDay::Jueves => DayOfWeek::Thursday,
            CloudDay::Viernes => DayOfWeek::Friday,
            CloudDay::Sabado => DayOfWeek::Saturday,
            CloudDay::Domingo => DayOfWeek::Sunday,
        }
    }
}

impl fmt::Display for CloudDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CloudDay::Lunes => "lunes",
            CloudDay::Martes => "martes",
            CloudDay::Miercoles => "miercoles",
            CloudDay::Jueves => "jueves",
            CloudDay::Viernes => "viernes",
            CloudDay::Sabado => "sabado",
            CloudDay::Domingo => "domingo",
        };
        f.write_str(name)
    }
}

impl FromStr for CloudDay {
    type Err = crate::domain::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<DayOfWeek>().map(CloudDay::from)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudSchedule {
    pub materia_id: String,
    pub usuario_id: String,
    pub dia_semana: CloudDay,
    /// HH:MM
    pub hora_inicio: String,
    pub hora_fin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aula: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_creacion: Option<DateTime<Utc>>,
}

impl CloudSchedule {
    pub fn from_local(schedule: &Schedule, owner: &str) -> Self {
        Self {
            materia_id: schedule.materia_id.to_string(),
            usuario_id: owner.to_string(),
            dia_semana: schedule.dia_semana.into(),
            hora_inicio: format_clock(&schedule.hora_inicio),
            hora_fin: format_clock(&schedule.hora_fin),
            aula: schedule.aula.clone(),
            fecha_creacion: Some(schedule.created_at),
        }
    }
}
