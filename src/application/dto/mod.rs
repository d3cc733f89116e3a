// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are output-friendly representations (plain strings for dates,
//   day names and HH:MM times)
// - DTOs NEVER leak domain invariants
// - Input DTOs carry raw user input; commands parse them
// - Conversion FROM domain entities only (never TO)

use serde::{Deserialize, Serialize};

use crate::db::{ColumnInfo, DatabaseStats};
use crate::domain::{
    format_clock, AcademicSummary, Grade, Schedule, ScheduleDetail, Subject,
    SubjectPendingWeight, SubjectWithAverage, User,
};
use crate::infrastructure::Session;
use crate::services::{ExportData, SeedSummary, SyncReport};

// ============================================================================
// USER DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    pub nombre: String,
    pub firebase_uid: Option<String>,
    pub sync_status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nombre: user.nombre,
            firebase_uid: user.firebase_uid,
            sync_status: user.sync_status.to_string(),
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserDto {
    pub usuario_id: i64,
    pub email: Option<String>,
    pub nombre: Option<String>,
}

// ============================================================================
// SESSION DTOs
// ============================================================================

/// The signed-in identity, without its tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDto {
    pub usuario_id: i64,
    pub firebase_uid: String,
    pub email: String,
    pub started_at: String,
    pub token_expired: bool,
}

impl From<Session> for SessionDto {
    fn from(session: Session) -> Self {
        Self {
            usuario_id: session.usuario_id,
            token_expired: session.identity.is_expired(),
            firebase_uid: session.identity.uid,
            email: session.identity.email,
            started_at: session.started_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterAccountDto {
    pub email: String,
    pub password: String,
    pub nombre: String,
    pub universidad: String,
    pub carrera: String,
    pub semestre: u8,
}

// ============================================================================
// SUBJECT DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectDto {
    pub id: i64,
    pub usuario_id: i64,
    pub codigo: String,
    pub nombre: String,
    pub creditos: u8,
    pub docente: Option<String>,
    pub periodo: Option<String>,
    pub color: String,
    pub sync_status: String,
    pub updated_at: String,
}

impl From<Subject> for SubjectDto {
    fn from(subject: Subject) -> Self {
        Self {
            id: subject.id,
            usuario_id: subject.usuario_id,
            codigo: subject.codigo,
            nombre: subject.nombre,
            creditos: subject.creditos,
            docente: subject.docente,
            periodo: subject.periodo,
            color: subject.color,
            sync_status: subject.sync_status.to_string(),
            updated_at: subject.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubjectDto {
    pub usuario_id: i64,
    pub codigo: String,
    pub nombre: String,
    pub creditos: Option<u8>,
    pub docente: Option<String>,
    pub periodo: Option<String>,
    pub color: Option<String>,
}

/// Partial update; an empty string clears `docente` / `periodo`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSubjectDto {
    pub materia_id: i64,
    pub codigo: Option<String>,
    pub nombre: Option<String>,
    pub creditos: Option<u8>,
    pub docente: Option<String>,
    pub periodo: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectAverageDto {
    pub materia: SubjectDto,
    pub promedio: Option<f64>,
    pub porcentaje_total: f64,
    pub porcentaje_faltante: f64,
    pub cantidad_notas: u32,
}

impl From<SubjectWithAverage> for SubjectAverageDto {
    fn from(item: SubjectWithAverage) -> Self {
        Self {
            porcentaje_faltante: item.porcentaje_faltante(),
            promedio: item.promedio,
            porcentaje_total: item.porcentaje_total,
            cantidad_notas: item.cantidad_notas,
            materia: SubjectDto::from(item.subject),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingWeightDto {
    pub materia_id: i64,
    pub codigo: String,
    pub nombre: String,
    pub porcentaje_faltante: f64,
}

impl From<SubjectPendingWeight> for PendingWeightDto {
    fn from(item: SubjectPendingWeight) -> Self {
        Self {
            materia_id: item.materia_id,
            codigo: item.codigo,
            nombre: item.nombre,
            porcentaje_faltante: item.porcentaje_faltante,
        }
    }
}

// ============================================================================
// GRADE DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeDto {
    pub id: i64,
    pub materia_id: i64,
    pub tipo_evaluacion: String,
    pub nota: f64,
    pub porcentaje: f64,
    pub fecha: String,
    pub observaciones: Option<String>,
    pub sync_status: String,
}

impl From<Grade> for GradeDto {
    fn from(grade: Grade) -> Self {
        Self {
            id: grade.id,
            materia_id: grade.materia_id,
            tipo_evaluacion: grade.tipo_evaluacion,
            nota: grade.nota,
            porcentaje: grade.porcentaje,
            fecha: grade.fecha.format("%Y-%m-%d").to_string(),
            observaciones: grade.observaciones,
            sync_status: grade.sync_status.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordGradeDto {
    pub materia_id: i64,
    pub tipo_evaluacion: String,
    pub nota: f64,
    pub porcentaje: f64,
    /// YYYY-MM-DD, today when absent
    pub fecha: Option<String>,
    pub observaciones: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGradeDto {
    pub nota_id: i64,
    pub tipo_evaluacion: Option<String>,
    pub nota: Option<f64>,
    pub porcentaje: Option<f64>,
    pub fecha: Option<String>,
    pub observaciones: Option<String>,
}

// ============================================================================
// SCHEDULE DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDto {
    pub id: i64,
    pub materia_id: i64,
    pub dia_semana: u8,
    pub dia_nombre: String,
    pub hora_inicio: String,
    pub hora_fin: String,
    pub aula: Option<String>,
    pub sync_status: String,
}

impl From<Schedule> for ScheduleDto {
    fn from(schedule: Schedule) -> Self {
        Self {
            id: schedule.id,
            materia_id: schedule.materia_id,
            dia_semana: schedule.dia_semana.number(),
            dia_nombre: schedule.dia_semana.nombre().to_string(),
            hora_inicio: format_clock(&schedule.hora_inicio),
            hora_fin: format_clock(&schedule.hora_fin),
            aula: schedule.aula,
            sync_status: schedule.sync_status.to_string(),
        }
    }
}

/// One row of the weekly timetable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDetailDto {
    #[serde(flatten)]
    pub horario: ScheduleDto,
    pub materia_nombre: String,
    pub codigo: String,
    pub docente: Option<String>,
    pub color: String,
}

impl From<ScheduleDetail> for ScheduleDetailDto {
    fn from(detail: ScheduleDetail) -> Self {
        Self {
            horario: ScheduleDto::from(detail.schedule),
            materia_nombre: detail.materia_nombre,
            codigo: detail.codigo,
            docente: detail.docente,
            color: detail.color,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleDto {
    pub materia_id: i64,
    /// 1..7 or a day name
    pub dia_semana: String,
    /// HH:MM
    pub hora_inicio: String,
    pub hora_fin: String,
    pub aula: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateScheduleDto {
    pub horario_id: i64,
    pub dia_semana: Option<String>,
    pub hora_inicio: Option<String>,
    pub hora_fin: Option<String>,
    pub aula: Option<String>,
}

// ============================================================================
// AVERAGE DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AverageDto {
    pub id: i64,
    pub promedio: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryDto {
    pub usuario_id: i64,
    pub promedio_general: Option<f64>,
    pub creditos_cursados: u32,
    pub materias: Vec<SubjectAverageDto>,
    pub pendientes: Vec<PendingWeightDto>,
}

impl From<AcademicSummary> for SummaryDto {
    fn from(summary: AcademicSummary) -> Self {
        Self {
            usuario_id: summary.usuario_id,
            promedio_general: summary.promedio_general,
            creditos_cursados: summary.creditos_cursados,
            materias: summary.materias.into_iter().map(SubjectAverageDto::from).collect(),
            pendientes: summary.pendientes.into_iter().map(PendingWeightDto::from).collect(),
        }
    }
}

// ============================================================================
// SYNC & DATABASE DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReportDto {
    pub synced: usize,
    pub failed: usize,
    pub tables: std::collections::BTreeMap<String, TableSyncDto>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSyncDto {
    pub synced: usize,
    pub failed: usize,
}

impl From<SyncReport> for SyncReportDto {
    fn from(report: SyncReport) -> Self {
        Self {
            synced: report.synced(),
            failed: report.failed(),
            tables: report
                .tables
                .into_iter()
                .map(|(table, t)| {
                    (
                        table,
                        TableSyncDto {
                            synced: t.synced,
                            failed: t.failed,
                        },
                    )
                })
                .collect(),
            errors: report.errors,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseStatsDto {
    pub size_bytes: i64,
    pub page_count: i64,
    pub usuarios: i64,
    pub materias: i64,
    pub notas: i64,
    pub horarios: i64,
}

impl From<DatabaseStats> for DatabaseStatsDto {
    fn from(stats: DatabaseStats) -> Self {
        Self {
            size_bytes: stats.size_bytes,
            page_count: stats.page_count,
            usuarios: stats.usuario_count,
            materias: stats.materia_count,
            notas: stats.nota_count,
            horarios: stats.horario_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDto {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub not_null: bool,
    pub default_value: Option<String>,
    pub primary_key: bool,
}

impl From<ColumnInfo> for ColumnDto {
    fn from(column: ColumnInfo) -> Self {
        Self {
            name: column.name,
            data_type: column.data_type,
            not_null: column.not_null,
            default_value: column.default_value,
            primary_key: column.primary_key,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDto {
    pub usuarios: Vec<UserDto>,
    pub materias: Vec<SubjectDto>,
    pub notas: Vec<GradeDto>,
    pub horarios: Vec<ScheduleDetailDto>,
    pub export_timestamp: String,
}

impl From<ExportData> for ExportDto {
    fn from(data: ExportData) -> Self {
        Self {
            usuarios: data.usuarios.into_iter().map(UserDto::from).collect(),
            materias: data.materias.into_iter().map(SubjectDto::from).collect(),
            notas: data.notas.into_iter().map(GradeDto::from).collect(),
            horarios: data.horarios.into_iter().map(ScheduleDetailDto::from).collect(),
            export_timestamp: data.export_timestamp.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedDto {
    pub usuario_id: i64,
    pub materias: usize,
    pub notas: usize,
    pub horarios: usize,
}

impl From<SeedSummary> for SeedDto {
    fn from(seed: SeedSummary) -> Self {
        Self {
            usuario_id: seed.usuario_id,
            materias: seed.materias,
            notas: seed.notas,
            horarios: seed.horarios,
        }
    }
}
