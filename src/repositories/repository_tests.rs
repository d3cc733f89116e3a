// src/repositories/repository_tests.rs
//
// SQL-level tests against an in-memory database.
// They pin down the aggregate queries and ordering guarantees.

use std::sync::Arc;

use chrono::NaiveDate;

use super::*;
use crate::db::{create_memory_pool, get_connection, initialize_database, ConnectionPool};
use crate::domain::{
    parse_clock, DayOfWeek, NewGrade, NewSchedule, NewSubject, NewUser, SyncStatus, SyncTable,
};

fn setup() -> Arc<ConnectionPool> {
    let pool = Arc::new(create_memory_pool().unwrap());
    {
        let conn = get_connection(&pool).unwrap();
        initialize_database(&conn).unwrap();
    }
    pool
}

fn seed_user(pool: &Arc<ConnectionPool>, email: &str) -> i64 {
    SqliteUserRepository::new(pool.clone())
        .insert(&NewUser::new(email, "Student"))
        .unwrap()
}

fn seed_subject(pool: &Arc<ConnectionPool>, user: i64, codigo: &str, creditos: u8) -> i64 {
    let mut subject = NewSubject::new(user, codigo, format!("Subject {}", codigo));
    subject.creditos = creditos;
    SqliteSubjectRepository::new(pool.clone()).insert(&subject).unwrap()
}

fn seed_grade(pool: &Arc<ConnectionPool>, subject: i64, nota: f64, porcentaje: f64) -> i64 {
    SqliteGradeRepository::new(pool.clone())
        .insert(&NewGrade::new(subject, "Parcial", nota, porcentaje))
        .unwrap()
}

#[test]
fn test_user_lookup_by_email_and_uid() {
    let pool = setup();
    let repo = SqliteUserRepository::new(pool.clone());
    let id = repo
        .insert(&NewUser::new("ana@uni.edu", "Ana").with_firebase_uid("uid-1"))
        .unwrap();

    assert_eq!(repo.get_by_email("ana@uni.edu").unwrap().unwrap().id, id);
    assert_eq!(repo.get_by_firebase_uid("uid-1").unwrap().unwrap().id, id);
    assert!(repo.get_by_email("nobody@uni.edu").unwrap().is_none());

    let user = repo.get_by_id(id).unwrap().unwrap();
    assert_eq!(user.sync_status, SyncStatus::Pending);
}

#[test]
fn test_duplicate_email_is_rejected_by_schema() {
    let pool = setup();
    let repo = SqliteUserRepository::new(pool.clone());
    repo.insert(&NewUser::new("ana@uni.edu", "Ana")).unwrap();
    assert!(repo.insert(&NewUser::new("ana@uni.edu", "Other")).is_err());
}

#[test]
fn test_subject_code_exists_respects_owner_and_exclusion() {
    let pool = setup();
    let ana = seed_user(&pool, "ana@uni.edu");
    let bob = seed_user(&pool, "bob@uni.edu");
    let repo = SqliteSubjectRepository::new(pool.clone());
    let id = seed_subject(&pool, ana, "MAT201", 4);

    assert!(repo.code_exists(ana, "MAT201", None).unwrap());
    assert!(!repo.code_exists(bob, "MAT201", None).unwrap());
    assert!(!repo.code_exists(ana, "MAT201", Some(id)).unwrap());
}

#[test]
fn test_subjects_ordered_by_period_then_name() {
    let pool = setup();
    let user = seed_user(&pool, "ana@uni.edu");
    let repo = SqliteSubjectRepository::new(pool.clone());

    let mut old = NewSubject::new(user, "A1", "Álgebra");
    old.periodo = Some("2024-1".to_string());
    let mut newer_b = NewSubject::new(user, "B2", "Biología");
    newer_b.periodo = Some("2024-2".to_string());
    let mut newer_a = NewSubject::new(user, "C3", "Cálculo");
    newer_a.periodo = Some("2024-2".to_string());
    for s in [&old, &newer_b, &newer_a] {
        repo.insert(s).unwrap();
    }

    let codes: Vec<String> = repo
        .list_by_user(user)
        .unwrap()
        .into_iter()
        .map(|s| s.codigo)
        .collect();
    assert_eq!(codes, vec!["B2", "C3", "A1"]);
}

#[test]
fn test_total_percentage_with_exclusion() {
    let pool = setup();
    let user = seed_user(&pool, "ana@uni.edu");
    let subject = seed_subject(&pool, user, "ING301", 3);
    let first = seed_grade(&pool, subject, 4.2, 30.0);
    seed_grade(&pool, subject, 3.8, 10.0);

    let repo = SqliteGradeRepository::new(pool.clone());
    assert_eq!(repo.total_percentage(subject, None).unwrap(), 40.0);
    assert_eq!(repo.total_percentage(subject, Some(first)).unwrap(), 10.0);
    assert_eq!(repo.total_percentage(999, None).unwrap(), 0.0);
}

#[test]
fn test_grades_ordered_by_date_desc() {
    let pool = setup();
    let user = seed_user(&pool, "ana@uni.edu");
    let subject = seed_subject(&pool, user, "ING301", 3);
    let repo = SqliteGradeRepository::new(pool.clone());

    let mut early = NewGrade::new(subject, "Quiz 1", 3.0, 10.0);
    early.fecha = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let mut late = NewGrade::new(subject, "Quiz 2", 4.0, 10.0);
    late.fecha = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    repo.insert(&early).unwrap();
    repo.insert(&late).unwrap();

    let grades = repo.list_by_subject(subject).unwrap();
    assert_eq!(grades[0].tipo_evaluacion, "Quiz 2");
    assert_eq!(grades[1].fecha, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

    assert_eq!(repo.list_by_user(user).unwrap().len(), 2);
}

#[test]
fn test_subject_average_is_weighted() {
    let pool = setup();
    let user = seed_user(&pool, "ana@uni.edu");
    let subject = seed_subject(&pool, user, "ING301", 3);
    let averages = SqliteAveragesRepository::new(pool.clone());

    assert_eq!(averages.subject_average(subject).unwrap(), None);

    seed_grade(&pool, subject, 4.2, 30.0);
    seed_grade(&pool, subject, 3.8, 10.0);

    assert_eq!(averages.subject_average(subject).unwrap(), Some(4.1));
}

#[test]
fn test_user_average_weights_by_credits_and_skips_ungraded() {
    let pool = setup();
    let user = seed_user(&pool, "ana@uni.edu");
    let movil = seed_subject(&pool, user, "ING301", 3);
    let calculo = seed_subject(&pool, user, "MAT201", 4);
    let _ungraded = seed_subject(&pool, user, "FIS101", 6);

    seed_grade(&pool, movil, 4.2, 30.0);
    seed_grade(&pool, movil, 3.8, 10.0);
    seed_grade(&pool, calculo, 3.5, 35.0);

    let averages = SqliteAveragesRepository::new(pool.clone());
    // (4.1 × 3 + 3.5 × 4) / 7
    assert_eq!(averages.user_average(user).unwrap(), Some(3.76));

    let other = seed_user(&pool, "bob@uni.edu");
    assert_eq!(averages.user_average(other).unwrap(), None);
}

#[test]
fn test_subjects_with_averages_include_ungraded() {
    let pool = setup();
    let user = seed_user(&pool, "ana@uni.edu");
    let graded = seed_subject(&pool, user, "ING301", 3);
    seed_subject(&pool, user, "MAT201", 4);
    seed_grade(&pool, graded, 4.0, 50.0);
    seed_grade(&pool, graded, 3.0, 25.0);

    let rows = SqliteAveragesRepository::new(pool.clone())
        .subjects_with_averages(user)
        .unwrap();
    assert_eq!(rows.len(), 2);

    let ing = rows.iter().find(|r| r.subject.codigo == "ING301").unwrap();
    assert_eq!(ing.promedio, Some(3.67));
    assert_eq!(ing.porcentaje_total, 75.0);
    assert_eq!(ing.cantidad_notas, 2);
    assert_eq!(ing.porcentaje_faltante(), 25.0);

    let mat = rows.iter().find(|r| r.subject.codigo == "MAT201").unwrap();
    assert_eq!(mat.promedio, None);
    assert_eq!(mat.cantidad_notas, 0);
}

#[test]
fn test_missing_percentage_sorted_and_excludes_complete() {
    let pool = setup();
    let user = seed_user(&pool, "ana@uni.edu");
    let complete = seed_subject(&pool, user, "A", 3);
    let half = seed_subject(&pool, user, "B", 3);
    seed_subject(&pool, user, "C", 3);
    seed_grade(&pool, complete, 4.0, 60.0);
    seed_grade(&pool, complete, 4.0, 40.0);
    seed_grade(&pool, half, 4.0, 50.0);

    let pending = SqliteAveragesRepository::new(pool.clone())
        .subjects_missing_percentage(user)
        .unwrap();

    let codes: Vec<(&str, f64)> = pending
        .iter()
        .map(|p| (p.codigo.as_str(), p.porcentaje_faltante))
        .collect();
    assert_eq!(codes, vec![("C", 100.0), ("B", 50.0)]);
}

#[test]
fn test_schedule_details_ordered_by_day_and_start() {
    let pool = setup();
    let user = seed_user(&pool, "ana@uni.edu");
    let subject = seed_subject(&pool, user, "ING301", 3);
    let repo = SqliteScheduleRepository::new(pool.clone());

    let slot = |dia, inicio: &str, fin: &str| NewSchedule {
        materia_id: subject,
        dia_semana: dia,
        hora_inicio: parse_clock(inicio).unwrap(),
        hora_fin: parse_clock(fin).unwrap(),
        aula: None,
    };
    repo.insert(&slot(DayOfWeek::Wednesday, "08:00", "10:00")).unwrap();
    repo.insert(&slot(DayOfWeek::Monday, "14:00", "16:00")).unwrap();
    repo.insert(&slot(DayOfWeek::Monday, "08:00", "10:00")).unwrap();

    let details = repo.list_details_by_user(user).unwrap();
    let order: Vec<(&str, String)> = details
        .iter()
        .map(|d| (d.dia_nombre(), d.schedule.hora_inicio.format("%H:%M").to_string()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Lunes", "08:00".to_string()),
            ("Lunes", "14:00".to_string()),
            ("Miércoles", "08:00".to_string()),
        ]
    );
    assert_eq!(details[0].codigo, "ING301");

    assert!(repo
        .slot_taken(subject, DayOfWeek::Monday, parse_clock("08:00").unwrap(), None)
        .unwrap());
    assert!(!repo
        .slot_taken(subject, DayOfWeek::Friday, parse_clock("08:00").unwrap(), None)
        .unwrap());
}

#[test]
fn test_deleting_subject_cascades() {
    let pool = setup();
    let user = seed_user(&pool, "ana@uni.edu");
    let subject = seed_subject(&pool, user, "ING301", 3);
    seed_grade(&pool, subject, 4.0, 20.0);

    SqliteSubjectRepository::new(pool.clone()).delete(subject).unwrap();

    let grades = SqliteGradeRepository::new(pool.clone())
        .list_by_subject(subject)
        .unwrap();
    assert!(grades.is_empty());
}

#[test]
fn test_sync_status_round_trip() {
    let pool = setup();
    let user = seed_user(&pool, "ana@uni.edu");
    let subject = seed_subject(&pool, user, "ING301", 3);
    let repo = SqliteSyncRepository::new(pool.clone());

    let pending = repo.list_by_status(SyncTable::Materias, SyncStatus::Pending).unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id(), subject);

    repo.update_status(SyncTable::Materias, subject, SyncStatus::Synced)
        .unwrap();

    assert!(repo
        .list_by_status(SyncTable::Materias, SyncStatus::Pending)
        .unwrap()
        .is_empty());
    let counts = repo.count_by_status(SyncTable::Materias).unwrap();
    assert_eq!(counts.get(&SyncStatus::Synced), Some(&1));

    assert!(repo
        .update_status(SyncTable::Notas, 42, SyncStatus::Synced)
        .is_err());
}
