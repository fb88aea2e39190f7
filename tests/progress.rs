mod common;

use aula::model::entity::StudentProgress;
use chrono::{Duration, TimeZone, Utc};

use crate::common::{model_manager, seed_course, seed_lesson, seed_unit, seed_user, setup_test_db};

#[tokio::test]
async fn percent_progress_half_complete() {
    let db = setup_test_db().await;
    let mm = model_manager(&db);

    let user = seed_user(&mm, "student", "student@example.org").await;
    let course = seed_course(&mm, "progressive", "Progressive").await;
    let lesson = seed_lesson(&mm, &course, "Lesson", 1).await;

    let now = Utc.with_ymd_and_hms(2014, 5, 1, 9, 0, 0).unwrap();
    let mut units = Vec::new();
    for position in 1..=4 {
        units.push(seed_unit(&mm, &lesson, position).await);
    }
    for unit in &units {
        StudentProgress::touch(&mm, user.id(), unit.id(), now).await.unwrap();
    }
    StudentProgress::mark_complete(&mm, user.id(), units[0].id(), now).await.unwrap();
    StudentProgress::mark_complete(&mm, user.id(), units[1].id(), now).await.unwrap();

    let enrollment = course.enroll_student(&mm, user.id()).await.unwrap();
    assert_eq!(enrollment.percent_progress(&mm).await.unwrap(), 50);
}

#[tokio::test]
async fn percent_progress_with_zero_units_is_zero() {
    let db = setup_test_db().await;
    let mm = model_manager(&db);

    let user = seed_user(&mm, "student", "student@example.org").await;
    let course = seed_course(&mm, "unitless", "Unitless").await;

    let enrollment = course.enroll_student(&mm, user.id()).await.unwrap();
    assert_eq!(enrollment.percent_progress(&mm).await.unwrap(), 0);
}

#[tokio::test]
async fn progress_in_other_courses_does_not_leak() {
    let db = setup_test_db().await;
    let mm = model_manager(&db);

    let user = seed_user(&mm, "student", "student@example.org").await;
    let course = seed_course(&mm, "mine", "Mine").await;
    let other = seed_course(&mm, "other", "Other").await;
    let lesson = seed_lesson(&mm, &course, "My Lesson", 1).await;
    let other_lesson = seed_lesson(&mm, &other, "Other Lesson", 1).await;

    let unit = seed_unit(&mm, &lesson, 1).await;
    let other_unit = seed_unit(&mm, &other_lesson, 1).await;

    let now = Utc.with_ymd_and_hms(2014, 5, 1, 9, 0, 0).unwrap();
    StudentProgress::mark_complete(&mm, user.id(), other_unit.id(), now).await.unwrap();
    StudentProgress::touch(&mm, user.id(), unit.id(), now).await.unwrap();

    let enrollment = course.enroll_student(&mm, user.id()).await.unwrap();
    assert_eq!(enrollment.percent_progress(&mm).await.unwrap(), 0);
}

#[tokio::test]
async fn touch_refreshes_last_access_and_keeps_one_row() {
    let db = setup_test_db().await;
    let mm = model_manager(&db);

    let user = seed_user(&mm, "student", "student@example.org").await;
    let course = seed_course(&mm, "touchy", "Touchy").await;
    let lesson = seed_lesson(&mm, &course, "Lesson", 1).await;
    let unit = seed_unit(&mm, &lesson, 1).await;

    let first_visit = Utc.with_ymd_and_hms(2014, 5, 1, 9, 0, 0).unwrap();
    let second_visit = first_visit + Duration::hours(3);

    let first = StudentProgress::touch(&mm, user.id(), unit.id(), first_visit).await.unwrap();
    assert_eq!(first.last_access(), first_visit);
    assert!(!first.is_complete());

    let second = StudentProgress::touch(&mm, user.id(), unit.id(), second_visit).await.unwrap();
    assert_eq!(second.id(), first.id());
    assert_eq!(second.last_access(), second_visit);
    assert!(!second.is_complete());
}

#[tokio::test]
async fn completion_timestamp_is_set_once() {
    let db = setup_test_db().await;
    let mm = model_manager(&db);

    let user = seed_user(&mm, "student", "student@example.org").await;
    let course = seed_course(&mm, "oneshot", "Oneshot").await;
    let lesson = seed_lesson(&mm, &course, "Lesson", 1).await;
    let unit = seed_unit(&mm, &lesson, 1).await;

    let first_done = Utc.with_ymd_and_hms(2014, 5, 1, 9, 0, 0).unwrap();
    let later = first_done + Duration::days(1);

    let completed = StudentProgress::mark_complete(&mm, user.id(), unit.id(), first_done)
        .await
        .unwrap();
    assert_eq!(completed.complete(), Some(first_done));

    // completing again keeps the original timestamp but refreshes access
    let again = StudentProgress::mark_complete(&mm, user.id(), unit.id(), later)
        .await
        .unwrap();
    assert_eq!(again.complete(), Some(first_done));
    assert_eq!(again.last_access(), later);
}

#[tokio::test]
async fn duplicate_progress_rows_are_impossible() {
    let db = setup_test_db().await;
    let mm = model_manager(&db);

    let user = seed_user(&mm, "student", "student@example.org").await;
    let course = seed_course(&mm, "unique", "Unique").await;
    let lesson = seed_lesson(&mm, &course, "Lesson", 1).await;
    let unit = seed_unit(&mm, &lesson, 1).await;

    let now = Utc.with_ymd_and_hms(2014, 5, 1, 9, 0, 0).unwrap();
    StudentProgress::touch(&mm, user.id(), unit.id(), now).await.unwrap();
    StudentProgress::mark_complete(&mm, user.id(), unit.id(), now).await.unwrap();

    let rows = StudentProgress::all_by_user(&mm, user.id()).await.unwrap();
    assert_eq!(rows.len(), 1);
}
