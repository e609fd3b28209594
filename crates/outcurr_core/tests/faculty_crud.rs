use outcurr_core::db::open_db_in_memory;
use outcurr_core::{
    FacultyListQuery, FacultyName, FacultyRepository, FacultyService, FacultyServiceError,
    RepoError, SqliteFacultyRepository,
};
use std::collections::HashSet;

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn import_returns_distinct_ids_in_submission_order() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = FacultyService::new(SqliteFacultyRepository::new(&mut conn));

    let created = service
        .import_faculties(&names(&[
            "Administrative and Economic Sciences",
            "Ciencias de la Salud",
            "Ingeniería, Diseño y Ciencias Aplicadas",
        ]))
        .unwrap();

    assert_eq!(created.len(), 3);
    assert_eq!(created[0].fac_name, "Administrative and Economic Sciences");
    assert_eq!(created[1].fac_name, "Ciencias de la Salud");
    assert_eq!(created[2].fac_name, "Ingeniería, Diseño y Ciencias Aplicadas");
    let ids: HashSet<i64> = created.iter().map(|faculty| faculty.fac_id).collect();
    assert_eq!(ids.len(), 3);
    assert!(created.iter().all(|faculty| faculty.created_at > 0));
}

#[test]
fn invalid_batch_creates_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = FacultyService::new(SqliteFacultyRepository::new(&mut conn));

    let err = service
        .import_faculties(&names(&["Ciencias de la Salud", "Invalid Faculty Name 123!@#"]))
        .unwrap_err();
    assert!(matches!(err, FacultyServiceError::Validation(_)));

    let err = service.import_faculties(&[]).unwrap_err();
    assert!(matches!(err, FacultyServiceError::Validation(_)));

    assert!(service.list_faculties().unwrap().is_empty());
}

#[test]
fn existing_name_conflicts_and_rolls_back_the_batch() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = FacultyService::new(SqliteFacultyRepository::new(&mut conn));
    service.import_faculties(&names(&["Law"])).unwrap();

    let err = service
        .import_faculties(&names(&["Medicine", "LAW"]))
        .unwrap_err();
    assert!(matches!(err, FacultyServiceError::NameTaken(ref name) if name == "LAW"));

    let listed = service.list_faculties().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].fac_name, "Law");
}

#[test]
fn delete_then_delete_again_reports_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = FacultyService::new(SqliteFacultyRepository::new(&mut conn));
    let created = service.import_faculties(&names(&["Law", "Medicine"])).unwrap();

    for faculty in &created {
        service.delete_faculty(faculty.fac_id).unwrap();
    }
    for faculty in &created {
        let err = service.delete_faculty(faculty.fac_id).unwrap_err();
        assert!(matches!(err, FacultyServiceError::FacultyNotFound(id) if id == faculty.fac_id));
    }

    let err = service.delete_faculty(999_999).unwrap_err();
    assert!(matches!(err, FacultyServiceError::FacultyNotFound(999_999)));
}

#[test]
fn ids_are_not_reused_after_delete() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = FacultyService::new(SqliteFacultyRepository::new(&mut conn));

    let first = service.import_faculties(&names(&["Law"])).unwrap();
    service.delete_faculty(first[0].fac_id).unwrap();
    let second = service.import_faculties(&names(&["Law"])).unwrap();

    assert!(second[0].fac_id > first[0].fac_id);
}

#[test]
fn pages_follow_insertion_order_and_report_totals() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = FacultyService::new(SqliteFacultyRepository::new(&mut conn));
    let created = service
        .import_faculties(&names(&["Arts", "Business", "Chemistry", "Design", "Economics"]))
        .unwrap();

    let first = service.page_faculties(Some(0), Some(2)).unwrap();
    assert_eq!(first.total_elements, 5);
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.content, created[0..2].to_vec());

    let last = service.page_faculties(Some(2), Some(2)).unwrap();
    assert_eq!(last.content, created[4..5].to_vec());

    let past_end = service.page_faculties(Some(7), Some(2)).unwrap();
    assert!(past_end.content.is_empty());
    assert_eq!(past_end.total_elements, 5);

    let defaults = service.page_faculties(None, None).unwrap();
    assert_eq!(defaults.page, 0);
    assert_eq!(defaults.size, 10);
    assert_eq!(defaults.content.len(), 5);

    let err = service.page_faculties(Some(0), Some(0)).unwrap_err();
    assert!(matches!(err, FacultyServiceError::InvalidPage(_)));
}

#[test]
fn repository_get_and_offset_only_listing() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteFacultyRepository::new(&mut conn);
    let created = repo
        .insert_faculties(&[
            FacultyName::parse("Arts").unwrap(),
            FacultyName::parse("Business").unwrap(),
        ])
        .unwrap();

    let loaded = repo.get_faculty(created[1].fac_id).unwrap().unwrap();
    assert_eq!(loaded, created[1]);
    assert!(repo.get_faculty(999_999).unwrap().is_none());

    let tail = repo
        .list_faculties(&FacultyListQuery {
            limit: None,
            offset: 1,
        })
        .unwrap();
    assert_eq!(tail, created[1..].to_vec());

    assert!(matches!(
        repo.delete_faculty(999_999).unwrap_err(),
        RepoError::NotFound(999_999)
    ));
}
