use jobboard_core::{
    Application, ApplicationStatus, IntegrityError, InvalidEnumValueError, Job, RecordSet,
    RecordValidationError, Role, Todo, User,
};
use uuid::Uuid;

const APPLIED_AT_MS: i64 = 1_760_000_000_000;

struct Seed {
    set: RecordSet,
    parent: Uuid,
    student: Uuid,
    employer: Uuid,
    job: Uuid,
}

fn seeded() -> Seed {
    let mut set = RecordSet::new();
    let parent = set
        .insert_user(User::try_new("pat", "pat@example.com", "PARENT").unwrap())
        .unwrap();
    let student = set
        .insert_user(
            User::try_new("sam", "sam@example.com", "STUDENT")
                .unwrap()
                .with_parent(parent),
        )
        .unwrap();
    let employer = set
        .insert_user(User::try_new("acme", "hr@acme.test", "EMPLOYER").unwrap())
        .unwrap();
    let job = set
        .insert_job(
            Job::try_new("Barista", "Weekend shifts", employer)
                .unwrap()
                .with_location("Main St"),
        )
        .unwrap();
    Seed {
        set,
        parent,
        student,
        employer,
        job,
    }
}

#[test]
fn seeded_set_links_records() {
    let seed = seeded();
    assert_eq!(seed.set.len(), 4);

    let children = seed.set.children_of(seed.parent);
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, seed.student);

    let jobs = seed.set.jobs_posted_by(seed.employer);
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].location.as_deref(), Some("Main St"));
}

#[test]
fn application_links_existing_job_and_user() {
    let mut seed = seeded();
    let application =
        Application::try_new(seed.job, seed.student, "PENDING", APPLIED_AT_MS).unwrap();
    let id = seed.set.insert_application(application).unwrap();

    let stored = seed.set.application(id).unwrap();
    assert_eq!(stored.status, ApplicationStatus::Pending);
    assert_eq!(seed.set.applications_for_job(seed.job).len(), 1);
    assert_eq!(seed.set.applications_by_user(seed.student).len(), 1);
}

#[test]
fn application_with_missing_job_is_rejected() {
    let mut seed = seeded();
    let missing = Uuid::new_v4();
    let application =
        Application::try_new(missing, seed.student, "PENDING", APPLIED_AT_MS).unwrap();

    let err = seed.set.insert_application(application).unwrap_err();
    assert_eq!(
        err,
        IntegrityError::MissingReference {
            entity: "Job",
            field: "jobID",
            id: missing,
        }
    );
}

#[test]
fn application_with_missing_user_is_rejected() {
    let mut seed = seeded();
    let missing = Uuid::new_v4();
    let application = Application::try_new(seed.job, missing, "ACCEPTED", APPLIED_AT_MS).unwrap();

    let err = seed.set.insert_application(application).unwrap_err();
    assert_eq!(
        err,
        IntegrityError::MissingReference {
            entity: "User",
            field: "userID",
            id: missing,
        }
    );
}

#[test]
fn student_parent_must_have_parent_role() {
    let mut seed = seeded();
    let student = User::try_new("kim", "kim@example.com", "STUDENT")
        .unwrap()
        .with_parent(seed.employer);

    let err = seed.set.insert_user(student).unwrap_err();
    assert_eq!(
        err,
        IntegrityError::RoleMismatch {
            field: "parentID",
            id: seed.employer,
            expected: Role::Parent,
            actual: Role::Employer,
        }
    );
}

#[test]
fn student_without_parent_is_accepted() {
    let mut seed = seeded();
    let student = User::try_new("lee", "lee@example.com", "STUDENT").unwrap();
    assert!(seed.set.insert_user(student).is_ok());
}

#[test]
fn job_poster_must_be_employer() {
    let mut seed = seeded();
    let job = Job::try_new("Tutor", "Math tutoring", seed.parent).unwrap();

    let err = seed.set.insert_job(job).unwrap_err();
    assert_eq!(
        err,
        IntegrityError::RoleMismatch {
            field: "postedByID",
            id: seed.parent,
            expected: Role::Employer,
            actual: Role::Parent,
        }
    );
}

#[test]
fn closed_enumerations_reject_unknown_values() {
    let err = User::try_new("max", "max@example.com", "ADMIN").unwrap_err();
    assert_eq!(
        err,
        RecordValidationError::InvalidEnumValue(InvalidEnumValueError {
            enum_name: "Role",
            value: "ADMIN".to_string(),
        })
    );

    let err = Application::try_new(Uuid::new_v4(), Uuid::new_v4(), "WITHDRAWN", APPLIED_AT_MS)
        .unwrap_err();
    assert!(matches!(
        err,
        RecordValidationError::InvalidEnumValue(InvalidEnumValueError {
            enum_name: "ApplicationStatus",
            ..
        })
    ));
}

#[test]
fn deserialize_rejects_unknown_role() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "username": "max",
        "email": "max@example.com",
        "role": "ADMIN",
        "parentID": null
    });
    assert!(serde_json::from_value::<User>(value).is_err());
}

#[test]
fn records_use_foreign_key_wire_names() {
    let seed = seeded();
    let student = seed.set.user(seed.student).unwrap();
    let json = serde_json::to_value(student).unwrap();
    assert_eq!(json["role"], "STUDENT");
    assert_eq!(json["parentID"], seed.parent.to_string());

    let application =
        Application::try_new(seed.job, seed.student, "REJECTED", APPLIED_AT_MS).unwrap();
    let json = serde_json::to_value(&application).unwrap();
    assert_eq!(json["jobID"], seed.job.to_string());
    assert_eq!(json["userID"], seed.student.to_string());
    assert_eq!(json["status"], "REJECTED");
    assert_eq!(json["appliedAt"], APPLIED_AT_MS);
}

#[test]
fn referenced_records_cannot_be_removed() {
    let mut seed = seeded();
    let application =
        Application::try_new(seed.job, seed.student, "PENDING", APPLIED_AT_MS).unwrap();
    let application_id = seed.set.insert_application(application).unwrap();

    let err = seed.set.remove_user(seed.parent).unwrap_err();
    assert_eq!(
        err,
        IntegrityError::Referenced {
            entity: "User",
            id: seed.parent,
            by: "User",
            count: 1,
        }
    );
    let err = seed.set.remove_job(seed.job).unwrap_err();
    assert_eq!(err.code(), "still_referenced");

    seed.set.remove_application(application_id).unwrap();
    seed.set.remove_job(seed.job).unwrap();
    seed.set.remove_user(seed.employer).unwrap();
    assert!(seed.set.job(seed.job).is_none());
    assert!(seed.set.user(seed.employer).is_none());
}

#[test]
fn removing_unknown_record_reports_not_found() {
    let mut set = RecordSet::new();
    let id = Uuid::new_v4();
    assert_eq!(
        set.remove_todo(id).unwrap_err(),
        IntegrityError::NotFound { entity: "Todo", id }
    );
}

#[test]
fn load_accepts_any_order_and_validates_references() {
    let parent = User::try_new("pat", "pat@example.com", "PARENT").unwrap();
    let student = User::try_new("sam", "sam@example.com", "STUDENT")
        .unwrap()
        .with_parent(parent.id);
    let employer = User::try_new("acme", "hr@acme.test", "EMPLOYER").unwrap();
    let job = Job::try_new("Barista", "Weekend shifts", employer.id).unwrap();
    let application =
        Application::try_new(job.id, student.id, "ACCEPTED", APPLIED_AT_MS).unwrap();

    let set = RecordSet::load(
        vec![student.clone(), parent.clone(), employer],
        vec![job.clone()],
        vec![application],
        vec![Todo::new("buy milk")],
    )
    .unwrap();
    assert_eq!(set.len(), 6);
    assert!(set.validate().is_ok());

    let orphan = Application::try_new(job.id, Uuid::new_v4(), "PENDING", APPLIED_AT_MS).unwrap();
    let err = RecordSet::load(vec![parent], vec![], vec![orphan], vec![]).unwrap_err();
    assert!(matches!(err, IntegrityError::MissingReference { .. }));
}

#[test]
fn load_rejects_duplicate_ids() {
    let parent = User::try_new("pat", "pat@example.com", "PARENT").unwrap();
    let err = RecordSet::load(vec![parent.clone(), parent.clone()], vec![], vec![], vec![])
        .unwrap_err();
    assert_eq!(
        err,
        IntegrityError::DuplicateId {
            entity: "User",
            id: parent.id,
        }
    );
}
