mod common;

use std::sync::Arc;

use chrono::{Duration, Local};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

use clinicdesk_backend::stores::doctor_store::NewDoctor;
use clinicdesk_backend::stores::{AppointmentStore, DoctorStore, PatientStore};
use clinicdesk_backend::types::db::appointment::AppointmentStatus;
use clinicdesk_backend::types::db::patient;

use common::setup_test_db;

struct Clinic {
    doctor_store: DoctorStore,
    patient_store: Arc<PatientStore>,
    appointment_store: AppointmentStore,
}

fn clinic(db: &DatabaseConnection) -> Clinic {
    let patient_store = Arc::new(PatientStore::new(db.clone()));
    Clinic {
        doctor_store: DoctorStore::new(db.clone()),
        patient_store: patient_store.clone(),
        appointment_store: AppointmentStore::new(db.clone(), patient_store),
    }
}

async fn create_doctor(store: &DoctorStore, name: &str, prefix: Option<&str>) -> String {
    store
        .create(NewDoctor {
            full_name: name.to_string(),
            department: "General".to_string(),
            phone: String::new(),
            room_number: "12".to_string(),
            code_prefix: prefix.map(str::to_string),
            created_by: None,
        })
        .await
        .expect("Failed to create doctor")
        .id
}

#[tokio::test]
async fn test_create_stamps_sequential_document_numbers() {
    let db = setup_test_db().await;
    let c = clinic(&db);
    let doctor_id = create_doctor(&c.doctor_store, "Dr. One", Some("A")).await;

    let first = c
        .appointment_store
        .create(&doctor_id, "Alice Patient", None, "staff-1")
        .await
        .unwrap();
    let second = c
        .appointment_store
        .create(&doctor_id, "Bob Patient", None, "staff-1")
        .await
        .unwrap();

    assert_eq!(first.appointment.doc_no, Some(1));
    assert_eq!(first.doc_code, "A001");
    assert_eq!(second.appointment.doc_no, Some(2));
    assert_eq!(second.doc_code, "A002");
    assert_eq!(first.appointment.status, AppointmentStatus::Waiting);
    assert_eq!(first.appointment.date, Local::now().date_naive());
}

#[tokio::test]
async fn test_create_reuses_known_patient_by_name() {
    let db = setup_test_db().await;
    let c = clinic(&db);
    let doctor_id = create_doctor(&c.doctor_store, "Dr. One", Some("A")).await;

    let first = c
        .appointment_store
        .create(&doctor_id, "Alice Patient", Some("123456"), "staff-1")
        .await
        .unwrap();
    let second = c
        .appointment_store
        .create(&doctor_id, "Alice Patient", None, "staff-1")
        .await
        .unwrap();

    assert_eq!(first.patient.id, second.patient.id);

    let patients = patient::Entity::find().count(&db).await.unwrap();
    assert_eq!(patients, 1);
    assert_eq!(first.patient.phone, "123456");
}

#[tokio::test]
async fn test_create_fails_for_unknown_doctor() {
    let db = setup_test_db().await;
    let c = clinic(&db);

    let result = c
        .appointment_store
        .create("no-such-doctor", "Alice Patient", None, "staff-1")
        .await;

    assert!(result.is_err());

    // The failed transaction must not leave a stray patient behind
    let patients = patient::Entity::find().count(&db).await.unwrap();
    assert_eq!(patients, 0);
}

#[tokio::test]
async fn test_price_queues_track_service_price() {
    let db = setup_test_db().await;
    let c = clinic(&db);
    let doctor_id = create_doctor(&c.doctor_store, "Dr. One", Some("A")).await;

    let created = c
        .appointment_store
        .create(&doctor_id, "Alice Patient", None, "staff-1")
        .await
        .unwrap();

    let pending = c.appointment_store.pending_price(100).await.unwrap();
    assert_eq!(pending.len(), 1);

    let cashier = c.appointment_store.cashier_queue(&[], 100).await.unwrap();
    assert!(cashier.is_empty());

    c.appointment_store
        .set_price(&created.appointment.id, Decimal::new(15000, 2))
        .await
        .unwrap()
        .expect("appointment exists");

    let pending = c.appointment_store.pending_price(100).await.unwrap();
    assert!(pending.is_empty());

    let cashier = c.appointment_store.cashier_queue(&[], 100).await.unwrap();
    assert_eq!(cashier.len(), 1);
    assert_eq!(cashier[0].service_price, Some(Decimal::new(15000, 2)));

    // A paid appointment drops out of the cashier queue
    let cashier = c
        .appointment_store
        .cashier_queue(&[created.appointment.id.clone()], 100)
        .await
        .unwrap();
    assert!(cashier.is_empty());
}

#[tokio::test]
async fn test_for_doctor_filters_by_patient_name() {
    let db = setup_test_db().await;
    let c = clinic(&db);
    let doctor_id = create_doctor(&c.doctor_store, "Dr. One", Some("A")).await;

    c.appointment_store
        .create(&doctor_id, "Alice Patient", None, "staff-1")
        .await
        .unwrap();
    c.appointment_store
        .create(&doctor_id, "Bob Patient", None, "staff-1")
        .await
        .unwrap();

    let all = c
        .appointment_store
        .for_doctor(&doctor_id, None, None, None, 100)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let filtered = c
        .appointment_store
        .for_doctor(&doctor_id, None, None, Some("Alice"), 100)
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);

    let today = Local::now().date_naive();
    let out_of_range = c
        .appointment_store
        .for_doctor(
            &doctor_id,
            Some(today + Duration::days(1)),
            None,
            None,
            100,
        )
        .await
        .unwrap();
    assert!(out_of_range.is_empty());
}

#[tokio::test]
async fn test_automatic_prefix_assignment_skips_used_prefixes() {
    let db = setup_test_db().await;
    let c = clinic(&db);

    create_doctor(&c.doctor_store, "Dr. A", None).await;
    create_doctor(&c.doctor_store, "Dr. B", None).await;
    let third = create_doctor(&c.doctor_store, "Dr. C", None).await;

    let doctor = c.doctor_store.get(&third).await.unwrap().unwrap();
    assert_eq!(doctor.code_prefix, "C");
}

#[tokio::test]
async fn test_get_or_create_patient_outside_transaction() {
    let db = setup_test_db().await;
    let c = clinic(&db);

    let created = c
        .patient_store
        .get_or_create_by_name(&db, "Walk-in Patient", Some("987"))
        .await
        .unwrap();
    let found = c
        .patient_store
        .get_or_create_by_name(&db, "Walk-in Patient", None)
        .await
        .unwrap();

    assert_eq!(created.id, found.id);
}
