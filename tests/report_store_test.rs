mod common;

use std::sync::Arc;

use chrono::{Duration, Local};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use clinicdesk_backend::stores::doctor_store::NewDoctor;
use clinicdesk_backend::stores::{
    AppointmentStore, DoctorStore, PatientStore, PaymentStore, ReportStore, SettingStore,
};
use clinicdesk_backend::types::db::payment::PaymentMethod;
use clinicdesk_backend::types::internal::role::Role;

use common::{create_role_user, setup_test_db, test_credential_store};

struct Clinic {
    doctor_store: DoctorStore,
    appointment_store: AppointmentStore,
    payment_store: PaymentStore,
    report_store: ReportStore,
}

fn clinic(db: &DatabaseConnection) -> Clinic {
    let patient_store = Arc::new(PatientStore::new(db.clone()));
    let setting_store = Arc::new(SettingStore::new(db.clone()));
    Clinic {
        doctor_store: DoctorStore::new(db.clone()),
        appointment_store: AppointmentStore::new(db.clone(), patient_store),
        payment_store: PaymentStore::new(db.clone(), setting_store),
        report_store: ReportStore::new(db.clone()),
    }
}

async fn create_doctor(store: &DoctorStore, name: &str, prefix: &str) -> String {
    store
        .create(NewDoctor {
            full_name: name.to_string(),
            department: "General".to_string(),
            phone: String::new(),
            room_number: String::new(),
            code_prefix: Some(prefix.to_string()),
            created_by: None,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_counts_and_per_doctor_activity() {
    let db = setup_test_db().await;
    let c = clinic(&db);

    let busy = create_doctor(&c.doctor_store, "Dr. Busy", "A").await;
    let quiet = create_doctor(&c.doctor_store, "Dr. Quiet", "B").await;

    for patient in ["Alice", "Bob", "Carol"] {
        c.appointment_store
            .create(&busy, patient, None, "staff-1")
            .await
            .unwrap();
    }
    c.appointment_store
        .create(&quiet, "Dave", None, "staff-1")
        .await
        .unwrap();

    assert_eq!(c.report_store.doctors_count().await.unwrap(), 2);
    assert_eq!(c.report_store.patients_count().await.unwrap(), 4);

    let today = Local::now().date_naive();
    assert_eq!(
        c.report_store
            .appointments_in_range(today, today)
            .await
            .unwrap(),
        4
    );
    assert_eq!(
        c.report_store
            .appointments_in_range(today + Duration::days(1), today + Duration::days(2))
            .await
            .unwrap(),
        0
    );

    // Busiest doctor first
    let activity = c.report_store.per_doctor_activity(today, today).await.unwrap();
    assert_eq!(activity.len(), 2);
    assert_eq!(activity[0].0.full_name, "Dr. Busy");
    assert_eq!(activity[0].1, 3);
    assert_eq!(activity[1].1, 1);

    let totals = c.report_store.doctor_appointment_totals().await.unwrap();
    assert_eq!(totals.get(&busy).copied(), Some(3));
    assert_eq!(totals.get(&quiet).copied(), Some(1));

    let todays = c
        .report_store
        .doctor_appointment_totals_on(today)
        .await
        .unwrap();
    assert_eq!(todays.get(&busy).copied(), Some(3));
}

#[tokio::test]
async fn test_cashier_report_covers_admin3_captures_only() {
    let db = setup_test_db().await;
    let c = clinic(&db);
    let credential_store = test_credential_store(&db);

    let cashier = create_role_user(&credential_store, "kassir", Role::Admin3, false).await;
    let creator = create_role_user(&credential_store, "owner", Role::Creator, true).await;

    let doctor_id = create_doctor(&c.doctor_store, "Dr. One", "A").await;

    let by_cashier = c
        .appointment_store
        .create(&doctor_id, "Alice", None, "staff-1")
        .await
        .unwrap();
    let by_creator = c
        .appointment_store
        .create(&doctor_id, "Bob", None, "staff-1")
        .await
        .unwrap();

    for (appt, amount) in [(&by_cashier, 10000), (&by_creator, 20000)] {
        c.appointment_store
            .set_price(&appt.appointment.id, Decimal::new(amount, 2))
            .await
            .unwrap();
    }

    let priced = c
        .appointment_store
        .get(&by_cashier.appointment.id)
        .await
        .unwrap()
        .unwrap();
    let p1 = c
        .payment_store
        .create(&priced, PaymentMethod::Cash, &cashier.id)
        .await
        .unwrap();

    let priced = c
        .appointment_store
        .get(&by_creator.appointment.id)
        .await
        .unwrap()
        .unwrap();
    c.payment_store
        .create(&priced, PaymentMethod::Card, &creator.id)
        .await
        .unwrap();

    let rows = c
        .report_store
        .cashier_report(p1.created_at - 1, p1.created_at + 60)
        .await
        .unwrap();

    // Only the capture by the Admin3 account is reported
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].cashier_username, "kassir");
    assert_eq!(rows[0].patient_name, "Alice");
    assert_eq!(rows[0].doctor_name, "Dr. One");
    assert_eq!(rows[0].amount, Decimal::new(10000, 2));
    assert_eq!(rows[0].receipt_no, p1.receipt_no);
}

#[tokio::test]
async fn test_cashier_report_is_empty_without_cashiers() {
    let db = setup_test_db().await;
    let c = clinic(&db);

    let rows = c.report_store.cashier_report(0, i64::MAX).await.unwrap();
    assert!(rows.is_empty());
}
