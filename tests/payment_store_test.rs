mod common;

use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use clinicdesk_backend::errors::internal::{BillingError, InternalError};
use clinicdesk_backend::stores::doctor_store::NewDoctor;
use clinicdesk_backend::stores::{
    AppointmentStore, DoctorStore, PatientStore, PaymentStore, SettingStore,
};
use clinicdesk_backend::types::db::appointment;
use clinicdesk_backend::types::db::payment::PaymentMethod;

use common::setup_test_db;

struct Clinic {
    appointment_store: AppointmentStore,
    payment_store: PaymentStore,
    setting_store: Arc<SettingStore>,
    doctor_store: DoctorStore,
}

fn clinic(db: &DatabaseConnection) -> Clinic {
    let patient_store = Arc::new(PatientStore::new(db.clone()));
    let setting_store = Arc::new(SettingStore::new(db.clone()));
    Clinic {
        appointment_store: AppointmentStore::new(db.clone(), patient_store),
        payment_store: PaymentStore::new(db.clone(), setting_store.clone()),
        setting_store,
        doctor_store: DoctorStore::new(db.clone()),
    }
}

/// Queue an appointment and optionally price it.
async fn queued_appointment(c: &Clinic, price: Option<Decimal>) -> appointment::Model {
    let doctor_id = c
        .doctor_store
        .create(NewDoctor {
            full_name: "Dr. One".to_string(),
            department: "General".to_string(),
            phone: String::new(),
            room_number: String::new(),
            code_prefix: Some("A".to_string()),
            created_by: None,
        })
        .await
        .unwrap()
        .id;

    let created = c
        .appointment_store
        .create(&doctor_id, "Alice Patient", None, "staff-1")
        .await
        .unwrap();

    match price {
        Some(amount) => c
            .appointment_store
            .set_price(&created.appointment.id, amount)
            .await
            .unwrap()
            .expect("appointment exists"),
        None => created.appointment,
    }
}

#[tokio::test]
async fn test_capture_requires_a_price() {
    let db = setup_test_db().await;
    let c = clinic(&db);
    let appt = queued_appointment(&c, None).await;

    let result = c
        .payment_store
        .create(&appt, PaymentMethod::Cash, "cashier-1")
        .await;

    assert!(matches!(
        result,
        Err(InternalError::Billing(BillingError::PriceNotSet(_)))
    ));
}

#[tokio::test]
async fn test_capture_copies_the_recorded_price() {
    let db = setup_test_db().await;
    let c = clinic(&db);
    let appt = queued_appointment(&c, Some(Decimal::new(25000, 2))).await;

    let payment = c
        .payment_store
        .create(&appt, PaymentMethod::Card, "cashier-1")
        .await
        .unwrap();

    assert_eq!(payment.amount, Decimal::new(25000, 2));
    assert_eq!(payment.method, PaymentMethod::Card);
    assert_eq!(payment.cashier_id.as_deref(), Some("cashier-1"));
    assert_eq!(payment.receipt_no, "R001");
}

#[tokio::test]
async fn test_receipt_numbers_are_clinic_wide() {
    let db = setup_test_db().await;
    let c = clinic(&db);

    let first = queued_appointment(&c, Some(Decimal::new(10000, 2))).await;
    let second = queued_appointment(&c, Some(Decimal::new(20000, 2))).await;

    let p1 = c
        .payment_store
        .create(&first, PaymentMethod::Cash, "cashier-1")
        .await
        .unwrap();
    let p2 = c
        .payment_store
        .create(&second, PaymentMethod::Cash, "cashier-1")
        .await
        .unwrap();

    assert_eq!(p1.receipt_no, "R001");
    assert_eq!(p2.receipt_no, "R002");
}

#[tokio::test]
async fn test_double_payment_is_rejected() {
    let db = setup_test_db().await;
    let c = clinic(&db);
    let appt = queued_appointment(&c, Some(Decimal::new(10000, 2))).await;

    c.payment_store
        .create(&appt, PaymentMethod::Cash, "cashier-1")
        .await
        .unwrap();

    let result = c
        .payment_store
        .create(&appt, PaymentMethod::Cash, "cashier-2")
        .await;

    assert!(matches!(
        result,
        Err(InternalError::Billing(BillingError::AlreadyPaid(_)))
    ));
}

#[tokio::test]
async fn test_counter_reset_restarts_receipt_numbers() {
    let db = setup_test_db().await;
    let c = clinic(&db);

    let first = queued_appointment(&c, Some(Decimal::new(10000, 2))).await;
    let p1 = c
        .payment_store
        .create(&first, PaymentMethod::Cash, "cashier-1")
        .await
        .unwrap();
    assert_eq!(p1.receipt_no, "R001");

    c.setting_store.reset_serial().await.unwrap();

    // Repeats after an administrative reset are legal; uniqueness holds
    // between resets only.
    let second = queued_appointment(&c, Some(Decimal::new(20000, 2))).await;
    let p2 = c
        .payment_store
        .create(&second, PaymentMethod::Cash, "cashier-1")
        .await
        .unwrap();
    assert_eq!(p2.receipt_no, "R001");
}

#[tokio::test]
async fn test_captured_between_filters_by_timestamp() {
    let db = setup_test_db().await;
    let c = clinic(&db);

    let appt = queued_appointment(&c, Some(Decimal::new(10000, 2))).await;
    let payment = c
        .payment_store
        .create(&appt, PaymentMethod::Cash, "cashier-1")
        .await
        .unwrap();

    let hits = c
        .payment_store
        .captured_between(payment.created_at, payment.created_at + 1)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);

    let misses = c
        .payment_store
        .captured_between(payment.created_at + 1, payment.created_at + 2)
        .await
        .unwrap();
    assert!(misses.is_empty());
}

#[tokio::test]
async fn test_paid_appointment_ids_lists_captures() {
    let db = setup_test_db().await;
    let c = clinic(&db);
    let appt = queued_appointment(&c, Some(Decimal::new(10000, 2))).await;

    assert!(c.payment_store.paid_appointment_ids().await.unwrap().is_empty());

    c.payment_store
        .create(&appt, PaymentMethod::Cash, "cashier-1")
        .await
        .unwrap();

    let paid = c.payment_store.paid_appointment_ids().await.unwrap();
    assert_eq!(paid, vec![appt.id.clone()]);
}
