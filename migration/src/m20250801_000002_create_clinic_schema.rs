use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create doctors table
        manager
            .create_table(
                Table::create()
                    .table(Doctors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Doctors::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Doctors::FullName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Doctors::Department)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Doctors::Phone)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Doctors::RoomNumber)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Doctors::CodePrefix)
                            .string_len(2)
                            .not_null()
                            .default("A"),
                    )
                    .col(
                        ColumnDef::new(Doctors::ReceiptSerial)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Doctors::CreatedBy)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Doctors::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create patients table
        manager
            .create_table(
                Table::create()
                    .table(Patients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Patients::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Patients::FullName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Patients::Phone)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Patients::Address)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Patients::BirthDate).date().null())
                    .col(
                        ColumnDef::new(Patients::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_patients_full_name")
                    .table(Patients::Table)
                    .col(Patients::FullName)
                    .to_owned(),
            )
            .await?;

        // Create appointments table
        manager
            .create_table(
                Table::create()
                    .table(Appointments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Appointments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Appointments::DoctorId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Appointments::PatientId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Appointments::Date).date().not_null())
                    .col(ColumnDef::new(Appointments::Time).time().not_null())
                    .col(
                        ColumnDef::new(Appointments::Status)
                            .string_len(20)
                            .not_null()
                            .default("waiting"),
                    )
                    .col(
                        ColumnDef::new(Appointments::DocNo)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Appointments::ServicePrice)
                            .decimal_len(12, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Appointments::CreatedBy)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Appointments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_doctor_id")
                            .from(Appointments::Table, Appointments::DoctorId)
                            .to(Doctors::Table, Doctors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_patient_id")
                            .from(Appointments::Table, Appointments::PatientId)
                            .to(Patients::Table, Patients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_appointments_doctor_date")
                    .table(Appointments::Table)
                    .col(Appointments::DoctorId)
                    .col(Appointments::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_appointments_date")
                    .table(Appointments::Table)
                    .col(Appointments::Date)
                    .to_owned(),
            )
            .await?;

        // Create payments table; one payment per appointment
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Payments::AppointmentId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Payments::Amount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::Method)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::CashierId)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Payments::ReceiptNo)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_appointment_id")
                            .from(Payments::Table, Payments::AppointmentId)
                            .to(Appointments::Table, Appointments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payments_created")
                    .table(Payments::Table)
                    .col(Payments::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Create clinic_settings singleton table
        manager
            .create_table(
                Table::create()
                    .table(ClinicSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClinicSettings::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClinicSettings::ClinicName)
                            .string()
                            .not_null()
                            .default("Clinic"),
                    )
                    .col(
                        ColumnDef::new(ClinicSettings::ClinicAddress)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ClinicSettings::ClinicPhone)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ClinicSettings::ReceiptFooter)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ClinicSettings::CodePrefix)
                            .string_len(2)
                            .not_null()
                            .default("R"),
                    )
                    .col(
                        ColumnDef::new(ClinicSettings::ReceiptSerial)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ClinicSettings::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Insert singleton row with id=1
        manager
            .exec_stmt(
                Query::insert()
                    .into_table(ClinicSettings::Table)
                    .columns([
                        ClinicSettings::Id,
                        ClinicSettings::ClinicName,
                        ClinicSettings::ClinicAddress,
                        ClinicSettings::ClinicPhone,
                        ClinicSettings::ReceiptFooter,
                        ClinicSettings::CodePrefix,
                        ClinicSettings::ReceiptSerial,
                        ClinicSettings::UpdatedAt,
                    ])
                    .values_panic([
                        1.into(),
                        "Clinic".into(),
                        "".into(),
                        "".into(),
                        "".into(),
                        "R".into(),
                        0.into(),
                        0.into(),
                    ])
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClinicSettings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Appointments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Patients::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Doctors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Doctors {
    Table,
    Id,
    FullName,
    Department,
    Phone,
    RoomNumber,
    CodePrefix,
    ReceiptSerial,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Patients {
    Table,
    Id,
    FullName,
    Phone,
    Address,
    BirthDate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Appointments {
    Table,
    Id,
    DoctorId,
    PatientId,
    Date,
    Time,
    Status,
    DocNo,
    ServicePrice,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    AppointmentId,
    Amount,
    Method,
    CashierId,
    ReceiptNo,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ClinicSettings {
    Table,
    Id,
    ClinicName,
    ClinicAddress,
    ClinicPhone,
    ReceiptFooter,
    CodePrefix,
    ReceiptSerial,
    UpdatedAt,
}
