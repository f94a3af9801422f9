use sea_orm::entity::prelude::*;

/// Clinic-wide settings singleton (id = 1). Owns the clinic receipt counter
/// used for cashier receipt numbers.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "clinic_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub clinic_name: String,
    pub clinic_address: String,
    pub clinic_phone: String,
    pub receipt_footer: String,
    pub code_prefix: String,
    pub receipt_serial: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
