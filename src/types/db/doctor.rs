use sea_orm::entity::prelude::*;

/// A doctor owns a sequential document counter (`receipt_serial`) and a
/// short receipt code prefix used to format document numbers.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "doctors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub full_name: String,
    pub department: String,
    pub phone: String,
    pub room_number: String,

    // 1-2 uppercase characters, assigned uniquely across doctors
    pub code_prefix: String,

    // Monotone counter; never decremented except by the explicit reset operation
    pub receipt_serial: i64,

    pub created_by: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
