use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "compensation")]
pub struct Model {
    /// Insertion order; the highest id per employee is the current record.
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub employee_id: String,
    pub salary_cents: i64,
    pub effective_date: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
