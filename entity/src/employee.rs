use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employee")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    #[sea_orm(indexed)]
    pub department: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::direct_report::Entity")]
    DirectReport,
}

impl Related<super::direct_report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DirectReport.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
