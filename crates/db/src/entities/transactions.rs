//! `SeaORM` Entity for the transactions table.
//!
//! `plot_id` and `creator_id` reference rows owned by the farms and users
//! microservices, so they are plain integers without foreign keys.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub transaction_id: i32,
    pub plot_id: i32,
    pub description: Option<String>,
    pub transaction_date: Date,
    pub transaction_state_id: i32,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub value: Decimal,
    pub transaction_category_id: i32,
    pub creator_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transaction_categories::Entity",
        from = "Column::TransactionCategoryId",
        to = "super::transaction_categories::Column::TransactionCategoryId"
    )]
    TransactionCategories,
    #[sea_orm(
        belongs_to = "super::transaction_states::Entity",
        from = "Column::TransactionStateId",
        to = "super::transaction_states::Column::TransactionStateId"
    )]
    TransactionStates,
}

impl Related<super::transaction_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionCategories.def()
    }
}

impl Related<super::transaction_states::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionStates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
