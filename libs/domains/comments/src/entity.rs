use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::models::{Comment, NewComment};

/// Sea-ORM Entity for the comments table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub author: String,
    pub email: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Comment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            author: model.author,
            email: model.email,
            body: model.body,
            created_at: model.created_at.into(),
        }
    }
}

// id and created_at are left to the store's defaults
impl From<NewComment> for ActiveModel {
    fn from(input: NewComment) -> Self {
        ActiveModel {
            id: NotSet,
            author: Set(input.author),
            email: Set(input.email),
            body: Set(input.body),
            created_at: NotSet,
        }
    }
}
