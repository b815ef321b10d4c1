use sea_orm::entity::prelude::*;
use std::fmt;

use super::user;

/// A role granted to a user, e.g. "admin" or "clinician".
/// `user_name` is a denormalized copy of the owning user's name and only
/// has meaning together with `user_id`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, DeriveEntityModel)]
#[sea_orm(table_name = "role")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub role_type: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Loads the user this role is attached to.
    pub async fn user<C: ConnectionTrait>(&self, db: &C) -> Result<Option<user::Model>, DbErr> {
        self.find_related(user::Entity).one(db).await
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Role{{id={}, roleType='{}', userName='{}'}}",
            self.id, self.role_type, self.user_name
        )
    }
}
