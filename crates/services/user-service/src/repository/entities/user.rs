//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{DomainError, User, UserRole};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub is_email_verified: bool,
    pub is_active: bool,
    pub otp: Option<String>,
    pub otp_expires_at: Option<DateTimeUtc>,
    pub role: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database row to domain entity.
///
/// Fails only when the stored role is outside the known set.
impl TryFrom<Model> for User {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(User {
            id: Some(model.id),
            email: model.email,
            name: model.name,
            role: model.role.parse::<UserRole>()?,
            is_email_verified: model.is_email_verified,
            is_active: model.is_active,
            otp: model.otp,
            otp_expires_at: model.otp_expires_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Build a fully-set active model for `user` stored under `id`.
pub fn active_model(user: &User, id: Uuid) -> ActiveModel {
    ActiveModel {
        id: Set(id),
        email: Set(user.email.clone()),
        name: Set(user.name.clone()),
        is_email_verified: Set(user.is_email_verified),
        is_active: Set(user.is_active),
        otp: Set(user.otp.clone()),
        otp_expires_at: Set(user.otp_expires_at),
        role: Set(user.role.as_str().to_string()),
        created_at: Set(user.created_at),
        updated_at: Set(user.updated_at),
    }
}
