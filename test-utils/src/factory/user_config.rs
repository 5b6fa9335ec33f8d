//! User configuration factory for creating local configuration documents.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};
use serde_json::Value;

/// Factory for creating test user configuration documents.
///
/// # Example
///
/// ```rust,ignore
/// let config = UserConfigFactory::new(&db)
///     .user_id("42")
///     .document(serde_json::json!({ "theme": "dark" }))
///     .build()
///     .await?;
/// ```
pub struct UserConfigFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: String,
    document: Value,
}

impl<'a> UserConfigFactory<'a> {
    /// Creates a new UserConfigFactory with a unique user id and an empty document.
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            user_id: next_id().to_string(),
            document: Value::Object(Default::default()),
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Sets the stored document. Any JSON value is accepted so malformed
    /// documents can be seeded.
    pub fn document(mut self, document: Value) -> Self {
        self.document = document;
        self
    }

    /// Builds and inserts the document into the database.
    ///
    /// # Returns
    /// - `Ok(entity::user_config::Model)` - Created record
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::user_config::Model, DbErr> {
        entity::user_config::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(self.user_id),
            document: ActiveValue::Set(self.document.to_string()),
            updated_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a user configuration document with default values.
pub async fn create_user_config(
    db: &DatabaseConnection,
) -> Result<entity::user_config::Model, DbErr> {
    UserConfigFactory::new(db).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use entity::prelude::*;

    #[tokio::test]
    async fn creates_empty_document() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_table(UserConfig)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let config = create_user_config(db).await?;

        assert_eq!(config.document, "{}");

        Ok(())
    }

    #[tokio::test]
    async fn creates_unique_users() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_table(UserConfig)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let first = create_user_config(db).await?;
        let second = create_user_config(db).await?;

        assert_ne!(first.user_id, second.user_id);

        Ok(())
    }
}
