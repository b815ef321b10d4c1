use std::fmt;
use std::marker::PhantomData;

use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, IntoActiveModel, Iterable, PaginatorTrait,
    PrimaryKeyToColumn, PrimaryKeyTrait, QueryFilter, QueryOrder, Select, Value,
};
use tracing::{debug, error, info, instrument, trace, warn};

use crate::error::Result;
use crate::mapping::MappedEntity;

/// Uniform CRUD operations over a single mapped entity type.
///
/// Every call runs in its own implicit unit of work and commits on return;
/// nothing is cached, retried or reordered. Lookups that miss return `None`
/// or an empty list rather than an error.
pub struct GenericDao<E> {
    db: DatabaseConnection,
    entity: PhantomData<E>,
}

impl<E: MappedEntity> GenericDao<E> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            entity: PhantomData,
        }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Every row, ordered by primary key.
    fn ordered() -> Select<E> {
        E::PrimaryKey::iter().fold(E::find(), |select, key| {
            select.order_by_asc(key.into_column())
        })
    }
}

impl<E> GenericDao<E>
where
    E: MappedEntity,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: Send,
{
    /// Returns the entity with the given id, or `None` if there is none.
    #[instrument(skip(self), fields(entity = %E::entity_name()))]
    pub async fn get_by_id(&self, id: i32) -> Result<Option<E::Model>> {
        trace!("Looking up entity by id");
        let found = E::find_by_id(id).one(&self.db).await?;
        if found.is_none() {
            debug!("No {} with id {}", E::entity_name(), id);
        }
        Ok(found)
    }

    /// Returns every entity whose `column_name` equals `value`.
    ///
    /// The column is resolved through [`MappedEntity::resolve_column`]; an
    /// unknown name or a value of the wrong type is a mapping error.
    #[instrument(skip(self, value), fields(entity = %E::entity_name()))]
    pub async fn get_by_column_equal<V>(&self, column_name: &str, value: V) -> Result<Vec<E::Model>>
    where
        V: Into<Value>,
    {
        let column = E::resolve_column(column_name)?;
        let value = value.into();
        E::check_value(column, &value)?;
        debug!(?value, "Filtering {} by {}", E::entity_name(), column_name);

        let rows = Self::ordered()
            .filter(column.eq(value))
            .all(&self.db)
            .await?;
        debug!("Matched {} rows", rows.len());
        Ok(rows)
    }

    /// Returns every entity whose text column contains `fragment`.
    ///
    /// `%` and `_` in `fragment` match themselves, not any text.
    #[instrument(skip(self), fields(entity = %E::entity_name()))]
    pub async fn get_by_column_like(&self, column_name: &str, fragment: &str) -> Result<Vec<E::Model>> {
        let column = E::resolve_column(column_name)?;
        E::check_text(column)?;

        let pattern = format!("%{}%", escape_like(fragment));
        trace!("LIKE pattern: {}", pattern);
        let rows = Self::ordered()
            .filter(column.like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)))
            .all(&self.db)
            .await?;
        debug!("Matched {} rows", rows.len());
        Ok(rows)
    }

    /// Returns every row of the entity's table, ordered by id.
    #[instrument(skip(self), fields(entity = %E::entity_name()))]
    pub async fn get_all(&self) -> Result<Vec<E::Model>> {
        let rows = Self::ordered().all(&self.db).await?;
        debug!("Retrieved {} rows", rows.len());
        Ok(rows)
    }

    #[instrument(skip(self), fields(entity = %E::entity_name()))]
    pub async fn count(&self) -> Result<u64> {
        let count = E::find().count(&self.db).await?;
        debug!("{} rows in {}", count, E::entity_name());
        Ok(count)
    }

    /// Persists a new entity and returns its generated id.
    #[instrument(skip(self, model), fields(entity = %E::entity_name()))]
    pub async fn insert(&self, model: E::ActiveModel) -> Result<i32> {
        trace!("Inserting new entity");
        let result = E::insert(model).exec(&self.db).await.map_err(|e| {
            error!("Failed to insert {}: {}", E::entity_name(), e);
            e
        })?;
        info!("Inserted {} with id {}", E::entity_name(), result.last_insert_id);
        Ok(result.last_insert_id)
    }

    /// Updates the stored row when `model` carries an id, inserts otherwise.
    ///
    /// Updating an id that is not stored fails with a database error.
    #[instrument(skip(self, model), fields(entity = %E::entity_name()))]
    pub async fn save_or_update(&self, model: E::ActiveModel) -> Result<E::Model> {
        let saved = if model.get_primary_key_value().is_some() {
            trace!("Primary key present, updating");
            model.update(&self.db).await
        } else {
            trace!("No primary key, inserting");
            model.insert(&self.db).await
        }
        .map_err(|e| {
            error!("Failed to save {}: {}", E::entity_name(), e);
            e
        })?;
        info!("Saved {}", E::entity_name());
        Ok(saved)
    }

    /// Removes the row backing `model`.
    #[instrument(skip(self, model), fields(entity = %E::entity_name()))]
    pub async fn delete(&self, model: E::Model) -> Result<()> {
        let result = E::delete(model.into_active_model())
            .exec(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to delete {}: {}", E::entity_name(), e);
                e
            })?;
        if result.rows_affected == 0 {
            warn!("Delete of {} matched no rows", E::entity_name());
        } else {
            info!("Deleted {}", E::entity_name());
        }
        Ok(())
    }

    /// Removes the row with `id` and reports how many rows went away.
    #[instrument(skip(self), fields(entity = %E::entity_name()))]
    pub async fn delete_by_id(&self, id: i32) -> Result<u64> {
        let result = E::delete_by_id(id).exec(&self.db).await?;
        debug!("Rows affected: {}", result.rows_affected);
        Ok(result.rows_affected)
    }
}

const LIKE_ESCAPE: char = '\\';

fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

impl<E> Clone for GenericDao<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            entity: PhantomData,
        }
    }
}

impl<E: MappedEntity> fmt::Debug for GenericDao<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericDao")
            .field("entity", &E::entity_name())
            .finish()
    }
}
