use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};

use crate::database::models::{
    broadcasts, collections, location_history, shops, system_logs, users,
};

async fn create_table<C, E>(db: &C, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;

    // Columns marked `indexed` are not part of the CREATE TABLE statement
    for mut index in schema.create_index_from_entity(entity) {
        index.if_not_exists();
        db.execute(backend.build(&index)).await?;
    }

    log::debug!("Ensured table {}", entity.table_name());
    Ok(())
}

/// Creates every table the service needs. Existing tables are left untouched.
///
/// Order matters: referenced tables are created before the tables pointing at them.
pub async fn create_tables<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, users::Entity).await?;
    create_table(db, &schema, shops::Entity).await?;
    create_table(db, &schema, collections::Entity).await?;
    create_table(db, &schema, location_history::Entity).await?;
    create_table(db, &schema, broadcasts::Entity).await?;
    create_table(db, &schema, system_logs::Entity).await?;

    Ok(())
}
