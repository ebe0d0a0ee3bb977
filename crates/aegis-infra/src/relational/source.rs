use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DbConn, DbErr, EntityTrait, QueryOrder};

use super::contact_submission::{Column, Entity};

/// Connect to the source database.
pub async fn connect(url: &str) -> Result<DbConn, DbErr> {
    let options = ConnectOptions::new(url)
        .max_connections(5)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(true)
        .to_owned();

    Database::connect(options).await
}

/// Every source row, oldest first, in one unpaginated select.
pub async fn fetch_submissions(
    db: &DbConn,
) -> Result<Vec<super::contact_submission::Model>, DbErr> {
    Entity::find().order_by_asc(Column::CreatedAt).all(db).await
}
