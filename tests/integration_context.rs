use std::sync::Arc;

use bblog::config::Config;
use bblog::context::RequestContext;
use bblog::db;

fn test_config(dir: &tempfile::TempDir) -> Config {
    Config {
        database: dir.path().join("blog.db").to_str().unwrap().to_string(),
        secret_key: "test-secret".into(),
        bind_addr: "127.0.0.1:0".into(),
    }
}

#[tokio::test]
async fn connection_is_opened_once_and_close_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    db::init_db(&config).await.unwrap();

    let ctx = RequestContext::new(Arc::new(config));

    // Closing before anything was opened is fine.
    ctx.close().await.unwrap();

    // A temporary table is only visible on the connection that created it,
    // so the second access must have received the same connection.
    {
        let mut conn = ctx.db().await.unwrap();
        sqlx::raw_sql("CREATE TEMPORARY TABLE scratch (x INTEGER)")
            .execute(&mut *conn)
            .await
            .unwrap();
    }
    {
        let mut conn = ctx.db().await.unwrap();
        sqlx::query("INSERT INTO scratch (x) VALUES (1)")
            .execute(&mut *conn)
            .await
            .unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scratch")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    ctx.close().await.unwrap();
    ctx.close().await.unwrap();
}

#[tokio::test]
async fn timestamp_columns_decode_to_chrono() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    db::init_db(&config).await.unwrap();

    let ctx = RequestContext::new(Arc::new(config));
    {
        let mut conn = ctx.db().await.unwrap();
        sqlx::raw_sql(
            "CREATE TABLE note (id INTEGER PRIMARY KEY AUTOINCREMENT, created TIMESTAMP NOT NULL);",
        )
        .execute(&mut *conn)
        .await
        .unwrap();
        sqlx::query("INSERT INTO note (created) VALUES (?)")
            .bind("2024-01-02 03:04:05")
            .execute(&mut *conn)
            .await
            .unwrap();

        let created: chrono::NaiveDateTime = sqlx::query_scalar("SELECT created FROM note")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        let expected = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(created, expected);
    }
    ctx.close().await.unwrap();
}
