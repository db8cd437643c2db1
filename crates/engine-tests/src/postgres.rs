//! Scenarios against a live Postgres. Run with
//! `OMEGA_TEST_DATABASE_URL=postgres://... cargo test -- --ignored`.

/// Destination tables for the scenarios below.
pub const PRODUCT_TABLE_DDL: &str = r#"
    DROP TABLE IF EXISTS acc_product;
    CREATE TABLE acc_product (
        code varchar PRIMARY KEY,
        name varchar,
        quantity numeric(15,5),
        openingquantity numeric(15,5),
        stockcatagory varchar,
        unit varchar,
        product varchar,
        brand varchar,
        billedcost numeric(14,5),
        basicprice numeric(15,5),
        partqty numeric(15,5)
    );
"#;

pub const INVMAST_TABLE_DDL: &str = r#"
    DROP TABLE IF EXISTS acc_invmast;
    CREATE TABLE acc_invmast (
        slno bigint PRIMARY KEY,
        invdate date
    );
"#;

pub async fn execute(url: &str, sql: &str) {
    let (client, connection) = tokio_postgres::connect(url, tokio_postgres::NoTls)
        .await
        .expect("connect postgres");
    tokio::spawn(connection);
    client.batch_execute(sql).await.expect("execute sql");
}
