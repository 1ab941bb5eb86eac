use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{Engine, NewCategoryCmd, NewTransactionCmd, TransactionType};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn insert_user(db: &DatabaseConnection) -> Uuid {
    let user_id = Uuid::new_v4();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (id, email, password, is_active, is_superuser, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
        vec![
            user_id.as_bytes().to_vec().into(),
            format!("{user_id}@example.com").into(),
            "not-a-real-hash".into(),
            true.into(),
            false.into(),
            Utc::now().into(),
        ],
    ))
    .await
    .unwrap();
    user_id
}

async fn insert_category(engine: &Engine, name: &str) -> i32 {
    engine
        .new_category(NewCategoryCmd::new(name, "test category"))
        .await
        .unwrap()
        .id
}

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

async fn seed_tx(
    engine: &Engine,
    user_id: Uuid,
    category_id: i32,
    amount: i64,
    kind: TransactionType,
    date: DateTime<Utc>,
) {
    engine
        .create_transaction(
            NewTransactionCmd::new(user_id, category_id, amount, kind).transaction_date(date),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn category_spending_orders_and_truncates() {
    let (engine, db) = engine_with_db().await;
    let user = insert_user(&db).await;
    let category_a = insert_category(&engine, "Groceries").await;
    let category_b = insert_category(&engine, "Rent").await;

    // 300 across two expenses in A, 500 in a single expense in B.
    seed_tx(
        &engine,
        user,
        category_a,
        100,
        TransactionType::Expense,
        at(2024, 3, 1),
    )
    .await;
    seed_tx(
        &engine,
        user,
        category_a,
        200,
        TransactionType::Expense,
        at(2024, 3, 2),
    )
    .await;
    seed_tx(
        &engine,
        user,
        category_b,
        500,
        TransactionType::Expense,
        at(2024, 3, 3),
    )
    .await;

    let rows = engine.category_spending(user, 1).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category_id, category_b);
    assert_eq!(rows[0].category_name, "Rent");
    assert_eq!(rows[0].total_amount, 500);
    assert_eq!(rows[0].transaction_count, 1);

    let rows = engine.category_spending(user, 10).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].category_id, category_b);
    assert_eq!(rows[1].category_id, category_a);
    assert_eq!(rows[1].total_amount, 300);
    assert_eq!(rows[1].transaction_count, 2);
}

#[tokio::test]
async fn category_spending_ignores_income_and_other_users() {
    let (engine, db) = engine_with_db().await;
    let alice = insert_user(&db).await;
    let bob = insert_user(&db).await;
    let salary = insert_category(&engine, "Salary").await;
    let groceries = insert_category(&engine, "Groceries").await;

    seed_tx(
        &engine,
        alice,
        salary,
        5000,
        TransactionType::Income,
        at(2024, 3, 1),
    )
    .await;
    seed_tx(
        &engine,
        alice,
        groceries,
        100,
        TransactionType::Expense,
        at(2024, 3, 2),
    )
    .await;
    seed_tx(
        &engine,
        bob,
        groceries,
        900,
        TransactionType::Expense,
        at(2024, 3, 3),
    )
    .await;

    let rows = engine.category_spending(alice, 10).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category_id, groceries);
    assert_eq!(rows[0].total_amount, 100);
    assert_eq!(rows[0].transaction_count, 1);
}

#[tokio::test]
async fn category_spending_is_empty_for_unknown_user() {
    let (engine, _db) = engine_with_db().await;

    let rows = engine.category_spending(Uuid::new_v4(), 10).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn monthly_trends_skip_empty_months() {
    let (engine, db) = engine_with_db().await;
    let user = insert_user(&db).await;
    let category = insert_category(&engine, "General").await;

    seed_tx(
        &engine,
        user,
        category,
        1000,
        TransactionType::Income,
        at(2024, 1, 10),
    )
    .await;
    seed_tx(
        &engine,
        user,
        category,
        200,
        TransactionType::Expense,
        at(2024, 3, 20),
    )
    .await;

    let trends = engine.monthly_trends(user, 6).await.unwrap();

    // January and March only; February is not synthesized as a zero row.
    assert_eq!(trends.len(), 2);
    assert_eq!((trends[0].year, trends[0].month), (2024, 1));
    assert_eq!(trends[0].income, 1000);
    assert_eq!(trends[0].expense, 0);
    assert_eq!(trends[0].net, 1000);
    assert_eq!((trends[1].year, trends[1].month), (2024, 3));
    assert_eq!(trends[1].income, 0);
    assert_eq!(trends[1].expense, 200);
    assert_eq!(trends[1].net, -200);
}

#[tokio::test]
async fn monthly_trends_take_most_recent_active_months() {
    let (engine, db) = engine_with_db().await;
    let user = insert_user(&db).await;
    let category = insert_category(&engine, "General").await;

    // Eight active months spanning a year boundary.
    for (year, month) in [
        (2023, 8),
        (2023, 9),
        (2023, 10),
        (2023, 11),
        (2023, 12),
        (2024, 1),
        (2024, 2),
        (2024, 3),
    ] {
        seed_tx(
            &engine,
            user,
            category,
            100,
            TransactionType::Expense,
            at(year, month, 15),
        )
        .await;
    }

    let trends = engine.monthly_trends(user, 6).await.unwrap();

    assert_eq!(trends.len(), 6);
    // Oldest two months fall off; output is ascending chronological.
    assert_eq!((trends[0].year, trends[0].month), (2023, 10));
    assert_eq!(
        (trends[5].year, trends[5].month),
        (2024, 3)
    );
    let months: Vec<(i32, u32)> = trends.iter().map(|t| (t.year, t.month)).collect();
    let mut sorted = months.clone();
    sorted.sort();
    assert_eq!(months, sorted);
}

#[tokio::test]
async fn monthly_trends_accumulate_both_types_per_month() {
    let (engine, db) = engine_with_db().await;
    let user = insert_user(&db).await;
    let salary = insert_category(&engine, "Salary").await;
    let groceries = insert_category(&engine, "Groceries").await;

    seed_tx(
        &engine,
        user,
        salary,
        3000,
        TransactionType::Income,
        at(2024, 5, 1),
    )
    .await;
    seed_tx(
        &engine,
        user,
        groceries,
        400,
        TransactionType::Expense,
        at(2024, 5, 8),
    )
    .await;
    seed_tx(
        &engine,
        user,
        groceries,
        250,
        TransactionType::Expense,
        at(2024, 5, 21),
    )
    .await;

    let trends = engine.monthly_trends(user, 6).await.unwrap();

    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0].income, 3000);
    assert_eq!(trends[0].expense, 650);
    assert_eq!(trends[0].net, 2350);
}

#[tokio::test]
async fn monthly_trends_are_empty_for_unknown_user() {
    let (engine, _db) = engine_with_db().await;

    let trends = engine.monthly_trends(Uuid::new_v4(), 6).await.unwrap();
    assert!(trends.is_empty());
}
