#[cfg(test)]
mod tests {
    use crate::{
        batch, memory_service,
        utils::{
            assert_row_count, coded_products, column, decimal, product_codes, products,
            stored_rows,
        },
    };
    use engine_core::{
        coercion::CoercionKind, error::SyncError, loader::ClearOutcome, registry::registry,
    };
    use model::core::value::Value;
    use serde_json::json;
    use tracing_test::traced_test;

    // Scenario: a single product with a short decimal quantity, first batch.
    // Expected Outcome: one row inserted, quantity stored at the column scale.
    #[traced_test]
    #[tokio::test]
    async fn tc01() {
        let (store, service) = memory_service(5000);

        let summary = service
            .sync(batch(
                "acc_product",
                vec![json!({"code": "A1", "quantity": "10.5"})],
                true,
            ))
            .await
            .unwrap();

        assert_eq!(summary.records_inserted, 1);
        let quantities = column(&store, "acc_product", "quantity").await;
        assert_eq!(quantities, vec![decimal("10.50000")]);
        assert_eq!(quantities[0].to_string(), "10.50000");
        assert!(logs_contain("Sync completed"));
    }

    // Scenario: the table is not in the registry.
    // Expected Outcome: UnsupportedTable naming every registered table; nothing written.
    #[traced_test]
    #[tokio::test]
    async fn tc02() {
        let (store, service) = memory_service(5000);

        let err = service
            .sync(batch("unknown_table", vec![json!({"code": "A1"})], true))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("not supported"));
        match err {
            SyncError::UnsupportedTable { supported, .. } => {
                assert_eq!(supported, registry().supported_tables());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        for table in registry().supported_tables() {
            assert_row_count(&store, &table, 0).await;
        }
    }

    // Scenario: an integer key arrives as a float.
    // Expected Outcome: stored as the integer 12.
    #[traced_test]
    #[tokio::test]
    async fn tc03() {
        let (store, service) = memory_service(5000);

        service
            .sync(batch("acc_invmast", vec![json!({"slno": 12.0})], true))
            .await
            .unwrap();

        assert_eq!(column(&store, "acc_invmast", "slno").await, vec![Value::Int(12)]);
    }

    // Scenario: a first batch of 3 records, then a second batch of 2 with
    // is_first_batch=false. The table held a stale row beforehand.
    // Expected Outcome: 5 rows, the stale row is gone, only the first call cleared.
    #[traced_test]
    #[tokio::test]
    async fn tc04() {
        let (store, service) = memory_service(5000);
        service
            .sync(batch("acc_purchasemaster", vec![json!({"slno": 999})], true))
            .await
            .unwrap();

        let first = service
            .sync(batch(
                "acc_purchasemaster",
                vec![json!({"slno": 1}), json!({"slno": 2}), json!({"slno": 3})],
                true,
            ))
            .await
            .unwrap();
        let second = service
            .sync(batch(
                "acc_purchasemaster",
                vec![json!({"slno": 4}), json!({"slno": 5})],
                false,
            ))
            .await
            .unwrap();

        assert_eq!(first.records_deleted, Some(ClearOutcome::Truncated));
        assert_eq!(second.records_deleted, None);
        assert_eq!(
            column(&store, "acc_purchasemaster", "slno").await,
            (1..=5).map(Value::Int).collect::<Vec<_>>()
        );
    }

    // Scenario: for every registered table, a populated table receives an
    // empty first batch.
    // Expected Outcome: the table is empty and nothing is reported inserted.
    #[traced_test]
    #[tokio::test]
    async fn tc05() {
        let (store, service) = memory_service(5000);
        service
            .sync(batch("acc_product", products(3), true))
            .await
            .unwrap();

        for table in registry().supported_tables() {
            let summary = service.sync(batch(&table, Vec::new(), true)).await.unwrap();
            assert_eq!(summary.records_inserted, 0);
            assert!(summary.records_deleted.is_some());
            assert_row_count(&store, &table, 0).await;
        }
        assert_eq!(
            service.session().truncated_tables().await.len(),
            registry().supported_tables().len()
        );
    }

    // Scenario: one bad record among many good ones.
    // Expected Outcome: the whole batch is rejected and the table is untouched,
    // including its existing rows.
    #[traced_test]
    #[tokio::test]
    async fn tc06() {
        let (store, service) = memory_service(5000);
        service
            .sync(batch("acc_product", products(2), true))
            .await
            .unwrap();

        let mut data = products(10);
        data[7] = json!({"code": "BAD", "quantity": "lots"});
        let err = service
            .sync(batch("acc_product", data, true))
            .await
            .unwrap_err();

        let SyncError::ValidationFailed(report) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(report.total_errors, 1);
        assert_eq!(report.validation_errors[0].record_index, 7);
        assert_row_count(&store, "acc_product", 2).await;
        assert!(logs_contain("Validation failed"));
    }

    // Scenario: the same records loaded in one call and across several calls
    // with a small chunk size.
    // Expected Outcome: identical stored rows.
    #[traced_test]
    #[tokio::test]
    async fn tc07() {
        let data = products(23);

        let (single_store, single) = memory_service(5000);
        single
            .sync(batch("acc_product", data.clone(), true))
            .await
            .unwrap();

        let (split_store, split) = memory_service(4);
        for (i, part) in data.chunks(10).enumerate() {
            let summary = split
                .sync(batch("acc_product", part.to_vec(), i == 0))
                .await
                .unwrap();
            assert_eq!(summary.records_inserted, part.len() as u64);
        }

        assert_eq!(
            stored_rows(&single_store, "acc_product").await,
            stored_rows(&split_store, "acc_product").await
        );
    }

    // Scenario: stored decimals keep their full scale.
    // Expected Outcome: "12.50000" round-trips as 12.50000.
    #[traced_test]
    #[tokio::test]
    async fn tc08() {
        let (store, service) = memory_service(5000);

        service
            .sync(batch(
                "acc_invdetails",
                vec![json!({"invno": "42", "code": "X", "quantity": "12.50000"})],
                true,
            ))
            .await
            .unwrap();

        let rows = stored_rows(&store, "acc_invdetails").await;
        assert_eq!(rows[0].get_value("invno"), Value::Int(42));
        assert_eq!(rows[0].get_value("quantity").to_string(), "12.50000");
    }

    // Scenario: integer key coercion applied twice.
    // Expected Outcome: the second application changes nothing.
    #[test]
    fn tc09() {
        for input in [Value::Int(7), Value::Float(7.9), Value::String("7".into())] {
            let once = CoercionKind::IntegerKey.apply(input).unwrap();
            let twice = CoercionKind::IntegerKey.apply(once.clone()).unwrap();
            assert_eq!(once, twice);
        }
    }

    // Scenario: TRUNCATE is refused by the store on a first batch.
    // Expected Outcome: DELETE removes the rows in the same transaction and
    // the summary carries the deleted count.
    #[traced_test]
    #[tokio::test]
    async fn tc10() {
        let (store, service) = memory_service(5000);
        service
            .sync(batch(
                "acc_productiondetails",
                vec![
                    json!({"masterno": "M1", "code": "A", "qty": 1}),
                    json!({"masterno": "M1", "code": "B", "qty": 2}),
                ],
                true,
            ))
            .await
            .unwrap();
        store.reject_truncate("acc_productiondetails").await;

        let summary = service
            .sync(batch(
                "acc_productiondetails",
                vec![json!({"masterno": "M2", "code": "C", "qty": "0.125"})],
                true,
            ))
            .await
            .unwrap();

        assert_eq!(summary.records_deleted, Some(ClearOutcome::Deleted(2)));
        assert_eq!(
            serde_json::to_value(&summary).unwrap()["records_deleted"],
            json!(2)
        );
        assert_row_count(&store, "acc_productiondetails", 1).await;
        assert!(logs_contain("falling back to DELETE"));
    }

    // Scenario: the insert fails after the clear in a first batch.
    // Expected Outcome: the clear is rolled back with it; the old rows survive.
    #[traced_test]
    #[tokio::test]
    async fn tc11() {
        let (store, service) = memory_service(5000);
        service
            .sync(batch("acc_users", vec![json!({"id": "u1", "pass_field": "p"})], true))
            .await
            .unwrap();
        store.reject_inserts("acc_users").await;

        let err = service
            .sync(batch("acc_users", vec![json!({"id": "u2", "pass_field": "q"})], true))
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::Storage(_)));
        assert_eq!(
            column(&store, "acc_users", "id").await,
            vec![Value::String("u1".into())]
        );
        assert_eq!(service.metrics().snapshot().storage_failures, 1);
    }

    // Scenario: string fields with padding and an empty date.
    // Expected Outcome: strings trimmed, empty date stored as NULL, ISO date parsed.
    #[traced_test]
    #[tokio::test]
    async fn tc12() {
        let (store, service) = memory_service(5000);

        service
            .sync(batch(
                "acc_users",
                vec![json!({"id": "  u1 ", "pass_field": "pw  ", "role": " admin"})],
                true,
            ))
            .await
            .unwrap();
        service
            .sync(batch(
                "acc_production",
                vec![
                    json!({"productionno": "P1", "date": ""}),
                    json!({"productionno": "P2", "date": "2024-02-29"}),
                ],
                true,
            ))
            .await
            .unwrap();

        let users = stored_rows(&store, "acc_users").await;
        assert_eq!(users[0].get_value("id"), Value::String("u1".into()));
        assert_eq!(users[0].get_value("role"), Value::String("admin".into()));

        let dates = column(&store, "acc_production", "date").await;
        assert_eq!(dates[0], Value::Null);
        assert_eq!(
            dates[1],
            Value::Date(chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
    }

    // Scenario: first batches for two different tables run at the same time.
    // Expected Outcome: each table holds exactly its own batch.
    #[traced_test]
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn tc13() {
        let (store, service) = memory_service(7);
        service
            .sync(batch("acc_invmast", vec![json!({"slno": 999})], true))
            .await
            .unwrap();

        let products_task = tokio::spawn({
            let service = service.clone();
            async move {
                service
                    .sync(batch("acc_product", products(30), true))
                    .await
            }
        });
        let invoices_task = tokio::spawn({
            let service = service.clone();
            let data = (1..=20).map(|i| json!({"slno": i})).collect();
            async move { service.sync(batch("acc_invmast", data, true)).await }
        });

        let (products_summary, invoices_summary) = tokio::join!(products_task, invoices_task);
        assert_eq!(products_summary.unwrap().unwrap().records_inserted, 30);
        assert_eq!(invoices_summary.unwrap().unwrap().records_inserted, 20);

        assert_eq!(product_codes(&store).await.len(), 30);
        assert_eq!(
            column(&store, "acc_invmast", "slno").await,
            (1..=20).map(Value::Int).collect::<Vec<_>>()
        );
    }

    // Scenario: two first batches for the same table race each other, each
    // spanning several chunks.
    // Expected Outcome: the table ends up holding exactly one of the two
    // batches, never a mix and never a batch cleared away by the other mid-load.
    #[traced_test]
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn tc14() {
        for _ in 0..10 {
            let (store, service) = memory_service(3);
            service
                .sync(batch("acc_product", coded_products("OLD", 5), true))
                .await
                .unwrap();

            let first = {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .sync(batch("acc_product", coded_products("A", 10), true))
                        .await
                })
            };
            let second = {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .sync(batch("acc_product", coded_products("B", 7), true))
                        .await
                })
            };

            let (first, second) = tokio::join!(first, second);
            let first = first.unwrap().unwrap();
            let second = second.unwrap().unwrap();
            assert_eq!(first.records_deleted, Some(ClearOutcome::Truncated));
            assert_eq!(second.records_deleted, Some(ClearOutcome::Truncated));

            let codes = product_codes(&store).await;
            let expected_a: Vec<String> = (0..10).map(|i| format!("A{i:04}")).collect();
            let expected_b: Vec<String> = (0..7).map(|i| format!("B{i:04}")).collect();
            assert!(
                codes == expected_a || codes == expected_b,
                "table holds a mix of batches: {codes:?}"
            );
        }
    }
}
