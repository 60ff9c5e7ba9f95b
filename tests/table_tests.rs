//! Table module tests

use sqlstage::{ColumnRef, Dialect, Table, TableError, Value, convert_type, convert_types};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

mod type_inference_tests {
    use super::*;

    #[test]
    fn test_mixed_column_widens_to_text() {
        let mut table = Table::new("releases", strings(&["tag"]), Dialect::Sqlite);
        table.push_row(vec![Value::from("3")]).unwrap();
        table.push_row(vec![Value::from("4.5")]).unwrap();
        table.push_row(vec![Value::from("sqlite")]).unwrap();

        assert_eq!(table.guess_column_types(2000), strings(&["TEXT"]));
    }

    #[test]
    fn test_promotion_is_order_independent() {
        let mut forward = Table::new("t", strings(&["n"]), Dialect::Sqlite);
        let mut backward = Table::new("t", strings(&["n"]), Dialect::Sqlite);
        let values = ["1", "2.5", "3", "4"];
        for v in values {
            forward.push_row(vec![Value::from(v)]).unwrap();
        }
        for v in values.iter().rev() {
            backward.push_row(vec![Value::from(*v)]).unwrap();
        }

        assert_eq!(forward.guess_column_types(2000), strings(&["REAL"]));
        assert_eq!(
            forward.guess_column_types(2000),
            backward.guess_column_types(2000)
        );
    }

    #[test]
    fn test_nulls_do_not_narrow_or_widen() {
        let mut table = Table::new("t", strings(&["a", "b"]), Dialect::Sqlite);
        table
            .push_row(vec![Value::Null, Value::from("1.5")])
            .unwrap();
        table.push_row(vec![Value::from("7"), Value::Null]).unwrap();

        assert_eq!(table.guess_column_types(2000), strings(&["INTEGER", "REAL"]));
    }

    #[test]
    fn test_all_null_column_defaults_to_integer() {
        let mut table = Table::new("t", strings(&["empty"]), Dialect::Postgres);
        table.push_row(vec![Value::Null]).unwrap();
        table.push_row(vec![Value::Null]).unwrap();

        assert_eq!(table.guess_column_types(2000), strings(&["BIGINT"]));
    }

    #[test]
    fn test_sample_size_limits_scan() {
        let mut table = Table::new("t", strings(&["n"]), Dialect::Sqlite);
        table.push_row(vec![Value::from("1")]).unwrap();
        table.push_row(vec![Value::from("2")]).unwrap();
        table.push_row(vec![Value::from("not a number")]).unwrap();

        assert_eq!(table.guess_column_types(2), strings(&["INTEGER"]));
        assert_eq!(table.guess_column_types(3), strings(&["TEXT"]));
    }

    #[test]
    fn test_postgres_type_names() {
        let mut table = Table::new("t", strings(&["i", "f", "s"]), Dialect::Postgres);
        table
            .push_row(vec![
                Value::from("10"),
                Value::from("1.5"),
                Value::from("ten"),
            ])
            .unwrap();

        assert_eq!(
            table.guess_column_types(2000),
            strings(&["BIGINT", "DOUBLE PRECISION", "TEXT"])
        );
    }

    #[test]
    fn test_find_nonconforming_rows() {
        let mut table = Table::new("t", strings(&["n"]), Dialect::Sqlite);
        table.push_row(vec![Value::from("1")]).unwrap();
        table.push_row(vec![Value::from("oops")]).unwrap();
        table.push_row(vec![Value::from("3")]).unwrap();

        let types = strings(&["INTEGER"]);
        let rejects = table.find_nonconforming_rows(Some(types.as_slice()));
        assert_eq!(rejects, vec![1]);
    }

    #[test]
    fn test_find_nonconforming_rows_against_own_types() {
        let mut table = Table::new("t", strings(&["n"]), Dialect::Sqlite);
        table.push_row(vec![Value::from("1")]).unwrap();
        table.push_row(vec![Value::from("two")]).unwrap();

        // Own types are TEXT by default, which holds everything
        assert!(table.find_nonconforming_rows(None).is_empty());
    }
}

mod primary_key_tests {
    use super::*;

    #[test]
    fn test_set_primary_key_appends_marker() {
        let mut table = Table::new("users", strings(&["id", "name"]), Dialect::Sqlite);
        table.set_column_types(strings(&["INTEGER", "TEXT"]));
        table.set_primary_key(Some(0)).unwrap();

        assert_eq!(table.column_types()[0], "INTEGER PRIMARY KEY");
        assert_eq!(table.column_types()[1], "TEXT");
        assert_eq!(table.primary_key(), Some(0));
    }

    #[test]
    fn test_moving_primary_key_strips_old_marker() {
        let mut table = Table::new("users", strings(&["id", "email"]), Dialect::Sqlite);
        table.set_column_types(strings(&["INTEGER", "TEXT"]));
        table.set_primary_key(Some(0)).unwrap();
        table.set_primary_key(Some(1)).unwrap();

        assert_eq!(table.column_types(), &["INTEGER", "TEXT PRIMARY KEY"]);
        assert_eq!(table.primary_key(), Some(1));
    }

    #[test]
    fn test_clearing_primary_key() {
        let mut table = Table::new("users", strings(&["id"]), Dialect::Sqlite);
        table.set_column_types(strings(&["INTEGER"]));
        table.set_primary_key(Some(0)).unwrap();
        table.set_primary_key(None).unwrap();

        assert_eq!(table.column_types(), &["INTEGER"]);
        assert_eq!(table.primary_key(), None);
    }

    #[test]
    fn test_primary_key_out_of_range() {
        let mut table = Table::new("users", strings(&["id"]), Dialect::Sqlite);
        assert!(table.set_primary_key(Some(5)).is_err());
    }

    #[test]
    fn test_set_column_types_keeps_marker() {
        let mut table = Table::new("users", strings(&["id", "name"]), Dialect::Sqlite);
        table.set_primary_key(Some(0)).unwrap();
        table.set_column_types(strings(&["INTEGER", "TEXT"]));

        assert_eq!(table.column_types()[0], "INTEGER PRIMARY KEY");
    }

    #[test]
    fn test_reorder_carries_primary_key() {
        let mut table = Table::new("users", strings(&["id", "name"]), Dialect::Sqlite);
        table.set_column_types(strings(&["INTEGER", "TEXT"]));
        table.set_primary_key(Some(0)).unwrap();
        table
            .push_row(vec![Value::from("1"), Value::from("ada")])
            .unwrap();

        let reordered = table
            .reorder(&[ColumnRef::Name("name"), ColumnRef::Name("id")])
            .unwrap();
        assert_eq!(reordered.primary_key(), Some(1));
        assert_eq!(reordered.column_types()[1], "INTEGER PRIMARY KEY");
        assert_eq!(reordered.rows()[0], vec![Value::from("ada"), Value::from("1")]);
    }
}

mod column_operation_tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(
            "countries",
            strings(&["Country", "Capital", "Population"]),
            Dialect::Sqlite,
        );
        table
            .push_row(vec![
                Value::from("USA"),
                Value::from("Washington"),
                Value::from("331000000"),
            ])
            .unwrap();
        table
            .push_row(vec![
                Value::from("Canada"),
                Value::from("Ottawa"),
                Value::from("38000000"),
            ])
            .unwrap();
        table
    }

    #[test]
    fn test_column_lookup_is_case_insensitive() {
        let table = sample();
        assert_eq!(table.column_index("capital").unwrap(), 1);
        assert_eq!(table.column_index("CAPITAL").unwrap(), 1);
        assert_eq!(table.column_index(2).unwrap(), 2);
    }

    #[test]
    fn test_missing_column_error_lists_available() {
        let table = sample();
        let err = table.column_index("area").unwrap_err();
        match err {
            TableError::ColumnNotFound { name, available } => {
                assert_eq!(name, "area");
                assert_eq!(available, strings(&["Country", "Capital", "Population"]));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_delete_column_removes_values() {
        let mut table = sample();
        table.delete_column("Capital").unwrap();

        assert_eq!(table.column_names(), &["Country", "Population"]);
        assert_eq!(table.n_cols(), 2);
        assert_eq!(table.rows()[0].len(), 2);
        assert_eq!(table.rows()[0][1], Value::from("331000000"));
    }

    #[test]
    fn test_delete_column_adjusts_primary_key() {
        let mut table = sample();
        table.set_primary_key(Some(2)).unwrap();
        table.delete_column(0).unwrap();
        assert_eq!(table.primary_key(), Some(1));

        table.delete_column("Population").unwrap();
        assert_eq!(table.primary_key(), None);
    }

    #[test]
    fn test_apply_transforms_one_column() {
        let mut table = sample();
        table
            .apply("Country", |v| Value::from(v.to_string().to_uppercase()))
            .unwrap();

        assert_eq!(table.rows()[0][0], Value::from("USA"));
        assert_eq!(table.rows()[1][0], Value::from("CANADA"));
    }

    #[test]
    fn test_append_derived_column() {
        let mut table = sample();
        table
            .append_derived_column(
                "Summary",
                &[ColumnRef::Name("Capital"), ColumnRef::Name("Country")],
                |args| Value::from(format!("{}, {}", args[0], args[1])),
            )
            .unwrap();

        assert_eq!(table.n_cols(), 4);
        assert_eq!(table.rows()[0][3], Value::from("Washington, USA"));
    }

    #[test]
    fn test_derived_column_name_collision() {
        let mut table = sample();
        let err = table
            .append_derived_column("Country", &[], |_| Value::Null)
            .unwrap_err();
        assert!(matches!(err, TableError::ColumnExists(_)));
    }

    #[test]
    fn test_aggregate() {
        let table = sample();
        let total: i64 = table
            .aggregate("Population", |values| {
                values
                    .iter()
                    .filter_map(|v| v.to_string().parse::<i64>().ok())
                    .sum()
            })
            .unwrap();
        assert_eq!(total, 369_000_000);
    }

    #[test]
    fn test_promote_row_to_header() {
        let mut table = Table::new("t", strings(&["col0", "col1"]), Dialect::Sqlite);
        table
            .push_row(vec![Value::from("name"), Value::from("age")])
            .unwrap();
        table
            .push_row(vec![Value::from("ada"), Value::from("36")])
            .unwrap();

        table.promote_row_to_header(0).unwrap();
        assert_eq!(table.column_names(), &["name", "age"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_empty_rows_keeps_zero() {
        let mut table = Table::new("t", strings(&["a", "b"]), Dialect::Sqlite);
        table.push_row(vec![Value::Null, Value::from("")]).unwrap();
        table
            .push_row(vec![Value::Integer(0), Value::Null])
            .unwrap();
        table.push_row(vec![Value::Null, Value::Null]).unwrap();

        table.remove_empty_rows();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0][0], Value::Integer(0));
    }

    #[test]
    fn test_row_width_is_enforced() {
        let mut table = sample();
        let err = table.push_row(vec![Value::from("x")]).unwrap_err();
        assert_eq!(
            err,
            TableError::RowWidthMismatch {
                expected: 3,
                found: 1
            }
        );
    }

    #[test]
    fn test_sanitize_column_names() {
        let mut table = Table::new(
            "t",
            strings(&["first.name", "2nd place", "total;sum"]),
            Dialect::Sqlite,
        );
        table.sanitize_column_names();
        assert_eq!(table.column_names(), &["first_name", "_2ndplace", "total_sum"]);
    }
}

mod serialization_tests {
    use super::*;

    #[test]
    fn test_table_serializes_to_json() {
        let mut table = Table::new("users", strings(&["id", "name"]), Dialect::Sqlite);
        table.set_column_types(strings(&["INTEGER", "TEXT"]));
        table
            .push_row(vec![Value::Integer(1), Value::from("ada")])
            .unwrap();
        table.push_row(vec![Value::Null, Value::from("bob")]).unwrap();

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["name"], "users");
        assert_eq!(json["columnNames"][1], "name");
        assert_eq!(json["columnTypes"][0], "INTEGER");
        assert_eq!(json["rows"][0][0], 1);
        assert!(json["rows"][1][0].is_null());
        assert_eq!(json["rows"][1][1], "bob");
    }

    #[test]
    fn test_reader_config_round_trips() {
        let config = sqlstage::ReaderConfig::builder()
            .table_name("cities")
            .delimiter(',')
            .null_sentinel("NA")
            .dialect(Dialect::Postgres)
            .build();

        let json = serde_json::to_string(&config).unwrap();
        let back: sqlstage::ReaderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.table_name, "cities");
        assert_eq!(back.delimiter, ',');
        assert_eq!(back.null_sentinel.as_deref(), Some("NA"));
        assert_eq!(back.dialect, Dialect::Postgres);
    }
}

mod conversion_tests {
    use super::*;

    #[test]
    fn test_sqlite_to_postgres() {
        assert_eq!(
            convert_type("integer", Dialect::Sqlite, Dialect::Postgres),
            "BIGINT"
        );
        assert_eq!(
            convert_type("REAL", Dialect::Sqlite, Dialect::Postgres),
            "DOUBLE PRECISION"
        );
    }

    #[test]
    fn test_unrecognized_type_passes_through() {
        assert_eq!(
            convert_type("GEOMETRY", Dialect::Sqlite, Dialect::Postgres),
            "GEOMETRY"
        );
    }

    #[test]
    fn test_schema_round_trip() {
        let schema = strings(&["INTEGER", "REAL", "TEXT"]);
        let there = convert_types(&schema, Dialect::Sqlite, Dialect::Postgres);
        let back = convert_types(&there, Dialect::Postgres, Dialect::Sqlite);
        assert_eq!(back, schema);
    }
}
