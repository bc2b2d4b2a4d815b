mod common;

use common::{MockSink, init_logger, row};

use row_binder_rs::{
    RowError,
    core::{column::ColumnIndex, row::Mutability},
};

fn schemas() -> Vec<(Vec<&'static str>, Vec<&'static str>)> {
    vec![
        (vec!["Id", "Name", "Age"], vec!["7", "Ada", "36"]),
        (vec!["city", "country", "pop"], vec!["Boston", "United States", "4628910"]),
        (vec!["ONE"], vec![""]),
        (vec![], vec![]),
        (vec!["Ærø", "Émile"], vec!["42", "Zola"]),
        (vec!["οδοσ", "ΟΔΟΣ2", "Straße"], vec!["Ermou", "10", "Hauptstraße"]),
    ]
}

fn casings(name: &str) -> Vec<String> {
    vec![name.to_string(), name.to_lowercase(), name.to_uppercase()]
}

#[test]
fn every_column_should_read_back_in_any_casing() {
    init_logger();

    for (names, values) in schemas() {
        let columns = ColumnIndex::shared(names.iter().copied());
        let row = row(&columns, &values, Mutability::ReadOnly);

        for (name, value) in names.iter().zip(&values) {
            for casing in casings(name) {
                assert_eq!(row.get(&casing).unwrap(), *value, "column {casing}");
            }
        }
    }
}

#[test]
fn get_or_empty_should_match_get_or_be_empty() {
    for (names, values) in schemas() {
        let columns = ColumnIndex::shared(names.iter().copied());
        let row = row(&columns, &values, Mutability::ReadOnly);

        for lookup in names.iter().copied().chain(["missing", "Id2", ""]) {
            match row.get(lookup) {
                Ok(value) => assert_eq!(row.get_or_empty(lookup), value),
                Err(RowError::ColumnNotFound(_)) => assert_eq!(row.get_or_empty(lookup), ""),
                Err(other) => panic!("unexpected error {other:?}"),
            }
        }
    }
}

#[test]
fn get_or_empty_all_should_follow_the_input() {
    let columns = ColumnIndex::shared(["Id", "Name", "Age"]);
    let row = row(&columns, &["7", "Ada", "36"], Mutability::ReadOnly);
    let names = vec![
        "name".to_string(),
        "missing".to_string(),
        "AGE".to_string(),
        "name".to_string(),
    ];

    let values = row.get_or_empty_all(&names);

    assert_eq!(values.clone().count(), names.len());
    for (i, value) in values.enumerate() {
        assert_eq!(value, row.get_or_empty(&names[i]));
    }
}

#[test]
fn set_should_respect_mutability() {
    let columns = ColumnIndex::shared(["Id", "Name", "Age"]);

    let mut mutable = row(&columns, &["7", "Ada", "36"], Mutability::Mutable);
    mutable.set("age", "37").unwrap();
    assert_eq!(mutable.get("AGE").unwrap(), "37");
    assert_eq!(mutable.get("Age").unwrap(), "37");

    let mut read_only = row(&columns, &["7", "Ada", "36"], Mutability::ReadOnly);
    assert_eq!(
        read_only.set("age", "37"),
        Err(RowError::RowNotMutable { index: 2 })
    );
    assert_eq!(read_only.values(), ["7", "Ada", "36"]);
}

#[test]
fn write_csv_line_should_hand_over_unescaped_values() {
    let columns = ColumnIndex::shared(["Id", "Name", "Age"]);
    let row = row(&columns, &["7", "Ada, R.", "36"], Mutability::ReadOnly);

    let mut sink = MockSink::new();
    sink.expect_write_record()
        .withf(|values| values.iter().map(String::as_str).eq(["7", "Ada, R.", "36"]))
        .times(1)
        .returning(|_| Ok(()));
    sink.expect_flush().never();

    row.write_csv_line(&mut sink).unwrap();
}

#[test]
fn debug_dump_should_pair_names_and_values() {
    let columns = ColumnIndex::shared(["Id", "Name"]);
    let row = row(&columns, &["7", "Ada"], Mutability::ReadOnly);

    assert_eq!(row.debug_dump(), ["Id=7", "Name=Ada"]);
}
