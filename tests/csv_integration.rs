mod common;

use std::{error::Error, fs};

use common::init_logger;
use tempfile::NamedTempFile;

use row_binder_rs::{
    RowError,
    core::{
        binding::{Bindable, Member, TypeBinder},
        item::{RecordSink, RowReader},
        row::Mutability,
    },
    item::csv::{csv_reader::CsvRowReaderBuilder, csv_writer::CsvRowWriterBuilder},
};

#[derive(Debug, Default, Clone)]
struct Car {
    year: u16,
    make: String,
    model: String,
}

impl Bindable for Car {
    fn members() -> Vec<Member<Self>> {
        vec![
            Member::new("year", |c: &mut Car, v| c.year = v),
            Member::new("make", |c: &mut Car, v| c.make = v),
            Member::new("model", |c: &mut Car, v| c.model = v),
        ]
    }
}

const CARS: &str = "year,make,model,description
1948,Porsche,356,Luxury sports car
2011,Peugeot,206+,City car
2012,Citroën,C4 Picasso,SUV
2021,Mazda,CX-30,\"SUV, Compact\"
1967,Ford,Mustang fastback 1967,American car
";

#[test]
fn csv_rows_should_bind_to_cars() -> Result<(), Box<dyn Error>> {
    init_logger();

    let reader = CsvRowReaderBuilder::new().from_reader(CARS.as_bytes())?;
    let to_car = TypeBinder::build_accessor::<Car>(reader.columns())?;

    let mut cars = Vec::new();
    while let Some(row) = reader.read()? {
        cars.push(to_car(&row)?);
    }

    assert_eq!(cars.len(), 5);
    assert_eq!(cars[0].year, 1948);
    assert_eq!(cars[2].make, "Citroën");
    assert_eq!(cars[4].model, "Mustang fastback 1967");

    Ok(())
}

#[test]
fn bad_cell_should_fail_only_its_row() -> Result<(), Box<dyn Error>> {
    let csv = "year,make,model
1948d,Porsche,356
2011,Peugeot,206+";

    let reader = CsvRowReaderBuilder::new().from_reader(csv.as_bytes())?;
    let to_car = TypeBinder::build_accessor::<Car>(reader.columns())?;

    let mut cars = Vec::new();
    let mut errors = Vec::new();
    while let Some(row) = reader.read()? {
        match to_car(&row) {
            Ok(car) => cars.push(car),
            Err(error) => errors.push(error),
        }
    }

    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0].make, "Peugeot");
    assert!(matches!(
        &errors[..],
        [RowError::ConversionError { member, raw, .. }] if member == "year" && raw == "1948d"
    ));

    Ok(())
}

#[test]
fn rows_should_be_written_back_with_csv_quoting() -> Result<(), Box<dyn Error>> {
    let reader = CsvRowReaderBuilder::new().from_reader(CARS.as_bytes())?;

    let mut wtr = CsvRowWriterBuilder::new()
        .header(reader.columns())
        .from_writer(vec![]);
    while let Some(row) = reader.read()? {
        row.write_csv_line(&mut wtr)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    assert_eq!(data, CARS);

    Ok(())
}

#[test]
fn edited_rows_should_be_written_to_file() -> Result<(), Box<dyn Error>> {
    let file = NamedTempFile::new()?;

    let reader = CsvRowReaderBuilder::new()
        .mutability(Mutability::Mutable)
        .from_reader("Id,Name,Age\n7,Ada,36\n".as_bytes())?;

    {
        let mut wtr = CsvRowWriterBuilder::new()
            .header(reader.columns())
            .from_path(file.path())?;

        let mut row = reader.read()?.ok_or("missing row")?;
        row.set("name", "Ada, R.")?;
        row.write_csv_line(&mut wtr)?;
        wtr.flush()?;
    }

    let written = fs::read_to_string(file.path())?;
    assert_eq!(written, "Id,Name,Age\n7,\"Ada, R.\",36\n");

    let reread = CsvRowReaderBuilder::new().from_path(file.path())?;
    let row = reread.read()?.ok_or("missing row")?;
    assert_eq!(row.get("NAME")?, "Ada, R.");
    assert_eq!(row.mutability(), Mutability::ReadOnly);

    Ok(())
}

#[test]
fn read_only_rows_from_csv_should_refuse_writes() -> Result<(), Box<dyn Error>> {
    let reader = CsvRowReaderBuilder::new().from_reader("Id,Name\n7,Ada\n".as_bytes())?;

    let mut row = reader.read()?.ok_or("missing row")?;

    assert_eq!(
        row.set("Name", "Grace"),
        Err(RowError::RowNotMutable { index: 1 })
    );
    assert_eq!(row.get("Name")?, "Ada");

    Ok(())
}
