//! CSV support for reading rows and writing records.
//!
//! These adapters stand in for the table layer: [`csv_reader::CsvRowReader`]
//! yields [`Row`](crate::core::row::Row)s sharing the columns of the header,
//! and [`csv_writer::CsvRowWriter`] is a [`RecordSink`](crate::core::item::RecordSink)
//! that owns the quoting rules.
//!
//! Both components follow the builder pattern.
//!
//! # Examples
//!
//! ## Reading rows and binding them
//!
//! ```
//! use row_binder_rs::core::binding::{Bindable, Member, TypeBinder};
//! use row_binder_rs::core::item::RowReader;
//! use row_binder_rs::item::csv::csv_reader::CsvRowReaderBuilder;
//!
//! #[derive(Debug, Default)]
//! struct City {
//!     city: String,
//!     pop: u32,
//! }
//!
//! impl Bindable for City {
//!     fn members() -> Vec<Member<Self>> {
//!         vec![
//!             Member::new("city", |c: &mut City, v| c.city = v),
//!             Member::new("pop", |c: &mut City, v| c.pop = v),
//!         ]
//!     }
//! }
//!
//! let csv_data = "\
//! city,country,pop
//! Boston,United States,4628910
//! Concord,United States,42695
//! ";
//!
//! let reader = CsvRowReaderBuilder::new().from_reader(csv_data.as_bytes()).unwrap();
//! let to_city = TypeBinder::build_accessor::<City>(reader.columns()).unwrap();
//!
//! let mut cities = Vec::new();
//! while let Some(row) = reader.read().unwrap() {
//!     cities.push(to_city(&row).unwrap());
//! }
//!
//! assert_eq!(cities.len(), 2);
//! assert_eq!(cities[0].city, "Boston");
//! assert_eq!(cities[1].pop, 42695);
//! ```

/// A module providing facilities for reading CSV records as rows.
pub mod csv_reader;

/// A module providing a CSV record sink.
pub mod csv_writer;
