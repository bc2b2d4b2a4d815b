#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # Row Binder for Rust

 Name-based access to rows of tabular data, and compiled bindings that turn
 those rows into strongly-typed structs.

 ## Core Concepts

- **ColumnIndex:** The ordered column names of a table, shared by all of its rows, with a cached case-insensitive name → position mapping.
- **Row:** One record of string values aligned with a `ColumnIndex`. Values are read and written by column name or by position.
- **Binding:** A program compiled once per (type, column layout) that reads cells by position, converts them and assigns them to the members of a struct.
- **BindingCache:** A process-wide memo of bindings, so rows sharing a layout reuse one binding.
- **Converter:** The fixed, locale-independent conversion of cell text into integers, floats, booleans, dates, enums and strings.

 ## Features

| **Feature**   | **Description**                                               |
|---------------|---------------------------------------------------------------|
| csv           | Enables a CSV `RowReader` and a CSV `RecordSink`              |
| full          | Enables all available features                                |

 ## Getting Started

```toml
[dependencies]
row-binder-rs = { version = "<version>", features = ["<full|csv>"] }
```

```rust
use row_binder_rs::{
    RowError,
    core::{
        binding::{Bindable, Member, TypeBinder},
        column::ColumnIndex,
        row::{Mutability, Row},
    },
};

#[derive(Debug, Default)]
struct Person {
    id: i64,
    name: String,
    age: i32,
}

impl Bindable for Person {
    fn members() -> Vec<Member<Self>> {
        vec![
            Member::new("Id", |p: &mut Person, v| p.id = v),
            Member::new("Name", |p: &mut Person, v| p.name = v),
            Member::new("Age", |p: &mut Person, v| p.age = v),
        ]
    }
}

fn main() -> Result<(), RowError> {
    let columns = ColumnIndex::shared(["Id", "Name", "Age"]);
    let row = Row::new(
        columns.clone(),
        vec!["7".to_string(), "Ada".to_string(), "36".to_string()],
        Mutability::ReadOnly,
    )?;

    assert_eq!(row.get("name")?, "Ada");
    assert_eq!(row.get_or_empty("Missing"), "");

    let to_person = TypeBinder::build_accessor::<Person>(&columns)?;
    let person = to_person(&row)?;

    assert_eq!(person.id, 7);
    assert_eq!(person.name, "Ada");
    assert_eq!(person.age, 36);

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.
 */

/// Core module for rows and bindings
pub mod core;

/// Error types for row operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Set of row readers / record sinks (for exemple: csv reader and writer)
pub mod item;

#[doc(hidden)]
pub use strum;
