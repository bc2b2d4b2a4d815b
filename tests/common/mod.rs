#![allow(dead_code)]

mod mocks;

use std::sync::Arc;

pub use mocks::MockSink;

use row_binder_rs::core::{
    column::ColumnIndex,
    row::{Mutability, Row},
};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn row(columns: &Arc<ColumnIndex>, values: &[&str], mutability: Mutability) -> Row {
    Row::new(
        Arc::clone(columns),
        values.iter().map(|value| value.to_string()).collect(),
        mutability,
    )
    .unwrap()
}
