//! Mock version of a record sink;
use mockall::mock;

use row_binder_rs::{RowError, core::item::RecordSink};

mock! {
    pub Sink {}
    impl RecordSink for Sink {
        fn write_record(&mut self, values: &[String]) -> Result<(), RowError>;
        fn flush(&mut self) -> Result<(), RowError>;
    }
}
