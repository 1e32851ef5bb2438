mod csv_files;
mod progress;

pub use csv_files::{CsvFilesObserver, PARAM_COLSEP};
pub use progress::ProgressObserver;
