pub mod report_writer;
pub mod series_loader;

pub use report_writer::ReportWriter;
pub use series_loader::CsvSeriesLoader;
