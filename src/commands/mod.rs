mod bmi;
mod entry;
mod profile;

pub use bmi::BmiCommand;
pub use entry::{ChartCommand, DeleteCommand, HistoryCommand, LogCommand};
pub use profile::ProfileCommand;
