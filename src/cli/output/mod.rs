pub mod chart;
pub mod set_report;
