pub mod riskanalyzer;
pub mod summarystatistics;
