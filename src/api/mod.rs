// Machine-readable run reports.

pub mod dto;
