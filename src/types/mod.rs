pub mod area;
pub mod hourly_variable;
pub mod month;
