pub mod csv;
pub mod manual;
