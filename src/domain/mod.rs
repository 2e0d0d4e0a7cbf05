pub mod tag;
pub mod track;
pub mod user_data;
