pub mod db_utils;
pub mod seed;
pub mod time_format;
