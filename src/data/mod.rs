pub mod aggregator;
pub mod export;
pub mod models;
pub mod table;
pub mod url_set;
pub mod view;
