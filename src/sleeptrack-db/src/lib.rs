mod db;
pub use db::DatabaseHandler;

mod type_impl;
pub use type_impl::records::SearchRecords;
