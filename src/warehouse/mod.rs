mod models;
pub mod queries;
mod schema;
mod store;
mod trait_def;

pub use models::*;
pub use schema::{latest_schema, table_names, WAREHOUSE_VERSIONED_SCHEMAS};
pub use store::{LoadTransaction, SqliteWarehouse};
pub use trait_def::WarehouseWriter;
