// ==========================================
// GPL Cart - entity import handlers
// ==========================================

pub mod category;
pub mod field;
pub mod field_value;
pub mod product;
pub mod user;

pub use category::CategoryImportHandler;
pub use field::FieldImportHandler;
pub use field_value::FieldValueImportHandler;
pub use product::ProductImportHandler;
pub use user::UserImportHandler;
