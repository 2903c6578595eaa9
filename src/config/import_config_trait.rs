// ==========================================
// GPL Cart - import configuration reader trait
// ==========================================
// Read-only view of the settings the import pipeline needs.
// Implemented by ConfigManager; tests may supply fixed values.
// ==========================================

use crate::repository::RepositoryResult;
use async_trait::async_trait;

#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    // ===== CSV =====

    /// Field delimiter
    ///
    /// # Default
    /// - `,`
    async fn get_csv_delimiter(&self) -> RepositoryResult<u8>;

    /// Delimiter between the items of a multi-value cell
    ///
    /// # Default
    /// - `|`
    async fn get_csv_delimiter_multiple(&self) -> RepositoryResult<String>;

    /// Delimiter between key and value inside a multi-value item
    ///
    /// # Default
    /// - `:`
    async fn get_csv_delimiter_key_value(&self) -> RepositoryResult<String>;

    // ===== Job step size =====

    /// Rows per job step
    ///
    /// # Default
    /// - 50
    async fn get_import_limit(&self) -> RepositoryResult<usize>;

    /// Bytes per job step (0 = unlimited)
    ///
    /// # Default
    /// - 0
    async fn get_import_limit_bytes(&self) -> RepositoryResult<u64>;

    // ===== Entity defaults =====

    /// Currency for product rows without one
    ///
    /// # Default
    /// - `USD`
    async fn get_default_currency(&self) -> RepositoryResult<String>;

    /// Store for rows without store_id
    ///
    /// # Default
    /// - 1
    async fn get_default_store_id(&self) -> RepositoryResult<i64>;

    /// # Default
    /// - 8
    async fn get_password_min_length(&self) -> RepositoryResult<usize>;

    /// # Default
    /// - 255
    async fn get_password_max_length(&self) -> RepositoryResult<usize>;

    /// Pattern for generated SKUs, `%i` is the product id
    ///
    /// # Default
    /// - `PRODUCT-%i`
    async fn get_product_sku_pattern(&self) -> RepositoryResult<String>;
}
