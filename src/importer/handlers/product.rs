// ==========================================
// GPL Cart - product import handler
// ==========================================
// Columns: product_id, store_id, title, sku, price, currency, stock,
// status, category_id, brand_category_id, description, images, data
// Price cells are decimals, stored as integer minor units.
// ==========================================

use crate::i18n::t_with_args;
use crate::importer::csv_reader::CsvRow;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::ImportResult;
use crate::importer::handler_trait::{
    export_value, resolve_update_target, set, ImportContext, ImportHandler, RowErrors, RowOutcome,
    RowReader, RowTarget,
};
use crate::repository::{
    CategoryRepository, Executor, ProductRepository, Record, StoreRepository,
};
use serde_json::Value;
use tracing::debug;

const COLUMNS: &[&str] = &[
    "product_id",
    "store_id",
    "title",
    "sku",
    "price",
    "currency",
    "stock",
    "status",
    "category_id",
    "brand_category_id",
    "description",
    "images",
    "data",
];

pub struct ProductImportHandler;

impl ImportHandler for ProductImportHandler {
    fn id(&self) -> &'static str {
        "product"
    }

    fn name(&self) -> &'static str {
        "Products"
    }

    fn table(&self) -> &'static str {
        "product"
    }

    fn id_column(&self) -> &'static str {
        "product_id"
    }

    fn columns(&self) -> &'static [&'static str] {
        COLUMNS
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &["title"]
    }

    fn import_row(&self, ex: &Executor, row: &CsvRow, ctx: &ImportContext) -> ImportResult<RowOutcome> {
        let reader = RowReader::new(row);
        let mut errors = RowErrors::new();
        let mut record = Record::new();

        let target = resolve_update_target(&reader, "product_id", "product", ctx, &mut errors, |id| {
            ProductRepository::exists_tx(ex, id)
        })?;
        let existing = match target.update_id() {
            Some(id) => ProductRepository::find_tx(ex, id)?,
            None => None,
        };

        // ----- store -----
        let store_id = match reader.int("store_id", &mut errors) {
            Some(id) => {
                if !StoreRepository::exists_tx(ex, id)? {
                    errors.not_found("store", id);
                }
                set(&mut record, "store_id", id);
                id
            }
            None => match &existing {
                Some(product) => product.store_id,
                None => {
                    let id = ctx.store_id();
                    if target.is_insert() && !StoreRepository::exists_tx(ex, id)? {
                        errors.not_found("store", id);
                    }
                    set(&mut record, "store_id", id);
                    id
                }
            },
        };

        // ----- text -----
        match reader.text_max("title", 255, &mut errors) {
            Some(title) => set(&mut record, "title", title),
            None if target.is_insert() && reader.text("title").is_none() => errors.required("title"),
            None => {}
        }

        if let Some(description) = reader.text("description") {
            set(&mut record, "description", description);
        }

        // ----- price / currency / stock -----
        if let Some(raw) = reader.text("price") {
            match reader.cleaner.parse_price(&raw) {
                Some(minor) => set(&mut record, "price", minor),
                None => errors.push(t_with_args("validation.numeric", &[("field", "price")])),
            }
        }

        match reader.text("currency") {
            Some(raw) => match reader.cleaner.parse_currency(&raw) {
                Some(code) => set(&mut record, "currency", code),
                None => errors.push(t_with_args("validation.currency", &[("value", &raw)])),
            },
            None if target.is_insert() => set(&mut record, "currency", ctx.default_currency.clone()),
            None => {}
        }

        if let Some(stock) = reader.non_negative_int("stock", &mut errors) {
            set(&mut record, "stock", stock);
        }

        if let Some(status) = reader.bool("status", &mut errors) {
            set(&mut record, "status", status);
        }

        // ----- categories -----
        for column in ["category_id", "brand_category_id"] {
            if let Some(category_id) = reader.int(column, &mut errors) {
                if category_id > 0 && !CategoryRepository::exists_tx(ex, category_id)? {
                    errors.not_found("category", category_id);
                }
                set(&mut record, column, category_id);
            }
        }

        // ----- multi-value cells -----
        if let Some(images) = reader.list("images", ctx) {
            set(&mut record, "images", images);
        }
        if let Some(data) = reader.key_values("data", ctx, &mut errors) {
            set(&mut record, "data", Value::Object(data));
        }

        // ----- sku -----
        let sku = reader.text_max("sku", 255, &mut errors);
        // a product moved to another store keeps its SKU, which must be free there
        let kept_sku = match (&sku, &existing) {
            (None, Some(product)) if product.store_id != store_id && !product.sku.is_empty() => {
                Some(product.sku.clone())
            }
            _ => None,
        };
        if let Some(value) = sku.as_ref().or(kept_sku.as_ref()) {
            if ProductRepository::sku_taken_tx(ex, store_id, value, target.update_id())? {
                errors.push(t_with_args(
                    "validation.sku_taken",
                    &[("value", value), ("store", &store_id.to_string())],
                ));
            }
        }
        if let Some(sku) = &sku {
            set(&mut record, "sku", sku.clone());
        }

        errors.check(row.line)?;

        set(&mut record, "modified", ctx.now);
        match target {
            RowTarget::Update(product_id) => {
                ProductRepository::update_tx(ex, product_id, &record)?;
                debug!(product_id, line = row.line, "product updated");
                Ok(RowOutcome::Updated(product_id))
            }
            _ => {
                set(&mut record, "created", ctx.now);
                let product_id = ProductRepository::insert_tx(ex, &record)?;
                if sku.is_none() {
                    let generated =
                        ProductRepository::generate_sku_tx(ex, product_id, store_id, &ctx.sku_pattern)?;
                    debug!(product_id, sku = %generated, "generated sku");
                }
                debug!(product_id, line = row.line, "product inserted");
                Ok(RowOutcome::Inserted(product_id))
            }
        }
    }

    fn export_row(&self, record: &Record, ctx: &ImportContext) -> Vec<String> {
        let cleaner = DataCleaner;
        COLUMNS
            .iter()
            .map(|column| match (*column, record.get(*column)) {
                ("price", Some(value)) => cleaner.format_price(value.as_i64().unwrap_or(0)),
                (_, value) => export_value(value, ctx),
            })
            .collect()
    }
}
