//! Inventory ledger operations

use shared::models::ProductUpdate;

use super::{LedgerError, RecordLocks};
use crate::db::models::ProductRow;
use crate::db::repository::ProductRepository;

/// Price snapshot taken when stock is reserved
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub product_id: String,
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: i64,
}

/// Per-product available/reserved bookkeeping
#[derive(Clone)]
pub struct InventoryLedger {
    products: ProductRepository,
    locks: RecordLocks,
}

impl InventoryLedger {
    pub fn new(products: ProductRepository, locks: RecordLocks) -> Self {
        Self { products, locks }
    }

    /// Move `quantity` units of a product from available to reserved
    pub async fn reserve(&self, product_id: &str, quantity: i64) -> Result<Reservation, LedgerError> {
        check_quantity(quantity)?;
        let _guard = self.locks.lock(product_id).await;

        match self.products.reserve(product_id, quantity).await? {
            Some(stock) => {
                tracing::debug!(
                    product_id = %product_id,
                    quantity,
                    available = stock.available_quantity,
                    reserved = stock.reserved_quantity,
                    "Stock reserved"
                );
                Ok(Reservation {
                    product_id: product_id.to_string(),
                    product_name: stock.name,
                    unit_price: stock.price,
                    quantity,
                })
            }
            None => {
                let product = self.require(product_id).await?;
                Err(LedgerError::InsufficientStock {
                    product_id: product_id.to_string(),
                    requested: quantity,
                    available: product.available_quantity,
                })
            }
        }
    }

    /// Return reserved units to available (order cancelled)
    pub async fn release(&self, product_id: &str, quantity: i64) -> Result<(), LedgerError> {
        check_quantity(quantity)?;
        let _guard = self.locks.lock(product_id).await;

        match self.products.release(product_id, quantity).await? {
            Some(stock) => {
                tracing::debug!(
                    product_id = %product_id,
                    quantity,
                    available = stock.available_quantity,
                    reserved = stock.reserved_quantity,
                    "Stock released"
                );
                Ok(())
            }
            None => Err(self.mismatch(product_id, quantity).await),
        }
    }

    /// Drop reserved units for good (order received)
    pub async fn finalize(&self, product_id: &str, quantity: i64) -> Result<(), LedgerError> {
        check_quantity(quantity)?;
        let _guard = self.locks.lock(product_id).await;

        match self.products.finalize(product_id, quantity).await? {
            Some(stock) => {
                tracing::debug!(
                    product_id = %product_id,
                    quantity,
                    reserved = stock.reserved_quantity,
                    "Stock finalized"
                );
                Ok(())
            }
            None => Err(self.mismatch(product_id, quantity).await),
        }
    }

    /// Delete a product unless a `placed` order still references it
    ///
    /// Stock reserved by an order that is not yet persisted also blocks the
    /// delete.
    pub async fn guard_delete(&self, product_id: &str) -> Result<(), LedgerError> {
        let _guard = self.locks.lock(product_id).await;

        let open_lines = self.products.count_open_lines(product_id).await?;
        if open_lines > 0 {
            return Err(LedgerError::HasOpenOrders {
                product_id: product_id.to_string(),
                open_lines,
            });
        }

        if self.products.delete_if_unreserved(product_id).await? {
            tracing::info!(product_id = %product_id, "Product deleted");
            return Ok(());
        }

        self.require(product_id).await?;
        Err(LedgerError::HasOpenOrders {
            product_id: product_id.to_string(),
            open_lines,
        })
    }

    /// Apply a catalogue update; a new quantity restocks the available units
    pub async fn update_product(
        &self,
        product_id: &str,
        update: ProductUpdate,
    ) -> Result<ProductRow, LedgerError> {
        let _guard = self.locks.lock(product_id).await;
        if self.products.find_by_id(product_id).await?.is_none() {
            return Err(LedgerError::ProductNotFound(product_id.to_string()));
        }
        Ok(self.products.update(product_id, update).await?)
    }

    async fn require(&self, product_id: &str) -> Result<ProductRow, LedgerError> {
        self.products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| LedgerError::ProductNotFound(product_id.to_string()))
    }

    async fn mismatch(&self, product_id: &str, quantity: i64) -> LedgerError {
        match self.require(product_id).await {
            Ok(product) => {
                tracing::error!(
                    product_id = %product_id,
                    requested = quantity,
                    reserved = product.reserved_quantity,
                    "Reserved quantity lower than the amount to settle"
                );
                LedgerError::ReservationMismatch {
                    product_id: product_id.to_string(),
                    requested: quantity,
                    reserved: product.reserved_quantity,
                }
            }
            Err(e) => e,
        }
    }
}

fn check_quantity(quantity: i64) -> Result<(), LedgerError> {
    if quantity <= 0 {
        return Err(LedgerError::InvalidQuantity { quantity });
    }
    Ok(())
}
