//! 库存台账
//!
//! 每个商品有两个数量：
//!
//! | 字段 | 说明 |
//! |------|------|
//! | available_quantity | 可下单数量 |
//! | reserved_quantity | 已被 placed 订单预留的数量 |
//!
//! | 操作 | available | reserved |
//! |------|-----------|----------|
//! | reserve(q) | -q | +q |
//! | release(q) | +q | -q |
//! | finalize(q) | | -q |
//!
//! 两个数量都不会为负。同一商品的所有台账操作由 [`RecordLocks`] 串行化，
//! 每次写入都是带条件的单语句 UPDATE，写入时重新检查库存。

mod error;
mod ledger;
mod locks;

pub use error::LedgerError;
pub use ledger::{InventoryLedger, Reservation};
pub use locks::RecordLocks;
