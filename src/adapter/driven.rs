// 駆動される側アダプター（リポジトリ実装など）

mod console_logger;
mod console_notifier;
mod inventory_repository;
mod menu_item_repository;
mod order_repository;
mod transaction_repository;

pub use console_logger::ConsoleLogger;
pub use console_notifier::ConsoleNotifier;
pub use inventory_repository::MySqlInventoryRepository;
pub use menu_item_repository::MySqlMenuItemRepository;
pub use order_repository::MySqlOrderRepository;
pub use transaction_repository::MySqlTransactionRepository;
