// ドメインモデル（エンティティと値オブジェクト）

mod value_objects;
mod inventory_item;
mod menu_item;
mod order;
mod transaction;

pub use value_objects::{
    CustomerId, InventoryItemId, MenuItemId, OrderId, RestaurantId, SupplierId, TransactionId,
    Money, Quantity,
    OrderLine, RecipeLine, SaleLine,
    StockDecrement, StockShortfall,
    OrderStatus, PaymentType,
};

pub use inventory_item::InventoryItem;
pub use menu_item::MenuItem;
pub use order::Order;
pub use transaction::Transaction;
