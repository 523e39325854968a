use crate::domain::model::CustomerId;
use crate::domain::port::{NotificationError, NotificationMessage, NotificationService};
use async_trait::async_trait;

/// コンソール通知実装
/// 通知内容をコンソールに出力する
/// 外部のプッシュ通知基盤を接続するまでの既定実装
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    /// 新しいコンソール通知実装を作成
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationService for ConsoleNotifier {
    async fn send(
        &self,
        customer_id: CustomerId,
        message: NotificationMessage,
    ) -> Result<(), NotificationError> {
        println!("🔔 [通知] {}", message.title);
        println!("  宛先顧客ID: {}", customer_id);
        println!("  本文: {}", message.body);
        println!("  ペイロード: {}", message.payload);
        println!();
        Ok(())
    }
}
