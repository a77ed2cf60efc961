//! UseCase: ヘルスチェック用の統計取得

use std::sync::Arc;

use crate::domain::{RegistryStats, RoomRegistry};

/// ヘルスチェックのユースケース
pub struct GetHealthUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl GetHealthUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 現在の Room 数と参加者数を返す
    pub async fn execute(&self) -> RegistryStats {
        self.registry.stats().await
    }
}
