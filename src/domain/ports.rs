use crate::domain::model::{AuroraReport, GeoPoint, RawFeeds};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn location(&self) -> GeoPoint;
    fn ovation_url(&self) -> &str;
    fn kp_forecast_url(&self) -> &str;
    fn mag_url(&self) -> &str;
    fn plasma_url(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn output_path(&self) -> &str;
    fn export_tables(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawFeeds>;
    async fn transform(&self, feeds: RawFeeds) -> Result<AuroraReport>;
    async fn load(&self, report: AuroraReport) -> Result<String>;
}
