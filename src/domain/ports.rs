use crate::domain::model::{ChartSettings, DemographicRow, Snapshot, TeacherSessionRow, TransactionRow};
use crate::domain::report::ExportBundle;
use crate::utils::error::{DashError, Result};
use async_trait::async_trait;

/// 唯讀的關聯式資料來源
pub trait DataSource: Send + Sync {
    fn verify_tables(&self) -> Result<()>;
    fn transactions(&self) -> Result<Vec<TransactionRow>>;
    fn demographics(&self) -> Result<Vec<DemographicRow>>;
    fn teacher_sessions(&self) -> Result<Vec<TeacherSessionRow>>;

    /// 啟動時載入全部資料；教師資料失敗只記警告
    fn load_snapshot(&self) -> Result<Snapshot> {
        self.verify_tables()?;

        let transactions = self.transactions()?;
        tracing::info!("📥 Loaded {} transaction rows", transactions.len());

        let demographics = self.demographics()?;
        if demographics.is_empty() {
            return Err(DashError::EmptyDatasetError {
                dataset: "student demographics".to_string(),
            });
        }
        tracing::info!("📥 Loaded {} demographic rows", demographics.len());

        let teacher_sessions = match self.teacher_sessions() {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("⚠️ Teacher performance data unavailable: {}", e);
                Vec::new()
            }
        };
        if teacher_sessions.is_empty() {
            tracing::warn!("⚠️ Teacher performance data is empty");
        } else {
            tracing::info!("📥 Loaded {} teacher session rows", teacher_sessions.len());
        }

        Ok(Snapshot::new(transactions, demographics, teacher_sessions))
    }
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn database_path(&self) -> &str;
    fn bind_addr(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn compression_enabled(&self) -> bool;
    fn archive_name(&self) -> &str;
    fn chart_settings(&self) -> ChartSettings;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Snapshot>;
    async fn transform(&self, snapshot: Snapshot) -> Result<ExportBundle>;
    async fn load(&self, bundle: ExportBundle) -> Result<String>;
}
