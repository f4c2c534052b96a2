use crate::core::dashboard::Dashboard;
use crate::core::filters::FilterSet;
use crate::core::table::Table;
use crate::core::{ConfigProvider, DataSource, Pipeline, Storage};
use crate::domain::model::Snapshot;
use crate::domain::report::ExportBundle;
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

/// 將所有圖表匯出成 CSV/TSV/JSON 的批次流程
pub struct ExportPipeline<D: DataSource, S: Storage, C: ConfigProvider> {
    source: D,
    storage: S,
    config: C,
    filters: FilterSet,
}

impl<D: DataSource, S: Storage, C: ConfigProvider> ExportPipeline<D, S, C> {
    pub fn new(source: D, storage: S, config: C, filters: FilterSet) -> Self {
        Self {
            source,
            storage,
            config,
            filters,
        }
    }

    fn wants(&self, format: &str) -> bool {
        self.config.output_formats().iter().any(|f| f == format)
    }

    /// 每個輸出檔案的 (檔名, 內容)
    fn render_files(&self, bundle: &ExportBundle) -> Result<Vec<(String, Vec<u8>)>> {
        let mut files = Vec::new();

        for chart in &bundle.charts {
            let table = Table::from_chart(chart);
            if self.wants("csv") {
                files.push((format!("{}.csv", chart.slug()), table.to_csv()?.into_bytes()));
            }
            if self.wants("tsv") {
                files.push((format!("{}.tsv", chart.slug()), table.to_tsv()?.into_bytes()));
            }
        }

        if self.wants("json") {
            let json_data = serde_json::to_string_pretty(bundle)?;
            files.push(("charts.json".to_string(), json_data.into_bytes()));
        }

        Ok(files)
    }
}

#[async_trait::async_trait]
impl<D: DataSource, S: Storage, C: ConfigProvider> Pipeline for ExportPipeline<D, S, C> {
    async fn extract(&self) -> Result<Snapshot> {
        tracing::debug!("Reading database: {}", self.config.database_path());
        self.source.load_snapshot()
    }

    async fn transform(&self, snapshot: Snapshot) -> Result<ExportBundle> {
        let dashboard = Dashboard::new(snapshot, self.config.chart_settings());

        let charts = dashboard.render_every_view(&self.filters);
        let empty = charts.iter().filter(|c| c.is_empty()).count();
        if empty > 0 {
            tracing::warn!("⚠️ {} of {} charts have no data for the selected filters", empty, charts.len());
        }

        Ok(ExportBundle {
            summary: dashboard.summary(&self.filters),
            charts,
        })
    }

    async fn load(&self, bundle: ExportBundle) -> Result<String> {
        let files = self.render_files(&bundle)?;
        tracing::debug!("Rendered {} export files", files.len());

        if !self.config.compression_enabled() {
            for (name, data) in &files {
                self.storage.write_file(name, data).await?;
            }
            return Ok(self.config.output_path().to_string());
        }

        // 創建ZIP文件
        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for (name, data) in &files {
                zip.start_file(name.as_str(), SimpleFileOptions::default())?;
                zip.write_all(data)?;
            }
            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        let archive = self.config.archive_name();
        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(archive, &zip_data).await?;

        Ok(format!("{}/{}", self.config.output_path(), archive))
    }
}
