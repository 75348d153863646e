use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::{net::TcpListener, sync::broadcast};
use tracing::{debug, error, info};

use scheduler_api::{create_app, routes::AppState, ApiOptions};
use scheduler_application::RoleViewService;
use scheduler_config::AppConfig;
use scheduler_domain::ports::SystemClock;
use scheduler_infrastructure::InMemorySchedulerStore;

/// 主应用程序：快照存储 + 角色视图服务 + HTTP接口
pub struct Application {
    config: AppConfig,
    store: Arc<InMemorySchedulerStore>,
    role_view_service: Arc<RoleViewService>,
    metrics_handle: Option<PrometheusHandle>,
}

impl Application {
    /// 创建新的应用实例
    pub async fn new(config: AppConfig, metrics_handle: Option<PrometheusHandle>) -> Result<Self> {
        info!("初始化角色视图服务，集群: {}", config.cluster.name);

        let store = Arc::new(
            InMemorySchedulerStore::from_snapshot_file(&config.state.snapshot_path)
                .await
                .with_context(|| format!("加载调度器快照失败: {}", config.state.snapshot_path))?,
        );

        let role_view_service = Arc::new(RoleViewService::new(
            config.cluster.name.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(SystemClock),
        ));

        Ok(Self {
            config,
            store,
            role_view_service,
            metrics_handle,
        })
    }

    pub fn router(&self) -> Router {
        let state = AppState {
            role_view_service: Arc::clone(&self.role_view_service),
            metrics_handle: self.metrics_handle.clone(),
        };
        let options = ApiOptions {
            request_timeout: Duration::from_secs(self.config.server.request_timeout_seconds),
            cors_enabled: self.config.server.cors_enabled,
            metrics_endpoint: self.config.observability.metrics_endpoint.clone(),
        };
        create_app(state, &options)
    }

    /// 绑定配置中的监听地址
    pub async fn bind(&self) -> Result<TcpListener> {
        let address = &self.config.server.bind_address;
        TcpListener::bind(address)
            .await
            .with_context(|| format!("绑定地址失败: {address}"))
    }

    /// 在给定监听器上运行HTTP服务，收到关闭信号后优雅退出
    pub async fn run(
        &self,
        listener: TcpListener,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<()> {
        let local_addr = listener.local_addr().context("获取监听地址失败")?;
        info!("API服务器启动在 http://{local_addr}");

        let reload_handle = match self.config.state.reload_interval_seconds {
            0 => None,
            seconds => {
                let store = Arc::clone(&self.store);
                let shutdown_rx = shutdown_rx.resubscribe();
                Some(tokio::spawn(async move {
                    run_reload_loop(store, seconds, shutdown_rx).await;
                }))
            }
        };

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("API服务器收到关闭信号");
            })
            .await
            .context("API服务器运行失败")?;

        if let Some(handle) = reload_handle {
            if let Err(e) = handle.await {
                error!("快照重新加载任务异常退出: {e}");
            }
        }

        info!("API服务器已停止");
        Ok(())
    }
}

/// 定期重新加载快照，失败时保留旧快照继续服务
async fn run_reload_loop(
    store: Arc<InMemorySchedulerStore>,
    interval_seconds: u64,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));
    // 第一次 tick 立即完成，快照刚加载过
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match store.reload().await {
                    Ok(()) => debug!("快照定期重新加载完成"),
                    Err(e) => error!("快照定期重新加载失败: {e}"),
                }
            }
            _ = shutdown_rx.recv() => {
                info!("快照重新加载循环收到关闭信号");
                break;
            }
        }
    }
}
