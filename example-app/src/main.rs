//! # 示例应用程序
//!
//! 演示如何使用 Lorn ADSP 依赖注入容器装配一个小型广告投放服务

use anyhow::Context;
use clap::Parser;
use di_impl::{
    Closable, CloseResult, Component, ComponentResolver, Container, ContainerConfig, DiContainer,
};
use serde::Deserialize;
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn ADSP 依赖注入示例应用")]
struct Args {
    /// JSON 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 模拟广告库存服务不可用
    #[arg(long)]
    inventory_down: bool,
}

/// 配置文件结构
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    container: ContainerConfig,
    app: AppConfig,
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct AppConfig {
    name: String,
    slots: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "example-app".to_string(),
            slots: 3,
        }
    }
}

impl Component for AppConfig {}

/// 广告库存客户端
#[derive(Debug)]
struct InventoryClient {
    slots: usize,
    open: Cell<bool>,
}

impl Closable for InventoryClient {
    fn close(&self) -> CloseResult {
        self.open.set(false);
        info!("库存客户端已断开");
        Ok(())
    }
}

impl Component for InventoryClient {
    fn as_closable(&self) -> Option<&dyn Closable> {
        Some(self)
    }
}

/// 竞价服务
#[derive(Debug)]
struct BiddingService {
    inventory: Rc<InventoryClient>,
}

impl BiddingService {
    fn bid(&self, slot: usize) -> Option<u32> {
        (slot < self.inventory.slots).then(|| 100 + u32::try_from(slot).unwrap_or(0) * 10)
    }
}

impl Component for BiddingService {}

/// 投放服务
#[derive(Debug)]
struct DeliveryService {
    bidding: Rc<BiddingService>,
    config: Rc<AppConfig>,
}

impl Component for DeliveryService {}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    info!("启动 Lorn ADSP 示例应用");

    let file_config = load_config(&args)?;
    let mut container = build_container(file_config, args.inventory_down)?;

    if let Err(errors) = container.validate() {
        for error in &errors {
            warn!("依赖验证失败: {}", error);
        }
        anyhow::bail!("依赖图无效");
    }

    demonstrate_consume(&mut container);
    demonstrate_inject(&mut container)?;

    let stats = container.stats();
    info!(
        "容器统计: 提供者 {} 个, 缓存 {} 个, 失败 {} 个",
        stats.registered_providers, stats.cached_instances, stats.failed_constructions
    );

    container.close().context("关闭容器失败")?;
    info!("应用已关闭");
    Ok(())
}

/// 加载配置文件，未指定时使用默认配置
fn load_config(args: &Args) -> anyhow::Result<FileConfig> {
    let Some(path) = &args.config else {
        info!("未指定配置文件，使用默认配置");
        return Ok(FileConfig::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
    let config = serde_json::from_str(&content)
        .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
    info!("已加载配置文件: {}", path.display());
    Ok(config)
}

/// 注册所有组件的提供者
fn build_container(config: FileConfig, inventory_down: bool) -> anyhow::Result<Container> {
    let FileConfig { container, app } = config;

    let container = Container::builder()
        .with_config(container)
        .provide(move || app.clone())
        .try_provide(move |config: Rc<AppConfig>| {
            if inventory_down {
                anyhow::bail!("库存服务不可用");
            }
            Ok(InventoryClient {
                slots: config.slots,
                open: Cell::new(true),
            })
        })
        .provide(|inventory: Rc<InventoryClient>| BiddingService { inventory })
        .provide(|bidding: Rc<BiddingService>, config: Rc<AppConfig>| DeliveryService {
            bidding,
            config,
        })
        .build()?;

    info!("容器构建完成: {:?}", container);
    Ok(container)
}

/// 通过消费者函数使用组件
fn demonstrate_consume(container: &mut Container) {
    let result = container.consume(|delivery: Rc<DeliveryService>| {
        for slot in 0..=delivery.config.slots {
            match delivery.bidding.bid(slot) {
                Some(price) => info!("[{}] 广告位 {} 出价 {}", delivery.config.name, slot, price),
                None => info!("[{}] 广告位 {} 无库存", delivery.config.name, slot),
            }
        }
    });

    if let Err(e) = result {
        error!("投放服务不可用: {}", e);
    }
}

/// 注入到宿主持有的字段
fn demonstrate_inject(container: &mut Container) -> anyhow::Result<()> {
    let mut inventory: Option<Rc<InventoryClient>> = None;
    if let Err(e) = container.inject(&mut inventory) {
        warn!("库存客户端注入失败: {}", e);
        return Ok(());
    }

    let bidding = container.resolve::<BiddingService>()?;
    if let Some(inventory) = inventory {
        info!(
            "库存客户端已注入: 共享实例 = {}, 连接中 = {}",
            Rc::ptr_eq(&inventory, &bidding.inventory),
            inventory.open.get()
        );
    }
    Ok(())
}
