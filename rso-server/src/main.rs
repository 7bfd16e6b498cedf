//! RSO合规服务器主程序

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rso_admin::{init_logging, ConfigManager, RsoConfig};
use rso_core::ReferenceTables;
use rso_database::{ComplianceStore, DatabasePool, MemoryStore, PgComplianceStore, PoolSettings};
use rso_web::{AppState, WebServer};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

/// RSO服务器命令行参数
#[derive(Parser, Debug)]
#[command(name = "rso-server")]
#[command(about = "放射安全合规记录服务器")]
struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 服务器端口，覆盖配置文件
    #[arg(short, long)]
    port: Option<u16>,

    /// 日志级别，覆盖配置文件
    #[arg(short, long)]
    log_level: Option<String>,

    /// 数据库连接字符串，覆盖配置文件
    #[arg(long)]
    database_url: Option<String>,

    /// 使用内存存储（数据不持久化）
    #[arg(long)]
    memory: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// 启动 HTTP 服务（默认）
    Serve,
    /// 建表并在患者表为空时写入示例患者
    InitDb,
    /// 清空并重建合规示例数据
    SeedCompliance,
    /// 清空并重建示例患者
    ReseedPatients,
    /// 打印生效的配置
    ShowConfig {
        /// 写入 TOML 文件而不是打印
        #[arg(long)]
        write: Option<String>,
    },
}

fn load_config(args: &Args) -> Result<ConfigManager> {
    let mut manager = ConfigManager::load(args.config.as_deref())?;

    let config = manager.config_mut();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if let Some(url) = &args.database_url {
        config.database.connection_string = url.clone();
    }

    manager.validate()?;
    Ok(manager)
}

fn load_reference(config: &RsoConfig) -> Result<ReferenceTables> {
    match &config.reference.tables_path {
        Some(path) => {
            let tables = ReferenceTables::load_from_file(path)
                .with_context(|| format!("Failed to load reference tables from {}", path))?;
            info!("参考表已从 {} 加载", path);
            Ok(tables)
        }
        None => Ok(ReferenceTables::builtin()),
    }
}

async fn open_store(config: &RsoConfig, memory: bool) -> Result<(Arc<dyn ComplianceStore>, Option<DatabasePool>)> {
    if memory {
        warn!("使用内存存储，重启后数据丢失");
        let store: Arc<dyn ComplianceStore> = Arc::new(MemoryStore::new());
        store.initialize().await?;
        return Ok((store, None));
    }

    let settings = PoolSettings {
        connection_string: config.database.connection_string.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        connect_timeout: config.database.connect_timeout(),
    };
    let pool = DatabasePool::connect(&settings).await?;
    let store: Arc<dyn ComplianceStore> = Arc::new(PgComplianceStore::new(pool.clone()));
    Ok((store, Some(pool)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("无法监听退出信号: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到退出信号，正在停止...");
}

async fn run(command: Command, config: &RsoConfig, store: Arc<dyn ComplianceStore>) -> Result<()> {
    match command {
        Command::Serve => {
            let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
                .parse()
                .with_context(|| {
                    format!("Invalid listen address {}:{}", config.server.host, config.server.port)
                })?;
            let state = AppState::new(store, load_reference(config)?);

            info!("{} 配置:", config.server.name);
            info!("  监听地址: {}", addr);
            info!("  日志格式: {}", config.logging.format);

            WebServer::new(addr, state).run_until(shutdown_signal()).await?;
        }
        Command::InitDb => {
            let counts = store.initialize().await?;
            info!("数据库初始化完成，写入 {} 名示例患者", counts.patients);
        }
        Command::SeedCompliance => {
            let counts = store.reseed_compliance().await?;
            info!("合规示例数据已重建: {:?}", counts);
        }
        Command::ReseedPatients => {
            let counts = store.reseed_patients().await?;
            info!("示例患者已重建: {} 名", counts.patients);
        }
        // 在打开存储之前已处理
        Command::ShowConfig { .. } => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let manager = load_config(&args)?;
    let command = args.command.clone().unwrap_or(Command::Serve);

    if let Command::ShowConfig { write } = &command {
        match write {
            Some(path) => {
                manager.save(path).await?;
                println!("配置已写入 {}", path);
            }
            None => println!("{}", manager.to_toml()?),
        }
        return Ok(());
    }
    let config = manager.config().clone();

    // 初始化日志
    init_logging(&config.logging)?;

    info!("启动RSO合规服务器...");

    let (store, pool) = open_store(&config, args.memory).await?;
    let result = run(command, &config, store).await;

    if let Some(pool) = pool {
        pool.close().await;
    }

    if let Err(e) = &result {
        error!("服务器运行失败: {:#}", e);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_config_write_flag() {
        let args = Args::try_parse_from(["rso-server", "show-config", "--write", "rso.toml"]).unwrap();
        assert_eq!(
            args.command,
            Some(Command::ShowConfig {
                write: Some("rso.toml".to_string())
            })
        );

        let args = Args::try_parse_from(["rso-server", "--memory"]).unwrap();
        assert!(args.memory);
        assert_eq!(args.command, None);
    }
}
