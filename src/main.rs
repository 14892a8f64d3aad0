use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use paperdex::config::Config;
use paperdex::index::builder;
use paperdex::query::BrowseServer;
use paperdex::storage::SnapshotStore;

/// 静态试卷归档索引器：扫描目录树生成 CDN 化的浏览索引，并提供浏览 API
#[derive(Parser)]
#[command(name = "paperdex", version)]
struct Cli {
    /// 可选 TOML 配置文件；缺省使用内建配置
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 一次性扫描归档目录并生成 index artifact
    Build {
        /// 归档根目录
        #[arg(long)]
        root: Option<PathBuf>,
        /// artifact 输出位置
        #[arg(long)]
        output: Option<PathBuf>,
        /// CDN 前缀（亦可用 CDN_URL 环境变量覆盖）
        #[arg(long)]
        cdn_prefix: Option<String>,
    },
    /// 加载 artifact 并提供浏览 API
    Serve {
        /// artifact 位置；缺省取配置里的输出位置
        #[arg(long)]
        index: Option<PathBuf>,
        #[arg(long, default_value_t = 6070)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Build {
            root,
            output,
            cdn_prefix,
        } => {
            if let Some(v) = root {
                config.root = v;
            }
            if let Some(v) = output {
                config.output = v;
            }
            if let Some(v) = cdn_prefix {
                config.cdn_prefix = v;
            }
            // 构建内部自行捕获并记录错误；缺失 root 的跳过不算进程失败
            builder::run_build(&config);
        }
        Command::Serve { index, port } => {
            let store = SnapshotStore::new(index.unwrap_or_else(|| config.output.clone()));
            let subjects = Arc::new(store.load()?);
            info!(
                "loaded {} subjects from {}",
                subjects.len(),
                store.path().display()
            );

            let server = BrowseServer::new(subjects);
            tokio::select! {
                result = server.run(port) => result?,
                _ = tokio::signal::ctrl_c() => info!("shutting down..."),
            }
        }
    }

    Ok(())
}
