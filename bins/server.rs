use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

/// REST server for customers, services and their orders.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Configuration file (YAML, or TOML when the name ends in `.toml`)
    #[arg(long, env = "CONFIG_PATH")]
    config: Option<String>,
    /// Database driver: `postgres` or `memory`
    #[arg(long)]
    dbdriver: Option<String>,
    #[arg(long)]
    dbprotocol: Option<String>,
    #[arg(long)]
    dbusername: Option<String>,
    #[arg(long)]
    dbpassword: Option<String>,
    /// host:port of the database server
    #[arg(long)]
    dbhost: Option<String>,
    #[arg(long)]
    dbname: Option<String>,
    /// Address to listen on; empty listens on every interface
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    /// Root directory of the SQL scripts
    #[arg(long)]
    scripts: Option<String>,
    #[arg(long)]
    log_file: Option<String>,
}

impl Args {
    fn overrides(&self) -> configs::Overrides {
        configs::Overrides {
            dbdriver: self.dbdriver.clone(),
            dbprotocol: self.dbprotocol.clone(),
            dbusername: self.dbusername.clone(),
            dbpassword: self.dbpassword.clone(),
            dbhost: self.dbhost.clone(),
            dbname: self.dbname.clone(),
            address: self.address.clone(),
            port: self.port,
            scripts_dir: self.scripts.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

fn load_config(args: &Args) -> anyhow::Result<configs::AppConfig> {
    let mut cfg = configs::load(args.config.as_deref())?;
    cfg.apply_overrides(args.overrides())?;
    cfg.normalize_and_validate()?;
    Ok(cfg)
}

fn main() -> std::process::ExitCode {
    // 提前加载 .env，使得 RUST_LOG / DATABASE_URL 等环境变量生效
    dotenv().ok();
    let args = Args::parse();

    // 日志尚未初始化，配置错误只能输出到 stderr
    let cfg = match load_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("invalid configuration: {e:#}");
            return std::process::ExitCode::FAILURE;
        }
    };

    if let Err(e) = common::utils::logging::init_logging(&cfg.logging) {
        eprintln!("failed to initialize logging: {e:#}");
        return std::process::ExitCode::FAILURE;
    }
    info!(service = "server", event = "logger_init", file = %cfg.logging.file, "tracing subscriber initialized");

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    // Panic 钩子：捕获异常并输出错误日志
    std::panic::set_hook(Box::new(move |info| {
        error!(service = "server", event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));

    // 构建 Tokio 运行时（线程数来自配置）
    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "server service starting"
    );

    // server::run 内部监听 Ctrl+C 并优雅停机
    rt.block_on(async move {
        match server::run(cfg).await {
            Ok(()) => {
                info!(service = "server", event = "stop", %service_id, pid, "server stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "server", event = "run_failed", error = %e, "server::run returned error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
