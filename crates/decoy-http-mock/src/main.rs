use anyhow::Context;
use clap::{Parser, ValueEnum};
use decoy_http_mock::{Config, Decoy, ReqwestTransport};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "decoy", author, version, about)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "DECOY_CONFIG")]
    config: Option<PathBuf>,

    /// Port for mocked traffic
    #[arg(short, long, env = "DECOY_PORT")]
    port: Option<u16>,

    /// Port for the admin API
    #[arg(long, env = "DECOY_ADMIN_PORT")]
    admin_port: Option<u16>,

    /// Address both listeners bind to
    #[arg(long, env = "DECOY_HOST")]
    host: Option<IpAddr>,

    /// Allowed host pattern; repeat for several
    #[arg(long = "host-whitelist", env = "DECOY_HOST_WHITELIST", value_delimiter = ',')]
    host_whitelist: Vec<String>,

    /// Base URL of the log endpoint, shown in request traces
    #[arg(long, env = "DECOY_LOGS_URL")]
    logs_url: Option<String>,

    #[arg(long, value_enum, default_value = "text", env = "DECOY_LOG_FORMAT")]
    log_format: LogFormat,
}

impl Args {
    /// File configuration (or defaults) with command line values on top
    fn into_config(self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(port) = self.port {
            config.listen.port = port;
        }
        if let Some(port) = self.admin_port {
            config.admin.port = port;
        }
        if let Some(host) = self.host {
            config.listen.host = host;
        }
        if !self.host_whitelist.is_empty() {
            config.host_whitelist = self.host_whitelist;
        }
        if self.logs_url.is_some() {
            config.logs_url = self.logs_url;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    let config = args.into_config()?;
    let transport = Arc::new(ReqwestTransport::new()?);
    let decoy = Decoy::from_config(&config, transport);

    let mock_addr = config.listen.socket_addr();
    let admin_addr = SocketAddr::new(config.listen.host, config.admin.port);
    if !config.host_whitelist.is_empty() {
        info!("Host whitelist: {:?}", config.host_whitelist);
    }

    let mock = decoy.mock_server(mock_addr);
    let admin = decoy.admin_server(admin_addr);

    tokio::select! {
        result = mock.run() => {
            if let Err(e) = &result {
                error!("Mock server stopped: {}", e);
            }
            result?;
        }
        result = admin.run() => {
            if let Err(e) = &result {
                error!("Admin API stopped: {}", e);
            }
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
    }

    Ok(())
}
