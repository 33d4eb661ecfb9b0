//! netinv poller
//!
//! Fetches the interface snapshot from a netinv daemon at a fixed interval and
//! prints it

use std::future::Future;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use netinv_client::{HttpClient, render};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "netinv-poll")]
#[command(about = "Poll a netinv daemon and print its interfaces", long_about = None)]
struct Cli {
    /// Daemon scheme and host
    #[arg(long, env = "HOST", default_value = "http://localhost")]
    host: String,

    /// Port, appended to the host as-is (`:8080`)
    #[arg(long, env = "PORT", default_value = ":8080")]
    port: String,

    /// Inventory endpoint path
    #[arg(long, env = "API_ENDPOINT", default_value = "/network")]
    api_endpoint: String,

    /// Only fetch this interface
    #[arg(long, env = "INTERFACE")]
    interface: Option<String>,

    /// Time between polls: bare seconds (`5`) or a duration (`10s`, `500ms`, `1m`)
    #[arg(long, env = "INTERVAL", default_value = "5s")]
    interval: String,

    /// Fetch once and exit
    #[arg(long)]
    once: bool,
}

impl Cli {
    fn base_url(&self) -> String {
        format!("{}{}", self.host, self.port)
    }

    fn client(&self) -> Result<HttpClient> {
        Ok(HttpClient::new(self.base_url())?.with_network_path(self.api_endpoint.clone()))
    }

    fn interface(&self) -> Option<&str> {
        self.interface.as_deref().filter(|i| !i.is_empty())
    }

    /// Poll period, falling back to the default for unusable values
    fn interval(&self) -> Duration {
        parse_interval(&self.interval).unwrap_or_else(|| {
            warn!(
                interval = %self.interval,
                default_secs = DEFAULT_INTERVAL.as_secs(),
                "unusable INTERVAL, using default"
            );
            DEFAULT_INTERVAL
        })
    }
}

const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Bare seconds or a humantime duration; zero is not a period
fn parse_interval(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let period = match raw.parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => humantime::parse_duration(raw).ok()?,
    };
    (!period.is_zero()).then_some(period)
}

/// Log to stderr so stdout only carries snapshots
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// One poll cycle; failures end the cycle, never the poller
async fn poll_once(client: &HttpClient, interface: Option<&str>) -> bool {
    match client.network(interface).await {
        Ok(snapshot) => {
            print!("{}", render(&snapshot, chrono::Utc::now()));
            true
        }
        Err(err) => {
            error!(error = %err, "poll failed");
            false
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();
    let client = cli.client()?;
    let interface = cli.interface();

    info!(endpoint = %client.network_url(interface)?, "server endpoint");

    if cli.once {
        if poll_once(&client, interface).await {
            return Ok(());
        }
        color_eyre::eyre::bail!("poll failed");
    }

    run(&client, interface, cli.interval(), async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to wait for ctrl-c");
        }
    })
    .await;

    info!("stopping");
    Ok(())
}

/// Poll every `period` until `shutdown` completes
///
/// The first poll starts immediately. A slow poll delays later ticks instead
/// of queueing them, and `shutdown` also interrupts a poll in flight.
async fn run(
    client: &HttpClient,
    interface: Option<&str>,
    period: Duration,
    shutdown: impl Future<Output = ()>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let polling = async {
        loop {
            ticker.tick().await;
            poll_once(client, interface).await;
        }
    };

    tokio::select! {
        _ = polling => {}
        () = shutdown => {}
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn parse(port: &str, endpoint: &str, extra: &[&str]) -> Cli {
        let mut argv = vec![
            "netinv-poll",
            "--host",
            "http://inventory.lan",
            "--port",
            port,
            "--api-endpoint",
            endpoint,
        ];
        argv.extend_from_slice(extra);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_endpoint_without_filter() {
        let cli = parse(":8080", "/network", &[]);
        let url = cli.client().unwrap().network_url(cli.interface()).unwrap();
        assert_eq!(url.as_str(), "http://inventory.lan:8080/network");
    }

    #[test]
    fn test_endpoint_with_filter() {
        let cli = parse(":8080", "/network", &["--interface", "eth0"]);
        let url = cli.client().unwrap().network_url(cli.interface()).unwrap();
        assert_eq!(url.as_str(), "http://inventory.lan:8080/network?interface=eth0");
    }

    #[test]
    fn test_empty_filter_means_all() {
        let cli = parse(":8080", "/network", &["--interface", ""]);
        assert_eq!(cli.interface(), None);
    }

    #[test]
    fn test_custom_endpoint() {
        let cli = parse(":9000", "/v1/interfaces", &[]);
        let url = cli.client().unwrap().network_url(None).unwrap();
        assert_eq!(url.as_str(), "http://inventory.lan:9000/v1/interfaces");
    }

    #[test]
    fn test_interval_forms() {
        let interval = |raw: &str| parse(":8080", "/network", &["--interval", raw]).interval();

        assert_eq!(interval("7"), Duration::from_secs(7));
        assert_eq!(interval("10s"), Duration::from_secs(10));
        assert_eq!(interval("500ms"), Duration::from_millis(500));
        assert_eq!(interval("1m"), Duration::from_secs(60));
    }

    #[test]
    fn test_unusable_interval_falls_back() {
        for raw in ["0", "0s", "soon", ""] {
            assert_eq!(parse_interval(raw), None, "{raw:?}");
        }

        let cli = parse(":8080", "/network", &["--interval", "soon"]);
        assert_eq!(cli.interval(), DEFAULT_INTERVAL);
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_stalled_poll() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(60)))
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap();
        let shutdown = tokio::time::sleep(Duration::from_millis(200));

        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            run(&client, None, Duration::from_secs(1), shutdown),
        )
        .await;

        assert!(finished.is_ok(), "poller ignored shutdown during a request");
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
