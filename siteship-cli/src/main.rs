use anyhow::Result;
use clap::{Parser, Subcommand};
use siteship_cloud::api_client::ExchangeClient;
use siteship_cloud::cache;
use siteship_cloud::credential_store::CredentialStore;
use siteship_cloud::publish::publish;
use siteship_cloud::refresh::{refresh, AuthMode, DEFAULT_SERVICE};
use siteship_cloud::s3_transport::S3Transport;
use siteship_cloud::{PublishRequest, PublisherConfig, SyncError};
use std::path::PathBuf;

/// CLI for siteship: publish static assets to object storage under per-app
/// temporary credentials.
#[derive(Parser)]
#[command(
    name = "siteship",
    version,
    about = "Publish static assets to object storage under per-app temporary credentials"
)]
struct Cli {
    /// Base URL of the credential-exchange API
    #[arg(long, env = "SITESHIP_API_URL", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a local folder to the bucket configured for an app
    Dist {
        /// Folder whose contents are mirrored to the bucket
        folder: PathBuf,
        /// App to publish for; the first cached app when omitted
        #[arg(long)]
        app: Option<String>,
        /// Service within the app
        #[arg(long, default_value = DEFAULT_SERVICE)]
        service: String,
        /// Subfolder under the app's destination prefix
        #[arg(long)]
        dest: Option<String>,
    },
    /// Exchange a username/password or bearer token for temporary storage credentials
    Sts {
        /// Username for basic authentication (with --pass)
        #[arg(long, conflicts_with = "token", requires = "pass")]
        user: Option<String>,
        /// Password for basic authentication (with --user)
        #[arg(long, requires = "user")]
        pass: Option<String>,
        /// Bearer token authentication
        #[arg(long)]
        token: Option<String>,
        /// App name to store the credentials under
        #[arg(long)]
        app: Option<String>,
    },
    /// Remove local upload-cache files
    Clean,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Failure: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = PublisherConfig::default();
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }

    match cli.command {
        Commands::Dist {
            folder,
            app,
            service,
            dest,
        } => {
            let store = CredentialStore::load(&config.credentials_file)?;
            let transport = S3Transport::new(
                config.s3_region.clone(),
                config.s3_endpoint_override.clone(),
                config.public_read,
            );
            let request = PublishRequest {
                local_folder: folder,
                app,
                service,
                dest,
            };

            match publish(&store, &transport, &config, &request).await {
                Ok(report) if report.failed == 0 => {
                    println!(
                        "Success: {} uploaded, {} skipped, {} excluded, {} stale deleted",
                        report.uploaded, report.skipped, report.excluded, report.deleted
                    );
                    println!(
                        "the code was synced and is now available at: {}",
                        report.public_url
                    );
                    Ok(())
                }
                Ok(report) => {
                    println!(
                        "Failure: {} file(s) failed to upload ({} uploaded, {} skipped)",
                        report.failed, report.uploaded, report.skipped
                    );
                    std::process::exit(1);
                }
                Err(SyncError::MissingCredentials(app)) => {
                    println!("Failure: no credentials for this app ({app})");
                    std::process::exit(1);
                }
                Err(e) => Err(e.into()),
            }
        }
        Commands::Sts {
            user,
            pass,
            token,
            app,
        } => {
            let auth = match (user, pass, token) {
                (Some(username), Some(password), None) => AuthMode::Basic { username, password },
                (None, None, Some(token)) => AuthMode::Bearer(token),
                _ => anyhow::bail!("provide either --user and --pass, or --token"),
            };

            let mut store = CredentialStore::load(&config.credentials_file)?;
            let client = ExchangeClient::new(&config);
            let app_key = refresh(&client, &mut store, app.as_deref(), DEFAULT_SERVICE, &auth).await?;
            println!(
                "Success: credentials for app {app_key} stored in {}",
                store.path().display()
            );
            Ok(())
        }
        Commands::Clean => {
            let removed = cache::clean(&config.cache_dir)?;
            println!("Success: removed {} upload-cache file(s)", removed.len());
            Ok(())
        }
    }
}
