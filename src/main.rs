use clap::{Parser, Subcommand};
use darksky_summary::config::parse_blocks;
use darksky_summary::{AppError, ClientConfig, ForecastClient, Period, SummaryStyle, Units};
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Dark Sky forecast summaries")]
struct Cli {
    /// Summary wording (spoken or brief)
    #[arg(long, global = true)]
    style: Option<SummaryStyle>,

    /// Unit system (si, us, uk2, ca, auto)
    #[arg(long, global = true)]
    units: Option<Units>,

    /// Comma separated blocks to leave out of the response
    #[arg(long, global = true)]
    exclude: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a readable summary
    Summary {
        /// today, tomorrow, or a day offset from 1 to 7
        #[arg(short, long, default_value = "today")]
        when: String,
    },
    /// Print the raw JSON response
    Raw,
    /// Print the request URL without fetching
    Url,
    /// Print the response cache and usage headers
    Headers,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(style) = cli.style {
        config = config.with_style(style);
    }
    if let Some(units) = cli.units {
        config = config.with_units(units);
    }
    if let Some(exclude) = &cli.exclude {
        config = config.with_exclude(parse_blocks(exclude)?);
    }

    let mut client = ForecastClient::new(config)?;

    match cli.command.unwrap_or(Commands::Summary {
        when: "today".to_string(),
    }) {
        Commands::Summary { when } => {
            let period = Period::parse(&when);
            client.fetch().await?;
            info!("📝 Summarizing forecast for {}", period);
            println!("{}", client.summarize(period)?);
        }
        Commands::Raw => {
            let response = client.fetch().await?;
            println!("{}", response.raw);
        }
        Commands::Url => {
            println!("{}", client.endpoint());
        }
        Commands::Headers => {
            let response = client.fetch().await?;
            let metadata = &response.metadata;
            println!("Fetched at:           {}", response.fetched_at.to_rfc3339());
            println!("Cache-Control:        {}", or_absent(&metadata.cache_control));
            println!("Expires:              {}", or_absent(&metadata.expires));
            println!("X-Forecast-API-Calls: {}", or_absent(&metadata.api_calls));
            println!("X-Response-Time:      {}", or_absent(&metadata.response_time));
        }
    }

    Ok(())
}

fn or_absent(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("(absent)")
}
