use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for the media metadata gateway", long_about = None)]
struct Cli {
    #[arg(short, long, env = "GATEWAY_URL", default_value = "http://localhost:5000")]
    url: String,

    /// Shared secret, sent as `x-access-key`.
    #[arg(short, long, env = "ACCESS_KEY", hide_env_values = true)]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the gateway's service index
    Status,
    /// Search movies and TV shows
    Search {
        query: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Show a single movie
    Movie { id: u64 },
    /// List movies (popular, top_rated, now_playing, upcoming, trending)
    Movies {
        #[arg(default_value = "popular")]
        category: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Show a single TV show
    Tv { id: u64 },
    /// List TV shows (popular, top_rated, on_the_air, airing_today, trending)
    TvShows {
        #[arg(default_value = "popular")]
        category: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Autocomplete suggestions; trending titles when no query is given
    Suggestions { query: Option<String> },
}

impl Commands {
    fn path_and_query(&self) -> (String, Vec<(&'static str, String)>) {
        match self {
            Commands::Status => ("/".into(), vec![]),
            Commands::Search { query, page } => (
                "/search".into(),
                vec![("query", query.clone()), ("page", page.to_string())],
            ),
            Commands::Movie { id } => (format!("/movie/{}", id), vec![]),
            Commands::Movies { category, page } => {
                (format!("/movies/{}", category), vec![("page", page.to_string())])
            }
            Commands::Tv { id } => (format!("/tv/{}", id), vec![]),
            Commands::TvShows { category, page } => {
                (format!("/tv-shows/{}", category), vec![("page", page.to_string())])
            }
            Commands::Suggestions { query } => (
                "/suggestions".into(),
                query.iter().map(|q| ("query", q.clone())).collect(),
            ),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert("x-access-key", HeaderValue::from_str(&cli.key)?);

    let (path, query) = cli.command.path_and_query();
    let res = client
        .get(format!("{}{}", cli.url.trim_end_matches('/'), path))
        .query(&query)
        .headers(headers)
        .send()
        .await?;

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
